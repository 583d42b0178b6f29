//! End-to-end tests for tag listing, renaming and deletion.

#[path = "support/mod.rs"]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};
use support::{authorized, create_recipe, init_app, send, sign_up};

fn recipe_with_tags(tags: &[&str]) -> Value {
    json!({"title": "Soup", "timeMinutes": 10, "price": "5.00", "tags": tags})
}

fn tag_id(recipe: &Value, index: usize) -> i64 {
    recipe["tags"][index]["id"].as_i64().expect("tag id")
}

#[actix_web::test]
async fn list_is_owner_scoped_and_sorted_by_name_descending() {
    let app = init_app().await;
    let token = sign_up(&app, "a@example.com").await;
    let other = sign_up(&app, "b@example.com").await;
    create_recipe(&app, &token, recipe_with_tags(&["Breakfast", "Vegan", "Dinner"])).await;
    create_recipe(&app, &other, recipe_with_tags(&["Zesty"])).await;

    let (status, body) = send(&app, authorized(TestRequest::get().uri("/api/v1/tags"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("tags")
        .iter()
        .map(|tag| tag["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["Vegan", "Dinner", "Breakfast"]);
}

#[actix_web::test]
async fn same_name_for_two_users_is_two_tags() {
    let app = init_app().await;
    let a = sign_up(&app, "a@example.com").await;
    let b = sign_up(&app, "b@example.com").await;
    let first = create_recipe(&app, &a, recipe_with_tags(&["Vegan"])).await;
    let second = create_recipe(&app, &b, recipe_with_tags(&["Vegan"])).await;

    assert_ne!(tag_id(&first, 0), tag_id(&second, 0));
}

#[rstest]
#[case(TestRequest::patch())]
#[case(TestRequest::put())]
#[actix_web::test]
async fn rename_is_visible_on_recipes(#[case] req: TestRequest) {
    let app = init_app().await;
    let token = sign_up(&app, "a@example.com").await;
    let recipe = create_recipe(&app, &token, recipe_with_tags(&["Diner"])).await;
    let id = tag_id(&recipe, 0);

    let (status, body) = send(
        &app,
        authorized(req.uri(&format!("/api/v1/tags/{id}")), &token)
            .set_json(json!({"name": "Dinner"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "name": "Dinner"}));

    let (_, detail) = send(
        &app,
        authorized(
            TestRequest::get().uri(&format!("/api/v1/recipes/{}", recipe["id"])),
            &token,
        ),
    )
    .await;
    assert_eq!(detail["tags"][0]["name"], "Dinner");
}

#[actix_web::test]
async fn rename_onto_existing_name_is_rejected() {
    let app = init_app().await;
    let token = sign_up(&app, "a@example.com").await;
    let recipe = create_recipe(&app, &token, recipe_with_tags(&["A", "B"])).await;

    let (status, body) = send(
        &app,
        authorized(
            TestRequest::patch().uri(&format!("/api/v1/tags/{}", tag_id(&recipe, 1))),
            &token,
        )
        .set_json(json!({"name": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "duplicate_name");
}

#[actix_web::test]
async fn foreign_tags_are_not_found_and_untouched() {
    let app = init_app().await;
    let owner = sign_up(&app, "a@example.com").await;
    let intruder = sign_up(&app, "b@example.com").await;
    let recipe = create_recipe(&app, &owner, recipe_with_tags(&["Private"])).await;
    let uri = format!("/api/v1/tags/{}", tag_id(&recipe, 0));

    for req in [
        TestRequest::patch().set_json(json!({"name": "Stolen"})),
        TestRequest::put().set_json(json!({})),
        TestRequest::delete(),
    ] {
        let (status, _) = send(&app, authorized(req.uri(&uri), &intruder)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, tags) = send(&app, authorized(TestRequest::get().uri("/api/v1/tags"), &owner)).await;
    assert_eq!(tags[0]["name"], "Private");
}

#[actix_web::test]
async fn delete_detaches_tag_from_recipes() {
    let app = init_app().await;
    let token = sign_up(&app, "a@example.com").await;
    let recipe = create_recipe(&app, &token, recipe_with_tags(&["Gone", "Kept"])).await;

    let (status, _) = send(
        &app,
        authorized(
            TestRequest::delete().uri(&format!("/api/v1/tags/{}", tag_id(&recipe, 0))),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, detail) = send(
        &app,
        authorized(
            TestRequest::get().uri(&format!("/api/v1/recipes/{}", recipe["id"])),
            &token,
        ),
    )
    .await;
    assert_eq!(detail["tags"], json!([{"id": tag_id(&recipe, 1), "name": "Kept"}]));
}

#[actix_web::test]
async fn tags_require_authentication() {
    let app = init_app().await;
    let (status, body) = send(&app, TestRequest::get().uri("/api/v1/tags")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}
