//! Behavioural coverage for the in-memory store.

use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::*;
use crate::domain::{DisplayName, Price, RecipeLink, RecipeTitle, UserFlags};

const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new(title).expect("title"),
        description: String::new(),
        time_minutes: 10,
        price: Price::new(Decimal::new(500, 2)).expect("price"),
        link: RecipeLink::default(),
    }
}

fn requested(names: &[&str]) -> RequestedTags {
    RequestedTags::new(names.iter().map(|name| TagName::new(name).expect("tag")))
}

fn names(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(|tag| tag.name().to_string()).collect()
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: Email::parse(email).expect("email"),
        name: DisplayName::default(),
        password_hash: PasswordHash::new("hash"),
        flags: UserFlags::regular(),
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(store: InMemoryStore) {
    UserRepository::create(&store, new_user("a@example.com"))
        .await
        .expect("first user");
    let err = UserRepository::create(&store, new_user("a@EXAMPLE.com"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn storing_a_token_replaces_the_previous_one(store: InMemoryStore) {
    let first = TokenDigest::from_stored("a".repeat(64));
    let second = TokenDigest::from_stored("b".repeat(64));
    store.store(ALICE, &first).await.expect("store");
    store.store(ALICE, &second).await.expect("replace");

    assert_eq!(store.find_user(&first).await.expect("lookup"), None);
    assert_eq!(store.find_user(&second).await.expect("lookup"), Some(ALICE));
}

#[rstest]
#[tokio::test]
async fn reconciling_the_same_name_twice_creates_one_tag(store: InMemoryStore) {
    let first = TagRepository::reconcile(&store, ALICE, requested(&["X", "X"]))
        .await
        .expect("first");
    let second = TagRepository::reconcile(&store, ALICE, requested(&["X"]))
        .await
        .expect("second");

    assert_eq!(first, second);
    let all = TagRepository::list_for_owner(&store, ALICE)
        .await
        .expect("list");
    assert_eq!(names(&all), ["X"]);
}

#[rstest]
#[tokio::test]
async fn reconciliation_is_scoped_to_the_owner(store: InMemoryStore) {
    let alice = TagRepository::reconcile(&store, ALICE, requested(&["Vegan"]))
        .await
        .expect("alice");
    let bob = TagRepository::reconcile(&store, BOB, requested(&["Vegan"]))
        .await
        .expect("bob");

    assert_ne!(alice[0].id(), bob[0].id());
    assert_eq!(bob[0].owner(), BOB);
}

#[rstest]
#[tokio::test]
async fn recipe_tags_follow_request_order(store: InMemoryStore) {
    TagRepository::reconcile(&store, ALICE, requested(&["Breakfast"]))
        .await
        .expect("seed tag");

    let recipe = RecipeRepository::create(
        &store,
        ALICE,
        draft("Pancakes"),
        Some(requested(&["Quick", "Breakfast", "Quick"])),
    )
    .await
    .expect("create");

    assert_eq!(names(recipe.tags()), ["Quick", "Breakfast"]);
}

#[rstest]
#[tokio::test]
async fn update_with_empty_tags_clears_and_without_tags_preserves(store: InMemoryStore) {
    let recipe = RecipeRepository::create(&store, ALICE, draft("Soup"), Some(requested(&["Hot"])))
        .await
        .expect("create");

    let untouched = RecipeRepository::update(
        &store,
        ALICE,
        recipe.id(),
        RecipeChanges {
            time_minutes: Some(45),
            ..RecipeChanges::default()
        },
        None,
    )
    .await
    .expect("update")
    .expect("owned");
    assert_eq!(names(untouched.tags()), ["Hot"]);
    assert_eq!(untouched.time_minutes(), 45);

    let cleared = RecipeRepository::update(
        &store,
        ALICE,
        recipe.id(),
        RecipeChanges::default(),
        Some(RequestedTags::empty()),
    )
    .await
    .expect("update")
    .expect("owned");
    assert!(cleared.tags().is_empty());

    let tags = TagRepository::list_for_owner(&store, ALICE)
        .await
        .expect("list");
    assert_eq!(names(&tags), ["Hot"], "tags outlive their associations");
}

#[rstest]
#[tokio::test]
async fn foreign_recipes_are_invisible_and_untouched(store: InMemoryStore) {
    let recipe = RecipeRepository::create(&store, ALICE, draft("Secret"), None)
        .await
        .expect("create");

    assert_eq!(
        RecipeRepository::find_for_owner(&store, BOB, recipe.id())
            .await
            .expect("find"),
        None
    );
    let updated = RecipeRepository::update(
        &store,
        BOB,
        recipe.id(),
        RecipeChanges {
            title: Some(RecipeTitle::new("Stolen").expect("title")),
            ..RecipeChanges::default()
        },
        Some(requested(&["Mine"])),
    )
    .await
    .expect("update");
    assert_eq!(updated, None);
    assert!(
        !RecipeRepository::delete(&store, BOB, recipe.id())
            .await
            .expect("delete")
    );

    let still_there = RecipeRepository::find_for_owner(&store, ALICE, recipe.id())
        .await
        .expect("find")
        .expect("owned");
    assert_eq!(still_there.title().as_ref(), "Secret");
    assert!(
        TagRepository::list_for_owner(&store, BOB)
            .await
            .expect("list")
            .is_empty(),
        "a rejected update must not create tags"
    );
}

#[rstest]
#[tokio::test]
async fn recipes_are_listed_newest_first(store: InMemoryStore) {
    for title in ["First", "Second", "Third"] {
        RecipeRepository::create(&store, ALICE, draft(title), None)
            .await
            .expect("create");
    }
    RecipeRepository::create(&store, BOB, draft("Other"), None)
        .await
        .expect("create");

    let titles: Vec<String> = RecipeRepository::list_for_owner(&store, ALICE)
        .await
        .expect("list")
        .iter()
        .map(|recipe| recipe.title().as_ref().to_owned())
        .collect();
    assert_eq!(titles, ["Third", "Second", "First"]);
}

#[rstest]
#[tokio::test]
async fn deleting_a_tag_detaches_it_and_renames_show_through(store: InMemoryStore) {
    let recipe = RecipeRepository::create(
        &store,
        ALICE,
        draft("Stew"),
        Some(requested(&["Dinner", "Slow"])),
    )
    .await
    .expect("create");
    let dinner = recipe.tags()[0].id();
    let slow = recipe.tags()[1].id();

    TagRepository::rename(&store, ALICE, slow, TagName::new("Slow cooked").expect("tag"))
        .await
        .expect("rename")
        .expect("owned");
    assert!(
        TagRepository::delete(&store, ALICE, dinner)
            .await
            .expect("delete")
    );

    let reloaded = RecipeRepository::find_for_owner(&store, ALICE, recipe.id())
        .await
        .expect("find")
        .expect("owned");
    assert_eq!(names(reloaded.tags()), ["Slow cooked"]);
}

#[rstest]
#[tokio::test]
async fn renaming_onto_an_existing_name_fails(store: InMemoryStore) {
    let tags = TagRepository::reconcile(&store, ALICE, requested(&["Lunch", "Dinner"]))
        .await
        .expect("seed");

    let err = TagRepository::rename(&store, ALICE, tags[0].id(), TagName::new("Dinner").expect("tag"))
        .await
        .expect_err("collision");
    assert!(matches!(err, TagRepositoryError::DuplicateName { .. }));
}

#[rstest]
#[tokio::test]
async fn tags_are_listed_by_name_descending(store: InMemoryStore) {
    TagRepository::reconcile(&store, ALICE, requested(&["Breakfast", "Vegan", "Lunch"]))
        .await
        .expect("seed");

    let tags = TagRepository::list_for_owner(&store, ALICE)
        .await
        .expect("list");
    assert_eq!(names(&tags), ["Vegan", "Lunch", "Breakfast"]);
}

#[rstest]
#[tokio::test]
async fn tag_names_sort_in_byte_order(store: InMemoryStore) {
    TagRepository::reconcile(&store, ALICE, requested(&["Banana", "apple", "Cherry"]))
        .await
        .expect("seed");

    let tags = TagRepository::list_for_owner(&store, ALICE)
        .await
        .expect("list");
    assert_eq!(names(&tags), ["apple", "Cherry", "Banana"]);
}
