//! HTTP inbound adapter exposing the REST API under `/api/v1`.
//!
//! Routes are registered as resources so an unsupported verb on a known
//! path answers 405 rather than falling through to 404.

pub mod auth;
pub mod error;
pub mod health;
pub mod recipes;
pub mod schemas;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{Scope, web};

pub use error::{ApiResult, json_config, path_config};

/// All API routes, ready to mount on an `App` that carries
/// `web::Data<HttpState>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::api_scope;
///
/// let _app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(json_config())
        .app_data(path_config())
        .service(web::resource("/users").route(web::post().to(users::register)))
        .service(web::resource("/users/token").route(web::post().to(users::create_token)))
        .service(
            web::resource("/users/me")
                .route(web::get().to(users::current_user))
                .route(web::patch().to(users::update_current_user)),
        )
        .service(
            web::resource("/recipes")
                .route(web::get().to(recipes::list_recipes))
                .route(web::post().to(recipes::create_recipe)),
        )
        .service(
            web::resource("/recipes/{id}")
                .route(web::get().to(recipes::get_recipe))
                .route(web::patch().to(recipes::patch_recipe))
                .route(web::put().to(recipes::put_recipe))
                .route(web::delete().to(recipes::delete_recipe)),
        )
        .service(web::resource("/tags").route(web::get().to(tags::list_tags)))
        .service(
            web::resource("/tags/{id}")
                .route(web::patch().to(tags::patch_tag))
                .route(web::put().to(tags::put_tag))
                .route(web::delete().to(tags::delete_tag)),
        )
}
