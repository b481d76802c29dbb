//! HTTP inbound adapter exposing the task and user REST endpoints.
//!
//! ```text
//! GET|POST        /api/tasks
//! GET|PUT|DELETE  /api/tasks/{id}
//! GET|POST        /api/users
//! GET|PUT|DELETE  /api/users/{id}
//! ```
//!
//! Every response body is a `{message, data}` envelope; see [`envelope`].

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, Scope, web};

use crate::domain::Error;

pub mod envelope;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::validation("The request body must be a JSON object")
        .with_details(err.to_string())
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::malformed_query("Invalid query string")
        .with_details(err.to_string())
        .into()
}

/// Build the `/api` scope with every resource route and extractor config.
///
/// Handlers expect [`state::HttpState`] to be registered as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use taskboard::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::get_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
}
