//! Helpers composing the real services, in-memory store and sync worker
//! behind the `/api` scope.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::Value;
use taskboard::Trace;
use taskboard::domain::{TaskService, UserService};
use taskboard::inbound::http::api_scope;
use taskboard::inbound::http::state::{HttpState, HttpStatePorts, ListDefaults};
use taskboard::outbound::{InMemoryDocumentStore, reference_sync_channel};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const POLL_ATTEMPTS: usize = 200;

/// Initialised `/api` service under test.
pub trait AppService:
    Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
}

impl<S> AppService for S where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
}

/// Build handler state over a fresh store and spawn its sync worker on the
/// current runtime.
pub fn spawn_state() -> HttpState {
    let store = Arc::new(InMemoryDocumentStore::new());
    let (sync, worker) = reference_sync_channel(Arc::clone(&store));
    actix_web::rt::spawn(worker.run());

    let sync = Arc::new(sync);
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(TaskService::new(
        Arc::clone(&store),
        Arc::clone(&sync),
        clock.clone(),
    ));
    let users = Arc::new(UserService::new(store, sync, clock));
    HttpState::new(
        HttpStatePorts {
            task_query: tasks.clone(),
            task_command: tasks,
            user_query: users.clone(),
            user_command: users,
        },
        ListDefaults::default(),
    )
}

/// Initialise the `/api` scope over `state`.
pub async fn init_app(state: HttpState) -> impl AppService {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

/// Send `request` and decode the JSON body.
pub async fn send(app: &impl AppService, request: test::TestRequest) -> (StatusCode, Value) {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Poll `check` until it yields `true`, panicking after a couple of seconds.
pub async fn eventually<F, Fut>(what: &str, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..POLL_ATTEMPTS {
        if check().await {
            return;
        }
        actix_web::rt::time::sleep(POLL_INTERVAL).await;
    }
    panic!("condition never held: {what}");
}
