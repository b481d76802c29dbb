//! Builders wiring the document store, reference sync and services into the
//! HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;

use taskboard::domain::ports::{DocumentStore, ReferenceSync};
use taskboard::domain::{TaskService, UserService};
use taskboard::inbound::http::state::{HttpState, HttpStatePorts, ListDefaults};

/// Build handler state with task and user services sharing one store and
/// one reference sync sink.
pub fn build_http_state<S, R>(store: Arc<S>, sync: Arc<R>, list_defaults: ListDefaults) -> HttpState
where
    S: DocumentStore + ?Sized + 'static,
    R: ReferenceSync + ?Sized + 'static,
{
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
        list_defaults,
    )
}
