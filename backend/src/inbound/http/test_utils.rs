//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use crate::Trace;
use crate::domain::ports::{MockTaskCommand, MockTaskQuery, MockUserCommand, MockUserQuery};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::{HttpState, HttpStatePorts, ListDefaults};

/// Mocked driving ports; set expectations, then [`Self::call`].
#[derive(Default)]
pub struct MockPorts {
    pub task_query: MockTaskQuery,
    pub task_command: MockTaskCommand,
    pub user_query: MockUserQuery,
    pub user_command: MockUserCommand,
}

impl MockPorts {
    fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                task_query: Arc::new(self.task_query),
                task_command: Arc::new(self.task_command),
                user_query: Arc::new(self.user_query),
                user_command: Arc::new(self.user_command),
            },
            ListDefaults::default(),
        )
    }

    /// Send `request` through the `/api` scope and decode the JSON body.
    pub async fn call(self, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.into_state()))
                .wrap(Trace)
                .service(api_scope()),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }
}
