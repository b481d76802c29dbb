//! HTTP server configuration object and helpers.

use taskboard::inbound::http::state::ListDefaults;
use taskboard::settings::ServerSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) list_defaults: ListDefaults,
}

impl ServerConfig {
    /// Configuration binding `host:port` with the stock list page sizes.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            list_defaults: ListDefaults::default(),
        }
    }

    /// Override the page sizes used when a list request has no `limit`.
    #[must_use]
    pub fn with_list_defaults(mut self, list_defaults: ListDefaults) -> Self {
        self.list_defaults = list_defaults;
        self
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self::new(settings.host(), settings.port()).with_list_defaults(ListDefaults {
            tasks: settings.tasks_default_limit(),
            users: settings.users_default_limit(),
        })
    }
}
