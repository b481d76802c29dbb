//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `TASKBOARD_*` environment variables or a
//! configuration file, and fall back to the defaults below.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TASKS_LIMIT: u64 = 100;
const DEFAULT_USERS_LIMIT: u64 = 0;

/// Configuration for the HTTP server and list endpoints.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKBOARD")]
pub struct ServerSettings {
    /// Host name or address to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Page size for `GET /api/tasks` when `limit` is absent.
    pub tasks_default_limit: Option<u64>,
    /// Page size for `GET /api/users` when `limit` is absent; `0` is unlimited.
    pub users_default_limit: Option<u64>,
}

impl ServerSettings {
    /// Host to bind.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Default task page size.
    pub fn tasks_default_limit(&self) -> u64 {
        self.tasks_default_limit.unwrap_or(DEFAULT_TASKS_LIMIT)
    }

    /// Default user page size.
    pub fn users_default_limit(&self) -> u64 {
        self.users_default_limit.unwrap_or(DEFAULT_USERS_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "TASKBOARD_HOST",
        "TASKBOARD_PORT",
        "TASKBOARD_TASKS_DEFAULT_LIMIT",
        "TASKBOARD_USERS_DEFAULT_LIMIT",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("taskboard")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!((settings.host(), settings.port()), ("0.0.0.0", 8080));
        assert_eq!(settings.tasks_default_limit(), 100);
        assert_eq!(settings.users_default_limit(), 0);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TASKBOARD_HOST", Some("127.0.0.1".to_owned())),
            ("TASKBOARD_PORT", Some("4000".to_owned())),
            ("TASKBOARD_TASKS_DEFAULT_LIMIT", Some("25".to_owned())),
            ("TASKBOARD_USERS_DEFAULT_LIMIT", Some("10".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!((settings.host(), settings.port()), ("127.0.0.1", 4000));
        assert_eq!(settings.tasks_default_limit(), 25);
        assert_eq!(settings.users_default_limit(), 10);
    }
}
