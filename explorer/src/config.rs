use std::env;
use std::time::Duration;

use crate::error::{ExplorerError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Path segment used by role-scoped endpoints.
    pub fn path_segment(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ExplorerError::Config(format!("unknown role '{}'", other))),
        }
    }
}

/// Connection settings threaded into the backend service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub role: Role,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            role: Role::User,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Loads `.env` if present, then reads `KB_API_URL`, `KB_AUTH_TOKEN`,
    /// `KB_ROLE` and `KB_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(url) = lookup("KB_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        config.token = lookup("KB_AUTH_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(role) = lookup("KB_ROLE") {
            config.role = role.parse()?;
        }

        if let Some(raw) = lookup("KB_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ExplorerError::Config(format!("KB_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.role, Role::User);
        assert!(config.token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides_and_trims_trailing_slash() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("KB_API_URL", "http://kb.internal:9000/api/"),
            ("KB_AUTH_TOKEN", "  abc123  "),
            ("KB_ROLE", "Admin"),
            ("KB_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://kb.internal:9000/api");
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.endpoint("/search"), "http://kb.internal:9000/api/search");
    }

    #[test]
    fn rejects_bad_role_and_timeout() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("KB_ROLE", "root")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("KB_TIMEOUT_SECS", "soon")])).is_err());
    }
}
