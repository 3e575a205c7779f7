//! Environment configuration.
//!
//! The gateway itself never reads the environment; hosts call
//! [`EnvConfig::from_env`] once and hand the resulting [`GatewayConfig`] to
//! [`crate::InterviewGateway::from_config`].

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use interview_api::{ApiConfig, DEFAULT_BASE_URL};

use crate::bootstrap::DefaultSessionProfile;

pub const ENV_BASE_URL: &str = "INTERVIEW_API_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "INTERVIEW_API_TOKEN";
pub const ENV_TIMEOUT_MS: &str = "INTERVIEW_API_TIMEOUT_MS";
pub const ENV_BACKEND: &str = "INTERVIEW_BACKEND";
pub const ENV_LOG: &str = "INTERVIEW_LOG";

pub const DEFAULT_ACCESS_TOKEN: &str = "test_token";

/// Which backend implementation a host should wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Http,
    Mock,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            other => Err(format!(
                "unknown backend '{other}' in {ENV_BACKEND}; expected 'http' or 'mock'"
            )),
        }
    }
}

/// Explicit gateway construction parameters.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api: ApiConfig,
    pub defaults: DefaultSessionProfile,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::new(DEFAULT_ACCESS_TOKEN),
            defaults: DefaultSessionProfile::default(),
        }
    }
}

/// Raw values read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
    pub backend: Option<String>,
    pub log_filter: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env_string_opt(ENV_BASE_URL),
            access_token: env_string_opt(ENV_ACCESS_TOKEN),
            timeout: env_millis_opt(ENV_TIMEOUT_MS),
            backend: env_string_opt(ENV_BACKEND),
            log_filter: env_string_opt(ENV_LOG),
        }
    }

    pub fn backend_kind(&self) -> Result<BackendKind, String> {
        self.backend
            .as_deref()
            .map_or(Ok(BackendKind::default()), BackendKind::from_str)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        let mut api = ApiConfig::new(
            self.access_token
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCESS_TOKEN.to_string()),
        )
        .with_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
        if let Some(timeout) = self.timeout {
            api = api.with_timeout(timeout);
        }

        GatewayConfig {
            api,
            defaults: DefaultSessionProfile::default(),
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_millis_opt(key: &str) -> Option<Duration> {
    env_string_opt(key)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_api::config::DEFAULT_TIMEOUT;
    use std::sync::{Mutex, OnceLock};

    const ALL_KEYS: [&str; 5] = [
        ENV_BASE_URL,
        ENV_ACCESS_TOKEN,
        ENV_TIMEOUT_MS,
        ENV_BACKEND,
        ENV_LOG,
    ];

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    fn clear_all() -> Vec<EnvGuard> {
        ALL_KEYS
            .iter()
            .map(|key| set_env_guard(key, None))
            .collect()
    }

    #[test]
    fn env_defaults_target_local_backend() {
        let _lock = env_lock();
        let _guards = clear_all();

        let env_config = EnvConfig::from_env();
        assert!(env_config.base_url.is_none());
        assert!(env_config.timeout.is_none());
        assert_eq!(env_config.backend_kind(), Ok(BackendKind::Http));

        let config = env_config.gateway_config();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.access_token, DEFAULT_ACCESS_TOKEN);
        assert_eq!(config.api.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.defaults, DefaultSessionProfile::default());
    }

    #[test]
    fn env_values_override_defaults() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g1 = set_env_guard(ENV_BASE_URL, Some("https://interview.example/api/v1"));
        let _g2 = set_env_guard(ENV_ACCESS_TOKEN, Some("secret"));
        let _g3 = set_env_guard(ENV_TIMEOUT_MS, Some("2500"));
        let _g4 = set_env_guard(ENV_BACKEND, Some("Mock"));
        let _g5 = set_env_guard(ENV_LOG, Some("debug"));

        let env_config = EnvConfig::from_env();
        assert_eq!(env_config.backend_kind(), Ok(BackendKind::Mock));
        assert_eq!(env_config.log_filter.as_deref(), Some("debug"));

        let config = env_config.gateway_config();
        assert_eq!(config.api.base_url, "https://interview.example/api/v1");
        assert_eq!(config.api.access_token, "secret");
        assert_eq!(config.api.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn zero_or_invalid_timeout_is_ignored() {
        let _lock = env_lock();
        let _guards = clear_all();
        {
            let _g = set_env_guard(ENV_TIMEOUT_MS, Some("0"));
            assert!(EnvConfig::from_env().timeout.is_none());
        }
        let _g = set_env_guard(ENV_TIMEOUT_MS, Some("soon"));
        assert!(EnvConfig::from_env().timeout.is_none());
    }

    #[test]
    fn unknown_backend_is_reported() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g = set_env_guard(ENV_BACKEND, Some("grpc"));

        let error = EnvConfig::from_env()
            .backend_kind()
            .expect_err("unknown backend");
        assert!(error.contains("grpc"));
    }
}
