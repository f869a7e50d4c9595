//! Gate configuration (redirect targets and session keys).

use routegate_core::{GateError, GateResult};

use crate::SessionKeys;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FALLBACK_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Where unauthenticated visitors are sent.
    pub login_path: String,
    /// Where signed-in visitors lacking the required role are sent.
    pub fallback_path: String,
    pub keys: SessionKeys,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
            keys: SessionKeys::default(),
        }
    }
}

impl GateConfig {
    /// Build from `ROUTEGATE_*` environment variables, defaulting unset ones.
    pub fn from_env() -> GateResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`GateConfig::from_env`], with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> GateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name).unwrap_or_else(|| {
                tracing::debug!(variable = name, default, "gate config variable not set; using default");
                default.to_string()
            })
        };

        let config = Self {
            login_path: var("ROUTEGATE_LOGIN_PATH", DEFAULT_LOGIN_PATH),
            fallback_path: var("ROUTEGATE_FALLBACK_PATH", DEFAULT_FALLBACK_PATH),
            keys: SessionKeys {
                token: var("ROUTEGATE_TOKEN_KEY", SessionKeys::DEFAULT_TOKEN),
                refresh_token: var("ROUTEGATE_REFRESH_TOKEN_KEY", SessionKeys::DEFAULT_REFRESH_TOKEN),
                user: var("ROUTEGATE_USER_KEY", SessionKeys::DEFAULT_USER),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GateResult<()> {
        for (name, path) in [("login_path", &self.login_path), ("fallback_path", &self.fallback_path)] {
            if !path.starts_with('/') {
                return Err(GateError::invalid_config(format!(
                    "{name} must be an absolute path, got '{path}'"
                )));
            }
        }

        for (name, key) in [
            ("token key", &self.keys.token),
            ("refresh token key", &self.keys.refresh_token),
            ("user key", &self.keys.user),
        ] {
            if key.trim().is_empty() {
                return Err(GateError::invalid_config(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }
}
