//! Gate error model.

use thiserror::Error;

/// Result type used across the gate crates.
pub type GateResult<T> = Result<T, GateError>;

/// Gate-level error.
///
/// These never reach a navigating visitor: the access gate folds every
/// variant it can observe into a redirect. They exist so the building blocks
/// (record parsing, role annotations, configuration) can report precisely
/// what went wrong to their own callers and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The stored user record is present but not parseable.
    #[error("corrupt session: {0}")]
    CorruptSession(String),

    /// A required-role annotation is not one of the known roles.
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Gate configuration is unusable (e.g. a relative redirect path).
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl GateError {
    pub fn corrupt_session(msg: impl Into<String>) -> Self {
        Self::CorruptSession(msg.into())
    }

    pub fn unknown_role(label: impl Into<String>) -> Self {
        Self::UnknownRole(label.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            GateError::unknown_role("janitor").to_string(),
            "unknown role: 'janitor'"
        );
        assert!(
            GateError::corrupt_session("expected value at line 1")
                .to_string()
                .starts_with("corrupt session:")
        );
    }
}
