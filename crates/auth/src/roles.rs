use std::borrow::Cow;

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use routegate_core::GateError;

/// Role label as it appears in group names or the `user_type` field.
///
/// Labels compare case-insensitively, so they are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoleLabel(Cow<'static, str>);

impl RoleLabel {
    pub const HR: RoleLabel = RoleLabel(Cow::Borrowed("hr"));
    pub const HIRING_MANAGER: RoleLabel = RoleLabel(Cow::Borrowed("hiring_manager"));

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Cow::Owned(name.as_ref().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive equality against a raw label.
    pub fn matches(&self, raw: &str) -> bool {
        raw.to_lowercase() == self.as_str()
    }
}

impl From<String> for RoleLabel {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<RoleLabel> for String {
    fn from(value: RoleLabel) -> Self {
        value.0.into_owned()
    }
}

impl core::fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimum permission tier a route declares.
///
/// `Authenticated` is the `none` annotation: any signed-in visitor passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum RequiredRole {
    #[default]
    Authenticated,
    Superadmin,
    Admin,
    User,
    Hr,
    Techie,
}

impl RequiredRole {
    pub const ALL: [RequiredRole; 6] = [
        RequiredRole::Authenticated,
        RequiredRole::Superadmin,
        RequiredRole::Admin,
        RequiredRole::User,
        RequiredRole::Hr,
        RequiredRole::Techie,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequiredRole::Authenticated => "none",
            RequiredRole::Superadmin => "superadmin",
            RequiredRole::Admin => "admin",
            RequiredRole::User => "user",
            RequiredRole::Hr => "hr",
            RequiredRole::Techie => "techie",
        }
    }
}

impl core::fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequiredRole {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        RequiredRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| GateError::unknown_role(label))
    }
}

impl TryFrom<String> for RequiredRole {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequiredRole> for &'static str {
    fn from(value: RequiredRole) -> Self {
        value.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_role_parses_case_insensitively() {
        assert_eq!("HR".parse::<RequiredRole>().unwrap(), RequiredRole::Hr);
        assert_eq!(" none ".parse::<RequiredRole>().unwrap(), RequiredRole::Authenticated);
        assert_eq!("SuperAdmin".parse::<RequiredRole>().unwrap(), RequiredRole::Superadmin);
    }

    #[test]
    fn unknown_required_role_is_rejected() {
        let err = "janitor".parse::<RequiredRole>().unwrap_err();
        assert_eq!(err, GateError::UnknownRole("janitor".to_string()));
    }

    #[test]
    fn required_role_round_trips_through_its_label() {
        for role in RequiredRole::ALL {
            assert_eq!(role.to_string().parse::<RequiredRole>().unwrap(), role);
        }
        assert_eq!(serde_json::to_string(&RequiredRole::Techie).unwrap(), "\"techie\"");
        assert!(serde_json::from_str::<RequiredRole>("\"owner\"").is_err());
    }

    #[test]
    fn role_label_is_normalized() {
        let label = RoleLabel::new("Hiring_Manager");
        assert_eq!(label, RoleLabel::HIRING_MANAGER);
        assert!(RoleLabel::HR.matches("Hr"));
        assert!(!RoleLabel::HR.matches("hr manager"));
        assert!(!RoleLabel::HR.matches(" hr"));
    }

    #[test]
    fn deserialized_label_is_normalized() {
        let label: RoleLabel = serde_json::from_str("\"HR\"").unwrap();
        assert_eq!(label, RoleLabel::HR);
        assert_eq!(serde_json::to_string(&RoleLabel::HIRING_MANAGER).unwrap(), "\"hiring_manager\"");
    }
}
