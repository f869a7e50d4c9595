//! Authorization-relevant subset of the stored user record.
//!
//! The login flow writes the backend's user payload into the session store as
//! a JSON blob; this module is the only place that blob is interpreted.
//!
//! Only fields a decision reads are parsed strictly. Reserved fields, and
//! the group ids nothing compares, tolerate `null` and odd shapes so that a
//! backend quirk there cannot sign a visitor out.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use routegate_core::{GateError, GateResult, GroupId, RoleId};

/// Backend key of a group: numeric primary key, or an opaque string (UUIDs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Numeric(GroupId),
    Opaque(String),
}

/// Group membership as returned by the backend.
///
/// Only `name` takes part in decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "lenient_group_key", skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupKey>,
    pub name: String,
}

impl Group {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(GroupKey::Numeric(GroupId::new(id))),
            name: name.into(),
        }
    }
}

/// Structured role assignment.
///
/// Carried for completeness; no routing decision consults it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedRole {
    pub id: RoleId,
    pub name: String,
    #[serde(default, alias = "roleType", skip_serializing_if = "Option::is_none")]
    pub role_type: Option<String>,
}

/// Stored user, as far as route authorization is concerned.
///
/// Missing flags read as `false` and missing `groups` as empty, so absent data
/// can only ever narrow access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, alias = "isSuperuser", deserialize_with = "null_as_default")]
    pub is_superuser: bool,

    #[serde(default, alias = "isStaff", deserialize_with = "null_as_default")]
    pub is_staff: bool,

    /// Reserved: not consulted by any decision.
    #[serde(default, alias = "isActive", deserialize_with = "lenient_flag")]
    pub is_active: bool,

    /// Reserved: not consulted by any decision.
    #[serde(default, alias = "isVerified", deserialize_with = "lenient_flag")]
    pub is_verified: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<Group>,

    /// Single-role label, consulted only when `groups` is empty.
    #[serde(default, alias = "userType", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,

    /// Only presence (non-empty) is significant, never the content.
    #[serde(default, alias = "adminRoles", skip_serializing_if = "Option::is_none")]
    pub admin_roles: Option<Vec<String>>,

    /// Reserved: not consulted by any decision. Entries that do not parse
    /// are dropped.
    #[serde(default, deserialize_with = "lenient_roles", skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<AssignedRole>>,
}

/// `null` reads as the default; any other wrong type is still an error.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything but a JSON boolean reads as `false`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_group_key<'de, D>(deserializer: D) -> Result<Option<GroupKey>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(match n.as_u64() {
            Some(raw) => GroupKey::Numeric(GroupId::new(raw)),
            None => GroupKey::Opaque(n.to_string()),
        }),
        Value::String(s) => Some(match s.parse::<GroupId>() {
            Ok(id) => GroupKey::Numeric(id),
            Err(_) => GroupKey::Opaque(s),
        }),
        _ => None,
    })
}

fn lenient_roles<'de, D>(deserializer: D) -> Result<Option<Vec<AssignedRole>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
        ),
        _ => None,
    })
}

impl UserRecord {
    /// Parse the serialized record kept in the session store.
    ///
    /// Anything other than a JSON object of the expected shape is corrupt
    /// (including `null`, arrays, and bare strings).
    pub fn from_json(raw: &str) -> GateResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| GateError::corrupt_session(e.to_string()))?;

        if !value.is_object() {
            return Err(GateError::corrupt_session(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }

        serde_json::from_value(value).map_err(|e| GateError::corrupt_session(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // A struct of strings, bools and integers always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn has_admin_roles(&self) -> bool {
        self.admin_roles.as_ref().is_some_and(|roles| !roles.is_empty())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_payload() {
        let raw = r#"{
            "id": 17,
            "email": "ada@example.com",
            "is_superuser": false,
            "is_staff": true,
            "is_active": true,
            "is_verified": false,
            "groups": [{"id": 3, "name": "HR"}, {"id": 9, "name": "Interviewers"}],
            "user_type": "hiring_manager",
            "admin_roles": ["billing"],
            "roles": [{"id": 1, "name": "recruiter", "role_type": "staff"}]
        }"#;

        let user = UserRecord::from_json(raw).unwrap();
        assert!(user.is_staff);
        assert!(!user.is_superuser);
        assert_eq!(user.groups.len(), 2);
        assert_eq!(user.groups[0].id, Some(GroupKey::Numeric(GroupId::new(3))));
        assert_eq!(user.user_type.as_deref(), Some("hiring_manager"));
        assert!(user.has_admin_roles());
        let roles = user.roles.unwrap();
        assert_eq!(roles[0].role_type.as_deref(), Some("staff"));
    }

    #[test]
    fn accepts_camel_case_field_names() {
        let raw = r#"{"isSuperuser": true, "userType": "techie", "adminRoles": []}"#;
        let user = UserRecord::from_json(raw).unwrap();
        assert!(user.is_superuser);
        assert_eq!(user.user_type.as_deref(), Some("techie"));
        assert!(!user.has_admin_roles());
    }

    #[test]
    fn missing_fields_default_to_least_privilege() {
        let user = UserRecord::from_json("{}").unwrap();
        assert_eq!(user, UserRecord::default());
        assert!(!user.is_superuser && !user.is_staff);
        assert!(user.groups.is_empty());
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let err = UserRecord::from_json("{not json").unwrap_err();
        assert!(matches!(err, GateError::CorruptSession(_)));
    }

    #[test]
    fn non_object_json_is_corrupt() {
        for raw in ["null", "[]", "\"admin\"", "true", "3"] {
            let err = UserRecord::from_json(raw).unwrap_err();
            assert!(matches!(err, GateError::CorruptSession(_)), "{raw} should be corrupt");
        }
    }

    #[test]
    fn wrongly_typed_fields_are_corrupt() {
        let err = UserRecord::from_json(r#"{"is_staff": "yes"}"#).unwrap_err();
        assert!(matches!(err, GateError::CorruptSession(_)));

        let err = UserRecord::from_json(r#"{"groups": [{"id": 1}]}"#).unwrap_err();
        assert!(matches!(err, GateError::CorruptSession(msg) if msg.contains("name")));

        for raw in [
            r#"{"is_superuser": 1}"#,
            r#"{"groups": {"id": 1, "name": "HR"}}"#,
            r#"{"groups": [{"id": 1, "name": null}]}"#,
            r#"{"user_type": 5}"#,
            r#"{"admin_roles": "billing"}"#,
        ] {
            let err = UserRecord::from_json(raw).unwrap_err();
            assert!(matches!(err, GateError::CorruptSession(_)), "{raw} should be corrupt");
        }
    }

    #[test]
    fn null_decision_fields_read_as_defaults() {
        let raw = r#"{"is_superuser": null, "is_staff": null, "groups": null, "user_type": null, "admin_roles": null}"#;
        assert_eq!(UserRecord::from_json(raw).unwrap(), UserRecord::default());
    }

    #[test]
    fn reserved_fields_never_make_a_record_corrupt() {
        let raw = r#"{
            "is_superuser": true,
            "is_active": null,
            "is_verified": "yes",
            "roles": [{"name": "recruiter"}, {"id": 2, "name": "interviewer", "role_type": null}, 7]
        }"#;

        let user = UserRecord::from_json(raw).unwrap();
        assert!(user.is_superuser);
        assert!(!user.is_active && !user.is_verified);
        let roles = user.roles.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].id, RoleId::new(2));

        let user = UserRecord::from_json(r#"{"roles": "recruiter"}"#).unwrap();
        assert_eq!(user.roles, None);
    }

    #[test]
    fn group_ids_accept_numbers_strings_or_nothing() {
        let raw = r#"{"groups": [
            {"id": 4, "name": "HR"},
            {"id": "12", "name": "Ops"},
            {"id": "a1b2c3d4-0000-4000-8000-000000000000", "name": "Sales"},
            {"id": null, "name": "Design"},
            {"name": "Support"}
        ]}"#;

        let user = UserRecord::from_json(raw).unwrap();
        let ids: Vec<_> = user.groups.iter().map(|g| g.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                Some(GroupKey::Numeric(GroupId::new(4))),
                Some(GroupKey::Numeric(GroupId::new(12))),
                Some(GroupKey::Opaque("a1b2c3d4-0000-4000-8000-000000000000".into())),
                None,
                None,
            ]
        );
    }

    #[test]
    fn serialized_record_parses_back() {
        let user = UserRecord {
            is_staff: true,
            groups: vec![Group::new(1, "Marketing Staff")],
            ..UserRecord::default()
        };
        assert_eq!(UserRecord::from_json(&user.to_json()).unwrap(), user);
    }
}
