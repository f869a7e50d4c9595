use serde::Serialize;
use thiserror::Error;

use crate::resolve::{RoleSet, RoleSource, group_name_mentions};
use crate::{RequiredRole, RoleLabel, SessionSnapshot, UserRecord};

/// Group-name fragments that mark a group as administrative.
const ADMIN_GROUP_MARKERS: [&str; 2] = ["admin", "staff"];

/// Why a session was allowed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Grant {
    /// The route only needs a signed-in visitor.
    AnySession,
    Superuser,
    Staff,
    /// `admin_roles` is non-empty.
    AdminRoles,
    /// A group name contains an administrative marker.
    GroupNameMentions(String),
    /// The resolved role set contains the label.
    RoleMembership(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("not signed in")]
    Unauthenticated,

    #[error("insufficient role: '{0}' required")]
    InsufficientRole(RequiredRole),
}

/// Decide whether a session may view a route declaring `required`.
///
/// - No IO
/// - No panics
/// - Deterministic over the snapshot
///
/// Authentication is always required, even for `RequiredRole::Authenticated`.
pub fn authorize(required: RequiredRole, snapshot: &SessionSnapshot) -> Result<Grant, AccessDenied> {
    let user = snapshot
        .authenticated_user()
        .ok_or(AccessDenied::Unauthenticated)?;

    grant_for(required, user).ok_or(AccessDenied::InsufficientRole(required))
}

fn grant_for(required: RequiredRole, user: &UserRecord) -> Option<Grant> {
    match required {
        RequiredRole::Authenticated | RequiredRole::User | RequiredRole::Techie => {
            Some(Grant::AnySession)
        }
        RequiredRole::Superadmin => user.is_superuser.then_some(Grant::Superuser),
        RequiredRole::Admin => {
            if user.is_staff {
                Some(Grant::Staff)
            } else if user.is_superuser {
                Some(Grant::Superuser)
            } else if user.has_admin_roles() {
                Some(Grant::AdminRoles)
            } else {
                group_name_mentions(user, &ADMIN_GROUP_MARKERS)
                    .map(|name| Grant::GroupNameMentions(name.to_string()))
            }
        }
        RequiredRole::Hr => {
            let roles = RoleSet::resolve(user);
            if let Some(label) = [RoleLabel::HR, RoleLabel::HIRING_MANAGER]
                .into_iter()
                .find(|label| roles.contains(label))
            {
                Some(Grant::RoleMembership(label.to_string()))
            } else if user.is_staff {
                Some(Grant::Staff)
            } else if user.is_superuser {
                Some(Grant::Superuser)
            } else {
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a routing decision, for logs and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub required_role: RequiredRole,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    /// Normalized role labels of the signed-in user (empty when signed out).
    pub resolved_roles: Vec<String>,
    pub role_source: Option<RoleSource>,
    pub grant: Option<Grant>,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    InsufficientRole,
}

/// Explain why `authorize` would allow or deny this snapshot.
///
/// Always agrees with `authorize`.
pub fn explain_access(required: RequiredRole, snapshot: &SessionSnapshot) -> AccessExplanation {
    let roles = snapshot.authenticated_user().map(RoleSet::resolve);
    let resolved_roles: Vec<String> = roles
        .as_ref()
        .map(|r| r.labels().map(|l| l.to_string()).collect())
        .unwrap_or_default();
    let role_source = roles.as_ref().map(RoleSet::source);

    match authorize(required, snapshot) {
        Ok(grant) => AccessExplanation {
            required_role: required,
            granted: true,
            reason: grant_reason(required, &grant),
            resolved_roles,
            role_source,
            grant: Some(grant),
            denial: None,
        },
        Err(denied) => AccessExplanation {
            required_role: required,
            granted: false,
            reason: match denied {
                AccessDenied::Unauthenticated if snapshot.has_token => {
                    "token present but no user record is stored".to_string()
                }
                AccessDenied::Unauthenticated => "no access token is stored".to_string(),
                AccessDenied::InsufficientRole(_) => {
                    format!("signed-in user does not satisfy role '{required}'")
                }
            },
            resolved_roles,
            role_source,
            grant: None,
            denial: Some(match denied {
                AccessDenied::Unauthenticated => DenialKind::Unauthenticated,
                AccessDenied::InsufficientRole(_) => DenialKind::InsufficientRole,
            }),
        },
    }
}

fn grant_reason(required: RequiredRole, grant: &Grant) -> String {
    match grant {
        Grant::AnySession => format!("role '{required}' admits any signed-in user"),
        Grant::Superuser => "user is a superuser".to_string(),
        Grant::Staff => "user is staff".to_string(),
        Grant::AdminRoles => "user holds admin roles".to_string(),
        Grant::GroupNameMentions(name) => format!("group '{name}' is administrative"),
        Grant::RoleMembership(label) => format!("user has role '{label}'"),
    }
}
