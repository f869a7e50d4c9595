//! Role resolution: one normalized view over `groups` and `user_type`.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{RoleLabel, UserRecord};

/// Where a resolved role set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    Groups,
    UserType,
    Empty,
}

/// Normalized, lower-cased role labels held by a user.
///
/// Group membership is authoritative whenever the user has any group at all;
/// `user_type` is only consulted when there are no groups. The two sources
/// are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    labels: BTreeSet<RoleLabel>,
    source: RoleSource,
}

impl RoleSet {
    pub fn resolve(user: &UserRecord) -> Self {
        if !user.groups.is_empty() {
            return Self {
                labels: user.groups.iter().map(|g| RoleLabel::new(&g.name)).collect(),
                source: RoleSource::Groups,
            };
        }

        match user.user_type.as_deref() {
            Some(user_type) if !user_type.is_empty() => Self {
                labels: BTreeSet::from([RoleLabel::new(user_type)]),
                source: RoleSource::UserType,
            },
            _ => Self {
                labels: BTreeSet::new(),
                source: RoleSource::Empty,
            },
        }
    }

    /// Exact, case-insensitive membership.
    pub fn contains(&self, label: &RoleLabel) -> bool {
        self.labels.contains(label)
    }

    pub fn source(&self) -> RoleSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &RoleLabel> {
        self.labels.iter()
    }
}

/// First group whose lower-cased name *contains* one of `needles`.
///
/// Substring, not equality: "Marketing Staff" mentions "staff". Only the
/// admin tier uses this looser rule; `user_type` is never scanned.
pub fn group_name_mentions<'a>(user: &'a UserRecord, needles: &[&str]) -> Option<&'a str> {
    user.groups
        .iter()
        .map(|g| g.name.as_str())
        .find(|name| {
            let lowered = name.to_lowercase();
            needles.iter().any(|needle| lowered.contains(needle))
        })
}
