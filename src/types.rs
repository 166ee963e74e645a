//! Core echelon types

use crate::error::EchelonError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Default scope separator
pub const DEFAULT_SEPARATOR: &str = "::";

/// Default backing collection name
pub const DEFAULT_COLLECTION: &str = "echelons";

/// Member type discriminator
///
/// Selects both the membership test used by the evaluator and the
/// set-valued field mutated by the registry. A closed two-variant set;
/// anything else is rejected at the boundary with `InvalidMemberType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    /// An individual user identifier
    User,
    /// A group identifier
    Group,
}

impl MemberType {
    /// Name of the set-valued record field this member type lives in
    pub fn field(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for MemberType {
    type Err = EchelonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "users" => Ok(Self::User),
            "group" | "groups" => Ok(Self::Group),
            other => Err(EchelonError::InvalidMemberType(other.to_string())),
        }
    }
}

/// A member being checked for access
///
/// The store never constructs, persists, or mutates members; callers build
/// one at the call site from their own identity object. The two variants
/// mirror the two membership tests: a user carries a stable id plus the
/// group ids it belongs to, a group check is just a plain group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Member {
    /// A user with a stable identifier and optional group memberships
    User {
        /// Stable user identifier
        id: String,
        /// Group identifiers, empty if the application has no group concept
        #[serde(default)]
        groups: Vec<String>,
    },
    /// A plain group identifier
    Group {
        /// Group identifier
        id: String,
    },
}

impl Member {
    /// Create a user member with no group memberships
    pub fn user(id: impl Into<String>) -> Self {
        Self::User {
            id: id.into(),
            groups: Vec::new(),
        }
    }

    /// Create a user member with group memberships
    pub fn user_in_groups<I, S>(id: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::User {
            id: id.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a group member
    pub fn group(id: impl Into<String>) -> Self {
        Self::Group { id: id.into() }
    }

    /// The member's stable identifier
    pub fn id(&self) -> &str {
        match self {
            Self::User { id, .. } | Self::Group { id } => id,
        }
    }

    /// Which member type this member resolves to
    pub fn member_type(&self) -> MemberType {
        match self {
            Self::User { .. } => MemberType::User,
            Self::Group { .. } => MemberType::Group,
        }
    }
}

/// Display metadata written unconditionally on every definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchelonMeta {
    /// Scope identifier, unique per record
    pub scope: String,
    /// Pretty display name
    pub name: String,
    /// Help text describing the echelon's purpose
    pub help: String,
}

/// Member sets seeded only when a record is first inserted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSets {
    /// User identifiers
    #[serde(default)]
    pub users: BTreeSet<String>,
    /// Group identifiers
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

/// A single echelon record as persisted in the store
///
/// Uniquely identified by `scope`. Member sets are duplicate-free by
/// construction; insertion order is not significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echelon {
    /// Scope identifier, unique per record
    pub scope: String,
    /// Pretty display name, defaults to the scope string
    pub name: String,
    /// Help text, defaults to a generated sentence referencing the scope
    pub help: String,
    /// User identifiers granted this echelon
    #[serde(default)]
    pub users: BTreeSet<String>,
    /// Group identifiers granted this echelon
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Echelon {
    /// The member set selected by a member type
    pub fn members(&self, member_type: MemberType) -> &BTreeSet<String> {
        match member_type {
            MemberType::User => &self.users,
            MemberType::Group => &self.groups,
        }
    }

    /// Mutable access to the member set selected by a member type
    pub(crate) fn members_mut(&mut self, member_type: MemberType) -> &mut BTreeSet<String> {
        match member_type {
            MemberType::User => &mut self.users,
            MemberType::Group => &mut self.groups,
        }
    }

    /// Membership test at this single level
    ///
    /// A user is admitted when its id is in `users` or any of its groups is
    /// in `groups`; a group is admitted when its id is in `groups`.
    pub fn admits(&self, member: &Member) -> bool {
        match member {
            Member::User { id, groups } => {
                self.users.contains(id) || groups.iter().any(|g| self.groups.contains(g))
            }
            Member::Group { id } => self.groups.contains(id),
        }
    }
}

/// Store instance configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct EchelonConfig {
    /// Scope separator (default `"::"`)
    pub separator: String,
    /// Backing collection name (default `"echelons"`)
    pub collection: String,
}

impl Default for EchelonConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl EchelonConfig {
    /// Override the scope separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Override the backing collection name
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}
