use std::collections::HashSet;
use std::fmt;

#[cfg(test)]
use mockall::automock;
use parking_lot::RwLock;
use tracing::debug;

use crate::Result;
use crate::SecurityError;

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Read,
    Listen,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Read => "read",
            ActionType::Listen => "listen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Map,
    List,
    Set,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Map => "map",
            PermissionKind::List => "list",
            PermissionKind::Set => "set",
        }
    }
}

/// A single action on a named distributed object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    pub kind: PermissionKind,
    pub name: String,
    pub action: ActionType,
}

impl Permission {
    pub fn map(
        name: impl Into<String>,
        action: ActionType,
    ) -> Self {
        Self {
            kind: PermissionKind::Map,
            name: name.into(),
            action,
        }
    }

    pub fn list(
        name: impl Into<String>,
        action: ActionType,
    ) -> Self {
        Self {
            kind: PermissionKind::List,
            name: name.into(),
            action,
        }
    }

    pub fn set(
        name: impl Into<String>,
        action: ActionType,
    ) -> Self {
        Self {
            kind: PermissionKind::Set,
            name: name.into(),
            action,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind.as_str(), self.name, self.action.as_str())
    }
}

#[cfg_attr(test, automock)]
pub trait PermissionChecker: Send + Sync + 'static {
    fn check(
        &self,
        permission: &Permission,
    ) -> bool;
}

/// Grants everything. Used when security is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllPermissions;

impl PermissionChecker for AllowAllPermissions {
    fn check(
        &self,
        _permission: &Permission,
    ) -> bool {
        true
    }
}

/// In-memory grant table. A grant named `*` covers every object of its kind.
#[derive(Debug, Default)]
pub struct PermissionTable {
    grants: RwLock<HashSet<Permission>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(
        &self,
        permission: Permission,
    ) {
        self.grants.write().insert(permission);
    }

    pub fn revoke(
        &self,
        permission: &Permission,
    ) -> bool {
        self.grants.write().remove(permission)
    }
}

impl PermissionChecker for PermissionTable {
    fn check(
        &self,
        permission: &Permission,
    ) -> bool {
        let grants = self.grants.read();
        if grants.contains(permission) {
            return true;
        }
        let wildcard = Permission {
            name: WILDCARD.to_string(),
            ..permission.clone()
        };
        grants.contains(&wildcard)
    }
}

/// Asks `checker` and converts a denial into an authorization error.
pub fn ensure_permitted(
    checker: &dyn PermissionChecker,
    permission: &Permission,
) -> Result<()> {
    if checker.check(permission) {
        return Ok(());
    }
    debug!(%permission, "permission denied");
    Err(SecurityError::AccessDenied {
        kind: permission.kind.as_str(),
        object_name: permission.name.clone(),
        action: permission.action.as_str(),
    }
    .into())
}
