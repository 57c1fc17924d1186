//! Permission model consumed by the read path and listener registration.
//!
//! The grid does not decide who may do what; it asks an injected
//! [`PermissionChecker`] and turns a denial into
//! [`SecurityError::AccessDenied`](crate::SecurityError).
mod permission;


pub use permission::*;
