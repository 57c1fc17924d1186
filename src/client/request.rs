//! Capabilities a client request can declare.
//!
//! The engine relies on these markers instead of a class hierarchy: a
//! [`SecureRequest`] is checked before execution, a [`RetryableRequest`] may
//! be resubmitted after a routing failure and a [`KeyBasedRequest`] is routed
//! to the owner of its key.
use bytes::Bytes;

use crate::Permission;
use crate::Result;

/// Audit form of one request argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParameter {
    Null,
    Bool(bool),
    Data(Bytes),
}

pub trait ClientRequest {
    fn service_name(&self) -> &str;

    /// Client API method this request implements, for auditing
    fn method_name(&self) -> &'static str;

    fn distributed_object_name(&self) -> &str;

    fn parameters(&self) -> Vec<RequestParameter>;
}

pub trait SecureRequest: ClientRequest {
    /// Fails with `Error::InvalidArgument` when no permission applies.
    fn required_permission(&self) -> Result<Permission>;
}

/// Has no side effects; resubmitting after a routing failure is safe.
pub trait RetryableRequest: ClientRequest {}

pub trait KeyBasedRequest: ClientRequest {
    fn key(&self) -> &Bytes;
}
