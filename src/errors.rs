//! Grid Error Hierarchy
//!
//! Defines the error types surfaced by the record store, the entry-view read
//! path and the listener pipeline, categorized by the layer that raises them.

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Permission predicate denied the request
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// Caller supplied an argument the grid does not recognise
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Partition ownership changed or the partition is gone
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Named-field codec failures
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Listener pipeline failures
    #[error(transparent)]
    Event(#[from] EventError),

    /// Infrastructure-level failures (tasks, channels)
    #[error(transparent)]
    System(#[from] SystemError),

    #[error("Retry exhausted: {0}")]
    RetryExhausted(String),

    #[error("Retry timeout")]
    RetryTimeout,

    /// Unrecoverable failures
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    /// Only an ownership change mid-flight is safe to resubmit wholesale.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Routing(RoutingError::PartitionMoved { .. }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("Permission denied: {action} on {kind} '{object_name}'")]
    AccessDenied {
        kind: &'static str,
        object_name: String,
        action: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Partition is migrating to another owner; resubmit after re-routing
    #[error("Partition {partition_id} moved during request")]
    PartitionMoved { partition_id: u32 },

    /// Partition worker is no longer accepting operations
    #[error("Partition {partition_id} stopped")]
    PartitionStopped { partition_id: u32 },

    #[error("Partition {partition_id} does not exist (partition count: {partition_count})")]
    UnknownPartition {
        partition_id: u32,
        partition_count: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("Bincode serialization failed: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Missing field '{0}'")]
    MissingField(String),

    #[error("Field '{field}' has type {found}, expected {expected}")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field '{field}' value {value} is out of range")]
    ValueOutOfRange {
        field: String,
        value: i64,
    },

    #[error("Raw data exhausted after {0} segments")]
    RawDataExhausted(usize),

    #[error("Class mismatch (expected: {expected_factory}/{expected_class}, actual: {factory_id}/{class_id})")]
    ClassMismatch {
        expected_factory: i32,
        expected_class: i32,
        factory_id: i32,
        class_id: i32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Upstream contract violation: an event of the wrong representation
    /// reached a listener.
    #[error("Expecting: {expected}, Found: {found}")]
    UnexpectedEventType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Event service is not running")]
    ServiceStopped,

    #[error("Client endpoint {0} is no longer connected")]
    EndpointDisconnected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),

    #[error("Response channel closed: {0}")]
    ResponseChannelClosed(String),

    #[error("General server error: {0}")]
    GeneralServer(String),
}

// ============== Conversion Implementations ============== //
impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        SystemError::TaskFailed(err).into()
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        SerializationError::Bincode(err).into()
    }
}
