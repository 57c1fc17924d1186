//! Configuration management for the grid core.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support (`CONFIG_PATH`)
//! - Environment variable overrides (`GRID__` prefix)
//! - Component-wise validation
mod cluster;
mod listener;
mod partition;
mod record;
mod retry;
pub use cluster::*;
pub use listener::*;
pub use partition::*;
pub use record::*;
pub use retry::*;

use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

pub(crate) const ENV_PREFIX: &str = "GRID";

/// Main configuration container for the grid core components
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct GridConfig {
    /// Member identity
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Partition layout and worker queues
    #[serde(default)]
    pub partition: PartitionConfig,
    /// Event dispatch parameters
    #[serde(default)]
    pub listener: ListenerConfig,
    /// Record expiration and eviction parameters
    #[serde(default)]
    pub record: RecordConfig,
    /// Retry policies for routed operations
    #[serde(default)]
    pub retry: RetryPolicies,
}

impl Debug for GridConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("GridConfig")
            .field("cluster", &self.cluster)
            .field("partition", &self.partition)
            .finish_non_exhaustive()
    }
}

impl GridConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `GRID__` prefix (highest priority)
    ///
    /// # Note
    /// Validation is deferred so further overrides can be applied with
    /// `with_override_config()`. Callers MUST call `validate()` before use.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("GRID__PARTITION__PARTITION_COUNT", "16");
    /// let cfg = GridConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` from the first subsystem that fails.
    pub fn validate(self) -> Result<Self> {
        self.cluster.validate()?;
        self.partition.validate()?;
        self.listener.validate()?;
        self.record.validate()?;
        self.retry.validate()?;
        Ok(self)
    }
}
