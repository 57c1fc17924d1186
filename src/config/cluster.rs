use nanoid::nanoid;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ClusterConfig {
    /// Identity of the local member. Events produced here are tagged with it
    /// and local-only registrations only fire for it.
    ///
    /// Generated when left empty.
    #[serde(default)]
    pub member_id: Option<String>,
}

impl ClusterConfig {
    /// Validates cluster configuration
    /// # Errors
    /// Returns `Error::InvalidConfig` if an explicit member id is blank
    pub fn validate(&self) -> Result<()> {
        if let Some(id) = &self.member_id {
            if id.trim().is_empty() {
                return Err(Error::InvalidConfig("member_id cannot be blank".into()));
            }
        }
        Ok(())
    }

    /// Returns the configured member id or generates a fresh one.
    pub fn resolve_member_id(&self) -> String {
        self.member_id.clone().unwrap_or_else(|| nanoid!())
    }
}
