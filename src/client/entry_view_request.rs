use bytes::Bytes;
use tracing::debug;

use super::ClientEngine;
use super::ClientRequest;
use super::KeyBasedRequest;
use super::RequestParameter;
use super::RetryableRequest;
use super::SecureRequest;
use crate::constants::FIELD_NAME;
use crate::constants::FIELD_THREAD_ID;
use crate::constants::MAP_GET_ENTRY_VIEW_CLASS_ID;
use crate::constants::MAP_PORTABLE_FACTORY_ID;
use crate::constants::MAP_SERVICE_NAME;
use crate::metrics::ENTRY_VIEW_REQUESTS;
use crate::ActionType;
use crate::EntryView;
use crate::OperationContext;
use crate::Permission;
use crate::Portable;
use crate::PortableReader;
use crate::PortableWriter;
use crate::Result;

/// Reads the metadata snapshot of one map entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGetEntryViewRequest {
    pub name: String,
    pub key: Bytes,
    /// Correlates operations of one client thread; forwarded, never locked on
    pub thread_id: i64,
}

impl MapGetEntryViewRequest {
    pub fn new(
        name: impl Into<String>,
        key: Bytes,
        thread_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            key,
            thread_id,
        }
    }

    /// Absence of the key is `Ok(None)`, never an error.
    pub async fn process(
        &self,
        engine: &ClientEngine,
    ) -> Result<Option<EntryView>> {
        if let Err(e) = engine.check_permission(self) {
            ENTRY_VIEW_REQUESTS.with_label_values(&["denied"]).inc();
            return Err(e);
        }

        let name = self.name.clone();
        let key = self.key.clone();
        let ctx = OperationContext::new(self.method_name(), self.thread_id);
        let result = engine
            .invoke_on_key_owner(self, ctx, move |container| {
                container.record_store.entry_view(&name, &key)
            })
            .await;

        let outcome = match &result {
            Ok(Some(_)) => "hit",
            Ok(None) => "miss",
            Err(_) => "error",
        };
        ENTRY_VIEW_REQUESTS.with_label_values(&[outcome]).inc();
        debug!(map = %self.name, outcome, "entry view processed");
        result
    }
}

impl ClientRequest for MapGetEntryViewRequest {
    fn service_name(&self) -> &str {
        MAP_SERVICE_NAME
    }

    fn method_name(&self) -> &'static str {
        "getEntryView"
    }

    fn distributed_object_name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Vec<RequestParameter> {
        vec![RequestParameter::Data(self.key.clone())]
    }
}

impl SecureRequest for MapGetEntryViewRequest {
    fn required_permission(&self) -> Result<Permission> {
        Ok(Permission::map(self.name.clone(), ActionType::Read))
    }
}

impl RetryableRequest for MapGetEntryViewRequest {}

impl KeyBasedRequest for MapGetEntryViewRequest {
    fn key(&self) -> &Bytes {
        &self.key
    }
}

impl Portable for MapGetEntryViewRequest {
    const FACTORY_ID: i32 = MAP_PORTABLE_FACTORY_ID;
    const CLASS_ID: i32 = MAP_GET_ENTRY_VIEW_CLASS_ID;

    fn write_portable(
        &self,
        writer: &mut dyn PortableWriter,
    ) -> Result<()> {
        writer.write_utf(FIELD_NAME, &self.name)?;
        writer.write_long(FIELD_THREAD_ID, self.thread_id)?;
        writer.write_raw_data(&self.key)
    }

    fn read_portable(reader: &mut dyn PortableReader) -> Result<Self> {
        let name = reader.read_utf(FIELD_NAME)?;
        let thread_id = reader.read_long(FIELD_THREAD_ID)?;
        let key = reader.read_raw_data()?;
        Ok(Self { name, key, thread_id })
    }
}
