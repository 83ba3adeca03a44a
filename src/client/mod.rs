use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, StagePathError};

/// Field values and record-type of one fetched record
#[derive(Debug, Clone, Default)]
pub struct RecordData {
    pub fields: HashMap<String, String>,
    pub record_type_id: Option<String>,
}

impl RecordData {
    pub fn field(&self, api_name: &str) -> Option<&str> {
        self.fields.get(api_name).map(String::as_str)
    }
}

/// Field labels and default record-type of one object
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub field_labels: HashMap<String, String>,
    pub default_record_type_id: String,
}

impl ObjectMetadata {
    /// Human-readable label for a field, falling back to its API name
    pub fn field_label<'a>(&'a self, api_name: &'a str) -> &'a str {
        self.field_labels
            .get(api_name)
            .map(String::as_str)
            .unwrap_or(api_name)
    }
}

/// One allowed picklist value under a record type, in platform order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PicklistEntry {
    pub value: String,
    pub label: String,
}

impl PicklistEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Trait abstracting the host platform the path component talks to
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Fetch the record's field values and record-type identifier
    async fn fetch_record(&self, record_id: &str, fields: &[String]) -> Result<RecordData>;

    /// Fetch field labels and the default record-type for an object
    async fn fetch_object_metadata(&self, object_api_name: &str) -> Result<ObjectMetadata>;

    /// Fetch the ordered picklist values allowed for a field under a record type
    async fn fetch_picklist_values(
        &self,
        object_api_name: &str,
        record_type_id: &str,
        field_api_name: &str,
    ) -> Result<Vec<PicklistEntry>>;

    /// Write a single field value to the record
    async fn update_record(&self, record_id: &str, field_api_name: &str, value: &str)
        -> Result<()>;
}

const DEMO_RECORD_ID: &str = "a0x000000000001";
const DEMO_RECORD_TYPE_ID: &str = "012000000000000AAA";
const DEMO_LATENCY: Duration = Duration::from_millis(150);

/// In-memory client for running without a live platform.
///
/// Updates mutate the stored record, so a reload after confirming an action
/// shows the new stage just like a real backend would.
pub struct DemoClient {
    records: Mutex<HashMap<String, RecordData>>,
}

impl DemoClient {
    pub fn seeded() -> Arc<Self> {
        info!("Running with the demo client (record {})", DEMO_RECORD_ID);

        let mut fields = HashMap::new();
        fields.insert("Status__c".to_string(), "In Progress".to_string());
        let record = RecordData {
            fields,
            record_type_id: Some(DEMO_RECORD_TYPE_ID.to_string()),
        };

        let mut records = HashMap::new();
        records.insert(DEMO_RECORD_ID.to_string(), record);

        Arc::new(Self {
            records: Mutex::new(records),
        })
    }

    pub fn demo_record_id() -> &'static str {
        DEMO_RECORD_ID
    }
}

#[async_trait]
impl PlatformClient for DemoClient {
    async fn fetch_record(&self, record_id: &str, _fields: &[String]) -> Result<RecordData> {
        tokio::time::sleep(DEMO_LATENCY).await;
        let records = self.records.lock().map_err(|_| StagePathError::DataLoad {
            kind: "record",
            detail: "demo store poisoned".to_string(),
        })?;
        records
            .get(record_id)
            .cloned()
            .ok_or_else(|| StagePathError::DataLoad {
                kind: "record",
                detail: format!("no record with id {record_id}"),
            })
    }

    async fn fetch_object_metadata(&self, object_api_name: &str) -> Result<ObjectMetadata> {
        tokio::time::sleep(DEMO_LATENCY).await;
        if object_api_name != "Plan__c" {
            return Err(StagePathError::DataLoad {
                kind: "object metadata",
                detail: format!("unknown object {object_api_name}"),
            });
        }

        let mut field_labels = HashMap::new();
        field_labels.insert("Status__c".to_string(), "Status".to_string());
        field_labels.insert("Name".to_string(), "Name".to_string());

        Ok(ObjectMetadata {
            field_labels,
            default_record_type_id: DEMO_RECORD_TYPE_ID.to_string(),
        })
    }

    async fn fetch_picklist_values(
        &self,
        object_api_name: &str,
        record_type_id: &str,
        field_api_name: &str,
    ) -> Result<Vec<PicklistEntry>> {
        tokio::time::sleep(DEMO_LATENCY).await;
        debug!(
            "Demo picklist fetch: {}/{} for record type {}",
            object_api_name, field_api_name, record_type_id
        );

        if field_api_name != "Status__c" {
            return Ok(Vec::new());
        }

        Ok(vec![
            PicklistEntry::new("New", "New"),
            PicklistEntry::new("In Progress", "In Progress"),
            PicklistEntry::new("Review", "Review"),
            PicklistEntry::new("Done", "Done"),
        ])
    }

    async fn update_record(
        &self,
        record_id: &str,
        field_api_name: &str,
        value: &str,
    ) -> Result<()> {
        tokio::time::sleep(DEMO_LATENCY).await;
        let mut records = self.records.lock().map_err(|_| {
            StagePathError::Update("demo store poisoned".to_string())
        })?;
        let record = records
            .get_mut(record_id)
            .ok_or_else(|| StagePathError::Update(format!("no record with id {record_id}")))?;
        record
            .fields
            .insert(field_api_name.to_string(), value.to_string());
        info!("Demo update: {}.{} = {}", record_id, field_api_name, value);
        Ok(())
    }
}
