use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, StagePathError};

const CONFIG_FILE: &str = "config.toml";

/// Configuration for the path component.
///
/// Every value except `record_id` has a usable default; `record_id` must come
/// from the config file or the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Identifier of the record whose stage field is shown
    pub record_id: String,
    /// API name of the object the record belongs to
    pub object_api_name: String,
    /// API name of the picklist field tracked by the path.
    /// Accepts the dot-qualified form "Object.Field".
    pub picklist_field: String,
    /// Picklist value that represents successful completion
    pub closed_ok: String,
    /// Picklist value that represents unsuccessful completion (optional)
    pub closed_ko: Option<String>,
    /// Label for the synthetic final stage when the closed-ok label is unknown
    pub last_step_label: String,
    /// Hide the action button entirely (view-only path)
    pub hide_update_button: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            record_id: String::new(),
            object_api_name: "Plan__c".to_string(),
            picklist_field: "Status__c".to_string(),
            closed_ok: "Done".to_string(),
            closed_ko: None,
            last_step_label: "Closed".to_string(),
            hide_update_button: false,
        }
    }
}

impl PathConfig {
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: PathConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Trailing segment of `picklist_field`: "Plan__c.Status__c" -> "Status__c"
    pub fn field_api_name(&self) -> &str {
        self.picklist_field
            .rsplit('.')
            .next()
            .unwrap_or(self.picklist_field.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_id.is_empty() {
            return Err(StagePathError::MissingRecordId);
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stagepath").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply() {
        let config = PathConfig::default();
        assert_eq!(config.object_api_name, "Plan__c");
        assert_eq!(config.picklist_field, "Status__c");
        assert_eq!(config.closed_ok, "Done");
        assert_eq!(config.closed_ko, None);
        assert_eq!(config.last_step_label, "Closed");
        assert!(!config.hide_update_button);
    }

    #[test]
    fn dot_qualified_field_normalizes_to_trailing_segment() {
        let config = PathConfig {
            picklist_field: "Plan__c.Status__c".to_string(),
            ..PathConfig::default()
        };
        assert_eq!(config.field_api_name(), "Status__c");
    }

    #[test]
    fn plain_field_is_unchanged() {
        let config = PathConfig::default();
        assert_eq!(config.field_api_name(), "Status__c");
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PathConfig::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.closed_ok, "Done");
    }

    #[test]
    fn load_from_reads_partial_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "record_id = \"a0x000000000001\"\nclosed_ko = \"Cancelled\""
        )
        .unwrap();

        let config = PathConfig::load_from(&path).unwrap();
        assert_eq!(config.record_id, "a0x000000000001");
        assert_eq!(config.closed_ko.as_deref(), Some("Cancelled"));
        // untouched keys keep their defaults
        assert_eq!(config.picklist_field, "Status__c");
    }

    #[test]
    fn missing_record_id_fails_validation() {
        let config = PathConfig::default();
        assert!(matches!(
            config.validate(),
            Err(StagePathError::MissingRecordId)
        ));
    }
}
