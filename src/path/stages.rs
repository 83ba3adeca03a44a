use crate::client::PicklistEntry;
use crate::config::PathConfig;
use crate::error::{Result, StagePathError};

use super::snapshot::TERMINAL_STAGE_VALUE;
use super::stage::Stage;

/// The known stages of one record, split into open steps and the remembered
/// closed entries.
///
/// Indices follow picklist supply order, so `Stage::is_before` reproduces the
/// platform ordering exactly.
#[derive(Debug, Clone)]
pub struct StageSet {
    steps: Vec<Stage>,
    closed_ok: Option<Stage>,
    closed_ko: Option<Stage>,
    closed_ok_value: String,
    closed_ko_value: Option<String>,
    last_step_label: String,
    supplied: usize,
}

impl StageSet {
    pub fn from_picklist(entries: &[PicklistEntry], config: &PathConfig) -> Self {
        let mut steps = Vec::new();
        let mut closed_ok = None;
        let mut closed_ko = None;

        for (index, entry) in entries.iter().enumerate() {
            let stage = Stage::new(entry.value.clone(), entry.label.clone(), index);
            if entry.value == config.closed_ok {
                closed_ok = Some(stage);
            } else if config.closed_ko.as_deref() == Some(entry.value.as_str()) {
                closed_ko = Some(stage);
            } else {
                steps.push(stage);
            }
        }

        Self {
            steps,
            closed_ok,
            closed_ko,
            closed_ok_value: config.closed_ok.clone(),
            closed_ko_value: config.closed_ko.clone(),
            last_step_label: config.last_step_label.clone(),
            supplied: entries.len(),
        }
    }

    /// Usability checks on the supplied stage set.
    ///
    /// Failures are reported to the user and halt interaction; they do not
    /// tear the component down.
    pub fn validate(&self) -> Result<()> {
        if self.supplied < 2 {
            return Err(StagePathError::InsufficientStages(self.supplied));
        }
        if self.closed_ok.is_none() {
            return Err(StagePathError::MissingClosedOkValue(
                self.closed_ok_value.clone(),
            ));
        }
        Ok(())
    }

    pub fn is_closed_ok(&self, current: Option<&str>) -> bool {
        current == Some(self.closed_ok_value.as_str())
    }

    pub fn is_closed_ko(&self, current: Option<&str>) -> bool {
        self.closed_ko_value.as_deref().is_some() && current == self.closed_ko_value.as_deref()
    }

    /// Whether the current value is one of the two terminal values
    pub fn is_closed(&self, current: Option<&str>) -> bool {
        self.is_closed_ok(current) || self.is_closed_ko(current)
    }

    pub fn closed_ok_value(&self) -> &str {
        &self.closed_ok_value
    }

    /// The ordered list of stages to display.
    ///
    /// Open steps first, then exactly one terminal entry: the real closed
    /// stage when the record is already closed, otherwise a synthetic final
    /// stage carrying the terminal sentinel.
    pub fn display_path(&self, current: Option<&str>) -> Vec<Stage> {
        let mut path = self.steps.clone();

        let terminal = if self.is_closed_ok(current) {
            self.closed_ok.clone()
        } else if self.is_closed_ko(current) {
            self.closed_ko.clone()
        } else {
            None
        };

        match terminal {
            Some(stage) => path.push(stage),
            None => {
                let label = self
                    .closed_ok
                    .as_ref()
                    .map(|stage| stage.label().to_string())
                    .unwrap_or_else(|| self.last_step_label.clone());
                path.push(Stage::synthetic(TERMINAL_STAGE_VALUE, label));
            }
        }

        path
    }

    /// The stage matching the record's current value, or a placeholder with
    /// `has_value() == false` when nothing matches
    pub fn current_stage(&self, current: Option<&str>) -> Stage {
        self.display_path(current)
            .into_iter()
            .find(|stage| stage.equals(current))
            .unwrap_or_else(Stage::missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::stage::StageIndex;

    fn entries(values: &[&str]) -> Vec<PicklistEntry> {
        values.iter().map(|v| PicklistEntry::new(*v, *v)).collect()
    }

    fn config() -> PathConfig {
        PathConfig {
            closed_ok: "Done".to_string(),
            ..PathConfig::default()
        }
    }

    #[test]
    fn valid_set_passes_validation() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress", "Done"]), &config());
        assert!(set.validate().is_ok());
    }

    #[test]
    fn missing_closed_ok_is_reported_with_configured_value() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress"]), &config());
        match set.validate() {
            Err(StagePathError::MissingClosedOkValue(value)) => assert_eq!(value, "Done"),
            other => panic!("expected MissingClosedOkValue, got {other:?}"),
        }
    }

    #[test]
    fn one_stage_is_insufficient() {
        let set = StageSet::from_picklist(&entries(&["Done"]), &config());
        assert!(matches!(
            set.validate(),
            Err(StagePathError::InsufficientStages(1))
        ));
    }

    #[test]
    fn empty_set_is_insufficient() {
        let set = StageSet::from_picklist(&[], &config());
        assert!(matches!(
            set.validate(),
            Err(StagePathError::InsufficientStages(0))
        ));
    }

    #[test]
    fn open_record_gets_synthetic_terminal_with_closed_ok_label() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress", "Done"]), &config());
        assert!(!set.is_closed(Some("In Progress")));

        let path = set.display_path(Some("In Progress"));
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].value(), Some("New"));
        assert_eq!(path[1].value(), Some("In Progress"));
        assert_eq!(path[2].value(), Some(TERMINAL_STAGE_VALUE));
        assert_eq!(path[2].label(), "Done");
        assert_eq!(path[2].index(), StageIndex::Unbounded);
    }

    #[test]
    fn closed_record_gets_the_real_closed_stage() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress", "Done"]), &config());
        assert!(set.is_closed(Some("Done")));

        let path = set.display_path(Some("Done"));
        let terminal = path.last().unwrap();
        assert_eq!(terminal.value(), Some("Done"));
        assert_eq!(terminal.index(), StageIndex::At(2));
    }

    #[test]
    fn closed_ko_record_gets_the_remembered_ko_stage() {
        let mut config = config();
        config.closed_ko = Some("Cancelled".to_string());
        let set =
            StageSet::from_picklist(&entries(&["New", "In Progress", "Done", "Cancelled"]), &config);

        assert!(set.is_closed(Some("Cancelled")));
        let path = set.display_path(Some("Cancelled"));
        assert_eq!(path.len(), 3);
        assert_eq!(path.last().unwrap().value(), Some("Cancelled"));
        // Done was removed from the open steps as well
        assert!(path.iter().all(|s| s.value() != Some("Done")));
    }

    #[test]
    fn unconfigured_ko_value_stays_a_normal_step() {
        let set =
            StageSet::from_picklist(&entries(&["New", "Cancelled", "Done"]), &config());
        let path = set.display_path(Some("New"));
        assert_eq!(path[1].value(), Some("Cancelled"));
    }

    #[test]
    fn synthetic_label_falls_back_to_last_step_label() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress"]), &config());
        let path = set.display_path(Some("New"));
        assert_eq!(path.last().unwrap().label(), "Closed");
    }

    #[test]
    fn unmatched_current_value_yields_placeholder() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress", "Done"]), &config());
        let current = set.current_stage(Some("Archived"));
        assert!(!current.has_value());
    }

    #[test]
    fn matched_current_value_yields_the_stage() {
        let set = StageSet::from_picklist(&entries(&["New", "In Progress", "Done"]), &config());
        let current = set.current_stage(Some("In Progress"));
        assert_eq!(current.value(), Some("In Progress"));
        assert_eq!(current.index(), StageIndex::At(1));
    }
}
