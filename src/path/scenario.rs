use super::snapshot::{Snapshot, TERMINAL_STAGE_VALUE};
use super::stages::StageSet;

/// Substitution token replaced by the field's human-readable label
pub const FIELD_TOKEN: &str = "{field}";

/// The four interaction modes governing button caption and confirmation
/// target. Derived from a Snapshot, never stored across updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Open record, nothing selected: advance to the next stage
    MarkAsComplete,
    /// Open record, a real stage selected: jump to it
    MarkAsCurrent,
    /// Open record, the final stage clicked: close the record
    SelectClosed,
    /// Closed record, the final stage re-engaged
    ChangeClosed,
}

/// Text templates for one scenario
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub selection_prompt: &'static str,
    pub action_caption: &'static str,
}

impl Layout {
    pub fn render_action_caption(&self, field_label: &str) -> String {
        self.action_caption.replace(FIELD_TOKEN, field_label)
    }

    pub fn render_selection_prompt(&self, field_label: &str) -> String {
        self.selection_prompt.replace(FIELD_TOKEN, field_label)
    }
}

impl Scenario {
    /// Pick the active scenario for a snapshot.
    ///
    /// The four predicates are tested in fixed priority order; the first match
    /// wins. A closed record with no terminal selection matches none of them,
    /// so no action is offered.
    pub fn resolve(snapshot: &Snapshot) -> Option<Scenario> {
        if !snapshot.is_closed && snapshot.selected.is_none() {
            return Some(Scenario::MarkAsComplete);
        }
        if !snapshot.is_closed && snapshot.selected.is_some() && !snapshot.selected_is_terminal() {
            return Some(Scenario::MarkAsCurrent);
        }
        if !snapshot.is_closed && snapshot.selected_is_terminal() {
            return Some(Scenario::SelectClosed);
        }
        if snapshot.is_closed && snapshot.selected_is_terminal() {
            return Some(Scenario::ChangeClosed);
        }
        None
    }

    pub fn layout(&self) -> Layout {
        match self {
            Scenario::MarkAsComplete => Layout {
                selection_prompt: "Advance {field} to the next stage",
                action_caption: "Mark {field} as Complete",
            },
            Scenario::MarkAsCurrent => Layout {
                selection_prompt: "Move {field} to the selected stage",
                action_caption: "Mark as Current {field}",
            },
            Scenario::SelectClosed => Layout {
                selection_prompt: "Close {field}",
                action_caption: "Select Closed {field}",
            },
            Scenario::ChangeClosed => Layout {
                selection_prompt: "Change the closed {field}",
                action_caption: "Change Active {field}",
            },
        }
    }
}

/// The single field value written when the pending action is confirmed.
///
/// The user is never offered closed-ko interactively; that value only ever
/// arrives from external data.
pub fn confirmation_target(
    scenario: Scenario,
    snapshot: &Snapshot,
    stages: &StageSet,
) -> Option<String> {
    let closed_ok = stages.closed_ok_value().to_string();

    match scenario {
        Scenario::MarkAsComplete => {
            let path = stages.display_path(snapshot.current.as_deref());
            let pos = path
                .iter()
                .position(|stage| stage.equals(snapshot.current.as_deref()));
            // Unknown current stage falls back to the first entry
            let next = path.get(pos.map_or(0, |p| p + 1))?;
            match next.value() {
                Some(TERMINAL_STAGE_VALUE) => Some(closed_ok),
                Some(value) if value == closed_ok || stages.is_closed_ko(Some(value)) => {
                    Some(closed_ok)
                }
                Some(value) => Some(value.to_string()),
                None => None,
            }
        }
        Scenario::MarkAsCurrent => {
            if snapshot.selected_is_terminal() {
                Some(closed_ok)
            } else {
                snapshot.selected.clone()
            }
        }
        Scenario::SelectClosed | Scenario::ChangeClosed => Some(closed_ok),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PicklistEntry;
    use crate::config::PathConfig;

    fn open(selected: Option<&str>, current: Option<&str>) -> Snapshot {
        Snapshot::new(false, selected.map(String::from), current.map(String::from))
    }

    fn closed(selected: Option<&str>, current: Option<&str>) -> Snapshot {
        Snapshot::new(true, selected.map(String::from), current.map(String::from))
    }

    fn stage_set(values: &[&str], closed_ko: Option<&str>) -> StageSet {
        let entries: Vec<_> = values.iter().map(|v| PicklistEntry::new(*v, *v)).collect();
        let config = PathConfig {
            closed_ok: "Done".to_string(),
            closed_ko: closed_ko.map(String::from),
            ..PathConfig::default()
        };
        StageSet::from_picklist(&entries, &config)
    }

    #[test]
    fn open_without_selection_is_mark_as_complete() {
        let snapshot = open(None, Some("New"));
        assert_eq!(Scenario::resolve(&snapshot), Some(Scenario::MarkAsComplete));
    }

    #[test]
    fn open_with_real_selection_is_mark_as_current() {
        let snapshot = open(Some("Review"), Some("New"));
        assert_eq!(Scenario::resolve(&snapshot), Some(Scenario::MarkAsCurrent));
    }

    #[test]
    fn open_with_terminal_selection_is_select_closed() {
        let snapshot = open(Some(TERMINAL_STAGE_VALUE), Some("New"));
        assert_eq!(Scenario::resolve(&snapshot), Some(Scenario::SelectClosed));
    }

    #[test]
    fn closed_with_terminal_selection_is_change_closed() {
        let snapshot = closed(Some(TERMINAL_STAGE_VALUE), Some("Done"));
        assert_eq!(Scenario::resolve(&snapshot), Some(Scenario::ChangeClosed));
    }

    #[test]
    fn closed_without_terminal_selection_has_no_scenario() {
        assert_eq!(Scenario::resolve(&closed(None, Some("Done"))), None);
        assert_eq!(Scenario::resolve(&closed(Some("New"), Some("Done"))), None);
    }

    #[test]
    fn captions_substitute_the_field_label() {
        let layout = Scenario::MarkAsComplete.layout();
        assert_eq!(layout.render_action_caption("Status"), "Mark Status as Complete");

        let layout = Scenario::ChangeClosed.layout();
        assert_eq!(layout.render_action_caption("Status"), "Change Active Status");
    }

    #[test]
    fn mark_as_complete_targets_the_next_stage() {
        let stages = stage_set(&["New", "In Progress", "Done"], None);
        let snapshot = open(None, Some("New"));
        let target = confirmation_target(Scenario::MarkAsComplete, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("In Progress"));
    }

    #[test]
    fn mark_as_complete_from_last_open_stage_targets_closed_ok() {
        let stages = stage_set(&["New", "In Progress", "Done"], None);
        let snapshot = open(None, Some("In Progress"));
        let target = confirmation_target(Scenario::MarkAsComplete, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("Done"));
    }

    #[test]
    fn mark_as_complete_never_targets_closed_ko() {
        // Cancelled sits right after In Progress in supply order; the
        // assembler removes it, so advancing lands on closed-ok
        let stages = stage_set(&["New", "In Progress", "Cancelled", "Done"], Some("Cancelled"));
        let snapshot = open(None, Some("In Progress"));
        let target = confirmation_target(Scenario::MarkAsComplete, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("Done"));
    }

    #[test]
    fn mark_as_complete_with_unknown_current_targets_the_first_stage() {
        let stages = stage_set(&["New", "In Progress", "Done"], None);
        let snapshot = open(None, Some("Archived"));
        let target = confirmation_target(Scenario::MarkAsComplete, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("New"));
    }

    #[test]
    fn mark_as_current_targets_the_selection_verbatim() {
        let stages = stage_set(&["New", "In Progress", "Done"], None);
        let snapshot = open(Some("New"), Some("In Progress"));
        let target = confirmation_target(Scenario::MarkAsCurrent, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("New"));
    }

    #[test]
    fn mark_as_current_maps_the_sentinel_to_closed_ok() {
        let stages = stage_set(&["New", "In Progress", "Done"], None);
        let snapshot = open(Some(TERMINAL_STAGE_VALUE), Some("New"));
        let target = confirmation_target(Scenario::MarkAsCurrent, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("Done"));
    }

    #[test]
    fn closing_scenarios_target_closed_ok_unconditionally() {
        let stages = stage_set(&["New", "In Progress", "Done", "Cancelled"], Some("Cancelled"));

        let snapshot = open(Some(TERMINAL_STAGE_VALUE), Some("New"));
        let target = confirmation_target(Scenario::SelectClosed, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("Done"));

        let snapshot = closed(Some(TERMINAL_STAGE_VALUE), Some("Cancelled"));
        let target = confirmation_target(Scenario::ChangeClosed, &snapshot, &stages);
        assert_eq!(target.as_deref(), Some("Done"));
    }
}
