/// Dynamic status bar state, updated as the path state changes
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "h/l: move along the path")
    pub left_hint: String,
    /// Right side hint text (e.g., "Enter: confirm  q: quit")
    pub right_hint: String,
}

impl StatusBarState {
    /// Hints while the loads are still in flight
    pub fn loading() -> Self {
        Self {
            left_hint: "Loading record data...".to_string(),
            right_hint: "q: quit".to_string(),
        }
    }

    /// Hints for browsing the path with nothing selected
    pub fn browsing() -> Self {
        Self {
            left_hint: "h/l: move  Space: select stage".to_string(),
            right_hint: "Enter: confirm  ?: help  q: quit".to_string(),
        }
    }

    /// Hints when a stage is selected
    pub fn stage_selected() -> Self {
        Self {
            left_hint: "Space: deselect  Esc: clear".to_string(),
            right_hint: "Enter: confirm  q: quit".to_string(),
        }
    }

    /// Hints for a closed record with no pending action
    pub fn closed() -> Self {
        Self {
            left_hint: "Record is closed".to_string(),
            right_hint: "Space on final stage: reopen  q: quit".to_string(),
        }
    }

    /// Hints when validation or a load failure halted interaction
    pub fn halted() -> Self {
        Self {
            left_hint: "Interaction halted".to_string(),
            right_hint: "r: reload  q: quit".to_string(),
        }
    }

    /// Hints while the update is in flight
    pub fn updating() -> Self {
        Self {
            left_hint: "Updating...".to_string(),
            right_hint: String::new(),
        }
    }

    /// Hints while the help overlay is open
    pub fn help() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Esc: close help".to_string(),
        }
    }
}
