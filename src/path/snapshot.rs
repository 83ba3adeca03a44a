/// Reserved value meaning "the final/closing stage was clicked".
///
/// Distinct from any real picklist value; never written to the record.
pub const TERMINAL_STAGE_VALUE: &str = "__stagepath_terminal__";

/// Point-in-time summary of where the progression stands.
///
/// Recomputed on every click or data arrival, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Current value equals closed-ok or closed-ko
    pub is_closed: bool,
    /// Value the user clicked, if any (may be the terminal sentinel)
    pub selected: Option<String>,
    /// The record's actual stored value
    pub current: Option<String>,
}

impl Snapshot {
    pub fn new(is_closed: bool, selected: Option<String>, current: Option<String>) -> Self {
        Self {
            is_closed,
            selected,
            current,
        }
    }

    pub fn selected_is_terminal(&self) -> bool {
        self.selected.as_deref() == Some(TERMINAL_STAGE_VALUE)
    }
}
