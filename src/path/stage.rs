/// Ordinal position of a stage along the path.
///
/// `Unbounded` is reserved for the synthetic final stage and sorts after every
/// bounded position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageIndex {
    At(usize),
    Unbounded,
}

/// One allowed value of the tracked picklist field, with display label and
/// ordinal position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    value: Option<String>,
    label: String,
    index: StageIndex,
}

impl Stage {
    pub fn new(value: impl Into<String>, label: impl Into<String>, index: usize) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
            index: StageIndex::At(index),
        }
    }

    /// The synthetic final stage appended while the record is still open
    pub fn synthetic(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
            index: StageIndex::Unbounded,
        }
    }

    /// Placeholder for a current value that matches none of the known stages
    /// (e.g. a picklist value disabled for the record type)
    pub fn missing() -> Self {
        Self {
            value: None,
            label: String::new(),
            index: StageIndex::At(0),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> StageIndex {
        self.index
    }

    /// Value-only comparison, tolerant of "no value" on either side
    pub fn equals(&self, candidate: Option<&str>) -> bool {
        self.value.as_deref() == candidate
    }

    pub fn is_before(&self, other: &Stage) -> bool {
        self.index < other.index
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_matches_on_value_only() {
        let stage = Stage::new("New", "Brand new", 0);
        assert!(stage.equals(Some("New")));
        assert!(!stage.equals(Some("Done")));
        assert!(!stage.equals(None));
    }

    #[test]
    fn missing_stage_never_matches_a_real_value() {
        let missing = Stage::missing();
        assert!(!missing.has_value());
        assert!(!missing.equals(Some("New")));
        // both sides empty compare equal
        assert!(missing.equals(None));
    }

    #[test]
    fn synthetic_stage_sorts_after_every_real_stage() {
        let last = Stage::new("Review", "Review", 42);
        let synthetic = Stage::synthetic("__closed__", "Done");
        assert!(last.is_before(&synthetic));
        assert!(!synthetic.is_before(&last));
    }

    #[test]
    fn is_before_follows_supply_order() {
        let first = Stage::new("New", "New", 0);
        let second = Stage::new("In Progress", "In Progress", 1);
        assert!(first.is_before(&second));
        assert!(!second.is_before(&first));
        assert!(!first.is_before(&first));
    }
}
