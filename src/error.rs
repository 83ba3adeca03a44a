use thiserror::Error;

/// Fallback shown when a failure carries no usable detail
pub const GENERIC_ERROR: &str = "Something went wrong. Press r to reload.";

#[derive(Error, Debug)]
pub enum StagePathError {
    #[error("closed stage value '{0}' is not part of the picklist")]
    MissingClosedOkValue(String),

    #[error("at least two stages are required, found {0}")]
    InsufficientStages(usize),

    #[error("field '{0}' has no picklist values for this record type")]
    UnavailablePicklistField(String),

    #[error("failed to load {kind}: {detail}")]
    DataLoad { kind: &'static str, detail: String },

    #[error("record update failed: {0}")]
    Update(String),

    #[error("record id is required (pass --record or set record_id in the config)")]
    MissingRecordId,

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StagePathError>;
