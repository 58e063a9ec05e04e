use thiserror::Error;

/// Errors raised by the transit planning engine.
///
/// Per-row conditions (`InvalidEphemeris`, `FieldParse`, `MissingField`) are
/// caught by the catalog pipeline and turned into skip outcomes; everything
/// else reaches the caller.
#[derive(Error, Debug)]
pub enum TransitError {
    #[error("Invalid ephemeris: {0}")]
    InvalidEphemeris(String),

    #[error("Unable to parse field '{field}' from value '{value}'")]
    FieldParse { field: &'static str, value: String },

    #[error("Missing catalog column: {0}")]
    MissingField(&'static str),

    #[error("Invalid night window: {0}")]
    InvalidWindow(String),

    #[error("Invalid observing date or clock time: {0}")]
    InvalidDate(String),

    #[error("SOFA atco13 failed: {0}")]
    Sofa(String),

    #[error("No Sun {event} crossing found within {search_hours} h of the reference instant")]
    NoSunCrossing {
        event: &'static str,
        search_hours: f64,
    },

    #[error("Target not found in catalog: {0}")]
    TargetNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TransitError>;

impl From<toml::de::Error> for TransitError {
    fn from(err: toml::de::Error) -> Self {
        TransitError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TransitError {
    fn from(err: serde_json::Error) -> Self {
        TransitError::Config(err.to_string())
    }
}

impl PartialEq for TransitError {
    fn eq(&self, other: &Self) -> bool {
        use TransitError::*;
        match (self, other) {
            (InvalidEphemeris(a), InvalidEphemeris(b)) => a == b,
            (
                FieldParse {
                    field: fa,
                    value: va,
                },
                FieldParse {
                    field: fb,
                    value: vb,
                },
            ) => fa == fb && va == vb,
            (MissingField(a), MissingField(b)) => a == b,
            (InvalidWindow(a), InvalidWindow(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (Sofa(a), Sofa(b)) => a == b,
            (NoSunCrossing { event: a, .. }, NoSunCrossing { event: b, .. }) => a == b,
            (TargetNotFound(a), TargetNotFound(b)) => a == b,
            (Config(a), Config(b)) => a == b,

            // not comparable: equal when the variant matches
            (Io(_), Io(_)) => true,
            (Csv(_), Csv(_)) => true,

            _ => false,
        }
    }
}
