// core/src/error.rs
use thiserror::Error;

/// Ukjent kategori-etikett (overflate, fart, dekktype, hjulstørrelse).
/// Dette er et kontraktsbrudd fra kalleren og skal aldri defaultes stille.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} label: {label:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub label: String,
}

/// Feil fra vær-/høydetilbyder. Behandles som "data mangler", ikke som krasj.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("http request failed: {0}")]
    Http(String),
    #[error("could not decode provider response: {0}")]
    Decode(String),
    #[error("no hourly sample near {0}")]
    NoSample(String),
    #[error("provider returned no usable {0}")]
    MissingValue(&'static str),
}

/// Feil fra JSON-inngangene i `api`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("parse error ({what}) at {path}: {message}")]
    Parse {
        what: &'static str,
        path: String,
        message: String,
    },
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
