//! Cross-cutting, shared constants.
//!
//! Runtime overrides for most of these live in [`crate::config::Config`]; the values
//! here are the defaults and the fixed strings that appear on the wire.

/// Number of identifiers returned by `/recommend` unless `SHELF_TOP_K` says otherwise.
pub const DEFAULT_TOP_K: usize = 9;

/// Default HTTP port (matches the previous deployment's uvicorn default).
pub const DEFAULT_PORT: u16 = 8000;

/// Origins allowed to call the service from a browser.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] =
    ["http://localhost:10000", "http://43.201.250.218:10000"];

/// Max tokens per text when neither `SHELF_MAX_SEQ_LEN` nor `sentence_bert_config.json` sets one.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Output dimension of BERT-base sentence encoders (and of the stub embedder).
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Detail message returned when `/recommend` receives no candidates.
pub const EMPTY_FEATURE_DETAIL: &str = "Feature list is empty.";
