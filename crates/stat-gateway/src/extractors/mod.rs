//! Custom extractors for the HTTP handlers

mod validated;

pub use validated::{ValidatedJson, ValidatedQuery};
