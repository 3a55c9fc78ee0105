//! src/mappers/mod.rs
mod go_terms;
pub use go_terms::{
    DEFAULT_TERM_CODES, GoTermMapper, MALFORMED_RECORDS, MISSING_TERM_CODE, MatchKey, TermCodeSet,
};
