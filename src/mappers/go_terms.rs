//! src/mappers/go_terms.rs
use crate::functions::{MapEmitter, MapInput, Mapper};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// GO:0030420 (establishment of competence for transformation) and its children.
pub const DEFAULT_TERM_CODES: [&str; 4] = ["GO:0030420", "GO:0045809", "GO:0045304", "GO:0045808"];

pub const MALFORMED_RECORDS: &str = "malformed_records";
pub const MISSING_TERM_CODE: &str = "missing_term_code";

const MIN_FIELDS: usize = 3;
const OBJECT_ID_FIELD: usize = 1;
const TERM_CODE_FIELD: usize = 4;

/// Read-only set of term codes to count. Cloning shares the underlying set.
#[derive(Debug, Clone)]
pub struct TermCodeSet(Arc<HashSet<String>>);

impl TermCodeSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TermCodeSet(Arc::new(codes.into_iter().map(Into::into).collect()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TermCodeSet {
    fn default() -> Self {
        Self::new(DEFAULT_TERM_CODES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    source: String,
    object_id: String,
    term_code: String,
}

impl MatchKey {
    pub fn new(source: &str, object_id: &str, term_code: &str) -> Self {
        MatchKey {
            source: source.to_string(),
            object_id: object_id.to_string(),
            term_code: term_code.to_string(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn term_code(&self) -> &str {
        &self.term_code
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.source, self.object_id, self.term_code)
    }
}

/// Emits `(source, object id, term code) -> 1` for every annotation line whose
/// term code is in the configured set.
#[derive(Debug, Clone, Default)]
pub struct GoTermMapper {
    term_codes: TermCodeSet,
}

impl GoTermMapper {
    pub fn new(term_codes: TermCodeSet) -> Self {
        GoTermMapper { term_codes }
    }

    pub fn term_codes(&self) -> &TermCodeSet {
        &self.term_codes
    }
}

impl Mapper for GoTermMapper {
    type Key = MatchKey;
    type Value = u64;

    fn map<E: MapEmitter<MatchKey, u64>>(&self, input: &MapInput, emitter: &mut E) {
        let fields: Vec<&str> = input.value().splitn(TERM_CODE_FIELD + 2, '\t').collect();
        if fields.len() < MIN_FIELDS {
            emitter.skip(MALFORMED_RECORDS);
            return;
        }
        let Some(term_code) = fields.get(TERM_CODE_FIELD) else {
            tracing::trace!(source = input.key(), "record has no term code column");
            emitter.skip(MISSING_TERM_CODE);
            return;
        };
        if !self.term_codes.contains(term_code) {
            return;
        }
        let object_id = fields[OBJECT_ID_FIELD];
        emitter.emit(MatchKey::new(input.key(), object_id, term_code), 1);
    }
}
