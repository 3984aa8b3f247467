use crate::scanner::metadata::{Field, TagReader, Track};
use crate::scanner::{self, LocateError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Case-insensitive substring filters, one per field. All must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    filters: BTreeMap<Field, String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the filter for `field`.
    pub fn with(mut self, field: Field, needle: impl Into<String>) -> Self {
        self.filters.insert(field, needle.into().to_lowercase());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// A missing field counts as empty, so only an empty needle matches it.
    pub fn matches(&self, track: &Track) -> bool {
        self.filters.iter().all(|(field, needle)| {
            track
                .field(*field)
                .unwrap_or("")
                .to_lowercase()
                .contains(needle.as_str())
        })
    }
}

/// Find candidate files under `root` whose tags satisfy `query`.
///
/// The root is checked up front; the walk and the tag reads happen lazily as
/// the returned iterator is consumed, and untagged files never match.
pub fn search<'a, R: TagReader>(
    root: &Path,
    query: &'a SearchQuery,
    reader: &'a R,
    follow_links: bool,
) -> Result<impl Iterator<Item = PathBuf> + use<'a, R>, LocateError> {
    scanner::validate_root(root)?;

    Ok(scanner::list_candidates(root, follow_links).filter(move |path| {
        reader
            .read_track(path)
            .is_some_and(|track| query.matches(&track))
    }))
}
