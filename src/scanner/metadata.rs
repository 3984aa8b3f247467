use lofty::prelude::*;
use std::path::{Path, PathBuf};

/// Tag fields a track can be searched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Artist,
    Album,
    Title,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Artist, Field::Album, Field::Title];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Title => "title",
        }
    }
}

/// One audio file and the tag fields we care about. Built per file and
/// dropped once a decision has been made about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

impl Track {
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Artist => self.artist.as_deref(),
            Field::Album => self.album.as_deref(),
            Field::Title => self.title.as_deref(),
        }
    }
}

/// Source of tag data for a file.
///
/// `None` means the file has no usable tag block, whether because it has
/// none or because it could not be decoded. Implementations must not print
/// anything themselves.
pub trait TagReader {
    fn read_track(&self, path: &Path) -> Option<Track>;
}

/// Reads tags with lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl TagReader for LoftyReader {
    fn read_track(&self, path: &Path) -> Option<Track> {
        let tagged_file = match lofty::read_from_path(path) {
            Ok(f) => f,
            Err(e) => {
                log::debug!("Could not read tags from {}: {}", path.display(), e);
                return None;
            }
        };

        // Try primary tag, then fall back
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())?;

        Some(Track {
            path: path.to_path_buf(),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            title: tag.title().map(|s| s.to_string()),
        })
    }
}

/// Canned tags keyed by file name, so copies of a tree read the same.
#[cfg(test)]
pub(crate) mod fake {
    use super::{TagReader, Track};
    use std::collections::HashMap;
    use std::path::Path;

    type Fields = (Option<String>, Option<String>, Option<String>);

    #[derive(Default)]
    pub struct FakeTags {
        tags: HashMap<String, Fields>,
    }

    impl FakeTags {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(
            mut self,
            file_name: &str,
            artist: Option<&str>,
            album: Option<&str>,
            title: Option<&str>,
        ) -> Self {
            self.tags.insert(
                file_name.to_string(),
                (
                    artist.map(String::from),
                    album.map(String::from),
                    title.map(String::from),
                ),
            );
            self
        }
    }

    impl TagReader for FakeTags {
        fn read_track(&self, path: &Path) -> Option<Track> {
            let name = path.file_name()?.to_str()?;
            let (artist, album, title) = self.tags.get(name)?.clone();
            Some(Track {
                path: path.to_path_buf(),
                artist,
                album,
                title,
            })
        }
    }
}
