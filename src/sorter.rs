use crate::sanitize::{SegmentKind, sanitize_segment};
use crate::scanner::metadata::{TagReader, Track};
use crate::scanner::{self, LocateError};
use crate::{SORTED_SUFFIX, SUPPORTED_EXTENSION};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SortError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error("Cannot derive a destination directory for {0}")]
    NoDestinationRoot(PathBuf),
    #[error("Destination {0} already exists; remove it or sort into a fresh copy")]
    DestinationExists(PathBuf),
    #[error("IO error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> SortError + '_ {
    move |source| SortError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// What happens to the source file once its sorted copy is in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelocateMode {
    /// Leave the original where it is.
    #[default]
    Copy,
    /// Remove the original after the sorted copy has its final name.
    Move,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    pub mode: RelocateMode,
    pub follow_links: bool,
}

/// Why a track stays where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoTag,
    MissingArtist,
    MissingTitle,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoTag => "no readable tag",
            Self::MissingArtist => "no usable artist",
            Self::MissingTitle => "no usable title",
        })
    }
}

/// Where a track belongs in the sorted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub directory: PathBuf,
    pub final_name: String,
}

impl Destination {
    pub fn final_path(&self) -> PathBuf {
        self.directory.join(&self.final_name)
    }
}

/// Outcome of placing a single track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Relocated,
    AlreadyPresent,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub scanned: u64,
    pub relocated: u64,
    pub already_present: u64,
    pub skipped: u64,
}

/// `<root>.sorted`, next to the root rather than inside it.
///
/// Returns `None` for paths without a final component (`/`, `..`); callers
/// should canonicalize those first.
pub fn sorted_root(root: &Path) -> Option<PathBuf> {
    let mut name = root.file_name()?.to_os_string();
    name.push(SORTED_SUFFIX);
    Some(root.with_file_name(name))
}

/// Decide where a track goes. Artist and title are required; an album that
/// is absent or cleans down to nothing drops the album tier.
pub fn destination_for(track: &Track, sorted_root: &Path) -> Result<Destination, SkipReason> {
    let artist = sanitize_segment(track.artist.as_deref(), SegmentKind::Directory)
        .filter(|s| !s.is_empty())
        .ok_or(SkipReason::MissingArtist)?;
    let title = sanitize_segment(track.title.as_deref(), SegmentKind::FileStem)
        .filter(|s| !s.is_empty())
        .ok_or(SkipReason::MissingTitle)?;
    let album = sanitize_segment(track.album.as_deref(), SegmentKind::Directory)
        .filter(|s| !s.is_empty());

    let mut directory = sorted_root.join(artist);
    if let Some(album) = album {
        directory.push(album);
    }

    Ok(Destination {
        directory,
        final_name: format!("{title}.{SUPPORTED_EXTENSION}"),
    })
}

/// Pick the name the copy is written under before it gets its final name.
///
/// Normally the source's own base name; if that is already taken by some
/// other file in the directory, a `.partial` sibling so nothing gets
/// overwritten.
fn staging_path(source: &Path, destination: &Destination) -> PathBuf {
    let final_path = destination.final_path();
    let Some(base) = source.file_name() else {
        return final_path;
    };
    let staging = destination.directory.join(base);
    if staging == final_path || !staging.exists() {
        return staging;
    }
    let mut partial = staging.into_os_string();
    partial.push(".partial");
    PathBuf::from(partial)
}

/// Copy one file into place: stage under its base name, then rename to the
/// sanitized final name. An existing final file wins and nothing is touched.
///
/// A failed rename leaves the staged copy behind.
pub fn relocate(
    source: &Path,
    destination: &Destination,
    mode: RelocateMode,
) -> Result<Placement, SortError> {
    let final_path = destination.final_path();
    if final_path.exists() {
        log::info!(
            "Leaving {} in place: {} already exists",
            source.display(),
            final_path.display()
        );
        return Ok(Placement::AlreadyPresent);
    }

    fs::create_dir_all(&destination.directory).map_err(io_at(&destination.directory))?;

    let staging = staging_path(source, destination);
    fs::copy(source, &staging).map_err(io_at(&staging))?;
    fs::rename(&staging, &final_path).map_err(io_at(&final_path))?;

    if mode == RelocateMode::Move {
        fs::remove_file(source).map_err(io_at(source))?;
    }

    log::debug!("{} -> {}", source.display(), final_path.display());
    Ok(Placement::Relocated)
}

/// Sort every tagged audio file under `root` into `<root>.sorted`.
///
/// The destination root must not exist yet; the run refuses to start rather
/// than merge into an earlier run's output. Untagged or incomplete files are
/// skipped. Any filesystem error aborts the run with whatever was already
/// placed left in place.
pub fn sort(
    root: &Path,
    options: &SortOptions,
    reader: &impl TagReader,
) -> Result<SortSummary, SortError> {
    scanner::validate_root(root)?;

    let sorted = match sorted_root(root) {
        Some(s) => s,
        None => root
            .canonicalize()
            .ok()
            .and_then(|r| sorted_root(&r))
            .ok_or_else(|| SortError::NoDestinationRoot(root.to_path_buf()))?,
    };

    fs::create_dir(&sorted).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => SortError::DestinationExists(sorted.clone()),
        _ => SortError::Io {
            path: sorted.clone(),
            source: e,
        },
    })?;
    log::info!("Sorting {} into {}", root.display(), sorted.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} scanned ({per_sec}) {msg}").unwrap(),
    );

    let mut summary = SortSummary::default();

    for path in scanner::list_candidates(root, options.follow_links) {
        pb.suspend(|| println!("{}", path.display()));
        summary.scanned += 1;

        let decision = reader
            .read_track(&path)
            .ok_or(SkipReason::NoTag)
            .and_then(|track| destination_for(&track, &sorted));

        match decision {
            Ok(destination) => match relocate(&path, &destination, options.mode)? {
                Placement::Relocated => summary.relocated += 1,
                Placement::AlreadyPresent => summary.already_present += 1,
            },
            Err(reason) => {
                log::info!("Leaving {} in place: {}", path.display(), reason);
                summary.skipped += 1;
            }
        }

        pb.inc(1);
        pb.set_message(format!(
            "{} relocated, {} skipped",
            summary.relocated, summary.skipped
        ));
    }

    pb.finish_and_clear();
    Ok(summary)
}
