/// Move execution for routed files.
///
/// This module performs the final step of routing a file: relocating it to the
/// path chosen by the placement stage. Moves on the same volume are a plain
/// rename. Moves across volumes fall back to copying into a temporary sibling
/// of the destination, renaming it into place and then removing the source.
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a file reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    /// A single `rename` on the same volume.
    Renamed,
    /// Copy then delete, used when source and destination are on different volumes.
    Copied,
    /// Dry run: nothing was touched.
    Simulated,
}

/// Record of a completed (or simulated) move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReceipt {
    /// Where the file was.
    pub from: PathBuf,
    /// Where the file is now (or would be, in a dry run).
    pub to: PathBuf,
    pub method: MoveMethod,
}

/// Errors that can occur while moving a single file.
///
/// When one of these is returned the source file is still in place and the
/// destination holds no partial copy.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// The rename itself failed (permissions, vanished source, bad path...).
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Cross-volume copy failed.
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The copy landed but the original could not be removed; the copy was
    /// rolled back.
    #[error("Copied {} to {} but could not remove the original: {source}", from.display(), to.display())]
    RemoveSource {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for move operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Moves files to their resolved destinations.
///
/// In dry-run mode every move succeeds without touching the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOrganizer {
    dry_run: bool,
}

impl FileOrganizer {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Moves `source` to `destination`, replacing any file already there.
    ///
    /// The destination directory must already exist.
    ///
    /// # Returns
    ///
    /// Returns `Ok(MoveReceipt)` describing how the file was moved, or a
    /// `MoveError` if the move could not be completed. Failures never leave the
    /// file half-moved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use file_router::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let mover = FileOrganizer::new(false);
    /// match mover.move_file(Path::new("/in/a.pdf"), Path::new("/docs/a.pdf")) {
    ///     Ok(receipt) => println!("Moved to {}", receipt.to.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_file(&self, source: &Path, destination: &Path) -> MoveResult<MoveReceipt> {
        let receipt = |method| MoveReceipt {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            method,
        };

        if self.dry_run {
            return Ok(receipt(MoveMethod::Simulated));
        }

        match fs::rename(source, destination) {
            Ok(()) => Ok(receipt(MoveMethod::Renamed)),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                copy_then_remove(source, destination)?;
                Ok(receipt(MoveMethod::Copied))
            }
            Err(e) => Err(MoveError::Rename {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
                source: e,
            }),
        }
    }
}

/// Cross-volume move: copy to a temporary sibling, rename it over the
/// destination, then delete the source.
///
/// A file already at `destination` is parked under a hidden sibling name
/// until the source is gone, and restored if any later step fails. Staging
/// and parking names never reuse an existing entry.
pub(crate) fn copy_then_remove(source: &Path, destination: &Path) -> MoveResult<()> {
    let copy_error = |e| MoveError::Copy {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    };

    let staging = sibling_path(destination, "partial");
    if let Err(e) = fs::copy(source, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(copy_error(e));
    }

    let parked = if fs::symlink_metadata(destination).is_ok() {
        let parked = sibling_path(destination, "replaced");
        if let Err(e) = fs::rename(destination, &parked) {
            let _ = fs::remove_file(&staging);
            return Err(copy_error(e));
        }
        Some(parked)
    } else {
        None
    };
    let restore = |parked: &Option<PathBuf>| {
        if let Some(parked) = parked {
            let _ = fs::rename(parked, destination);
        }
    };

    if let Err(e) = fs::rename(&staging, destination) {
        let _ = fs::remove_file(&staging);
        restore(&parked);
        return Err(copy_error(e));
    }

    if let Err(e) = fs::remove_file(source) {
        // Keep the file in exactly one place.
        let _ = fs::remove_file(destination);
        restore(&parked);
        return Err(MoveError::RemoveSource {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            source: e,
        });
    }

    if let Some(parked) = parked {
        let _ = fs::remove_file(parked);
    }
    Ok(())
}

/// `dir/.name.<suffix>`, or `dir/.name.<n>.<suffix>` when that is taken.
fn sibling_path(destination: &Path, suffix: &str) -> PathBuf {
    let file_name = destination.file_name().unwrap_or_default();
    let candidate = |counter: u32| {
        let mut name = OsString::from(".");
        name.push(file_name);
        if counter > 0 {
            name.push(format!(".{}", counter));
        }
        name.push(".");
        name.push(suffix);
        destination.with_file_name(name)
    };

    (0..u32::MAX)
        .map(candidate)
        .find(|path| fs::symlink_metadata(path).is_err())
        .unwrap_or_else(|| candidate(u32::MAX))
}
