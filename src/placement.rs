//! Destination computation and duplicate-name resolution.

use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{DuplicatePolicy, Settings, TargetDirectory};
use crate::engine::{CandidateFile, FileError};

/// Upper bound on `_NNN` suffixes tried before a file is reported as an error.
pub const MAX_RENAME_ATTEMPTS: u32 = 9_999;

/// Computes where a file of a given category lands.
#[derive(Debug, Clone, Default)]
pub struct DestinationResolver {
    /// strftime format of the date bucket, when bucketing is on.
    date_format: Option<String>,
    /// Create the destination directory chain. Off in dry runs.
    create_dirs: bool,
}

impl DestinationResolver {
    pub fn new(date_format: Option<String>, create_dirs: bool) -> Self {
        Self {
            date_format,
            create_dirs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings
                .create_subdirectories_by_date
                .then(|| settings.date_format.clone()),
            !settings.dry_run,
        )
    }

    /// Destination path for `file` in `target`: the category base path, an
    /// optional date bucket from the file's modification time, then the
    /// original file name.
    ///
    /// The destination directory is created (recursively) unless this
    /// resolver was built for a dry run.
    pub fn resolve(
        &self,
        target: &TargetDirectory,
        file: &CandidateFile,
    ) -> Result<PathBuf, FileError> {
        let mut directory = target.path.clone();
        if let Some(format) = &self.date_format {
            directory.push(date_bucket(file.modified, format)?);
        }

        if self.create_dirs {
            fs::create_dir_all(&directory).map_err(|e| FileError::CreateDirectory {
                path: directory.clone(),
                source: e,
            })?;
        }

        Ok(directory.join(&file.file_name))
    }
}

/// Formats `modified` in local time with `format`.
pub fn date_bucket(modified: SystemTime, format: &str) -> Result<String, FileError> {
    let local: DateTime<Local> = modified.into();
    let mut bucket = String::new();
    write!(bucket, "{}", local.format(format)).map_err(|_| FileError::DateFormat {
        format: format.to_string(),
    })?;
    Ok(bucket)
}

/// Applies the duplicate policy to a candidate destination.
#[derive(Debug, Clone)]
pub struct DuplicateResolver {
    policy: DuplicatePolicy,
    max_attempts: u32,
    /// Destinations handed out during a dry run, treated as occupied.
    claimed: HashSet<PathBuf>,
}

impl DuplicateResolver {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            max_attempts: MAX_RENAME_ATTEMPTS,
            claimed: HashSet::new(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Final destination for `candidate`, or `None` when the file should be
    /// left in place.
    ///
    /// A free candidate is returned unchanged. Otherwise `skip` yields
    /// `None`, `overwrite` yields the candidate, and `rename` probes
    /// `stem_001.ext`, `stem_002.ext`, ... in the same directory.
    ///
    /// # Errors
    ///
    /// `FileError::NamesExhausted` when every suffix up to the cap is taken.
    pub fn resolve(&self, candidate: &Path) -> Result<Option<PathBuf>, FileError> {
        if !self.is_taken(candidate) {
            return Ok(Some(candidate.to_path_buf()));
        }

        match self.policy {
            DuplicatePolicy::Skip => Ok(None),
            DuplicatePolicy::Overwrite => Ok(Some(candidate.to_path_buf())),
            DuplicatePolicy::Rename => (1..=self.max_attempts)
                .map(|counter| numbered_path(candidate, counter))
                .find(|path| !self.is_taken(path))
                .map(Some)
                .ok_or_else(|| FileError::NamesExhausted {
                    path: candidate.to_path_buf(),
                    attempts: self.max_attempts,
                }),
        }
    }

    /// Marks `path` as occupied for the rest of the run.
    pub fn claim(&mut self, path: PathBuf) {
        self.claimed.insert(path);
    }

    fn is_taken(&self, path: &Path) -> bool {
        // symlink_metadata so that a dangling link still counts as occupied
        fs::symlink_metadata(path).is_ok() || self.claimed.contains(path)
    }
}

/// `dir/stem.ext` -> `dir/stem_NNN.ext`, zero padded to three digits.
fn numbered_path(path: &Path, counter: u32) -> PathBuf {
    let mut name: OsString = path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!("_{:03}", counter));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn candidate(name: &str, modified: SystemTime) -> CandidateFile {
        CandidateFile {
            path: PathBuf::from("/source").join(name),
            file_name: name.into(),
            size: 10,
            modified,
        }
    }

    fn march_2024() -> SystemTime {
        Local
            .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
            .single()
            .expect("unambiguous local time")
            .into()
    }

    fn target(path: &Path) -> TargetDirectory {
        TargetDirectory {
            name: "documents".to_string(),
            path: path.to_path_buf(),
            extensions: vec![".pdf".to_string()],
        }
    }

    #[test]
    fn test_destination_without_bucket() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("docs");
        let resolver = DestinationResolver::new(None, true);

        let destination = resolver
            .resolve(&target(&base), &candidate("Report.PDF", march_2024()))
            .unwrap();

        assert_eq!(destination, base.join("Report.PDF"));
        assert!(base.is_dir());
    }

    #[test]
    fn test_destination_with_date_bucket() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("docs");
        let resolver = DestinationResolver::new(Some("%Y-%m".to_string()), true);

        let destination = resolver
            .resolve(&target(&base), &candidate("a.pdf", march_2024()))
            .unwrap();

        assert_eq!(destination, base.join("2024-03").join("a.pdf"));
        assert!(base.join("2024-03").is_dir());
    }

    #[test]
    fn test_nested_bucket_format() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("docs");
        let resolver = DestinationResolver::new(Some("%Y/%m".to_string()), true);

        let destination = resolver
            .resolve(&target(&base), &candidate("a.pdf", march_2024()))
            .unwrap();

        assert_eq!(destination, base.join("2024").join("03").join("a.pdf"));
    }

    #[test]
    fn test_dry_run_resolver_creates_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("docs");
        let resolver = DestinationResolver::new(Some("%Y".to_string()), false);

        let destination = resolver
            .resolve(&target(&base), &candidate("a.pdf", march_2024()))
            .unwrap();

        assert_eq!(destination, base.join("2024").join("a.pdf"));
        assert!(!base.exists());
    }

    #[test]
    fn test_directory_creation_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let resolver = DestinationResolver::new(None, true);

        let result = resolver.resolve(&target(&blocker.join("docs")), &candidate("a.pdf", march_2024()));

        assert!(matches!(result, Err(FileError::CreateDirectory { .. })));
    }

    #[test]
    fn test_free_destination_is_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a.pdf");
        for policy in [
            DuplicatePolicy::Rename,
            DuplicatePolicy::Skip,
            DuplicatePolicy::Overwrite,
        ] {
            let resolver = DuplicateResolver::new(policy);
            assert_eq!(resolver.policy(), policy);
            assert_eq!(resolver.resolve(&path).unwrap(), Some(path.clone()));
        }
    }

    #[test]
    fn test_skip_and_overwrite_policies() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a.pdf");
        fs::write(&path, "existing").unwrap();

        let skip = DuplicateResolver::new(DuplicatePolicy::Skip);
        assert_eq!(skip.resolve(&path).unwrap(), None);

        let overwrite = DuplicateResolver::new(DuplicatePolicy::Overwrite);
        assert_eq!(overwrite.resolve(&path).unwrap(), Some(path.clone()));
    }

    #[test]
    fn test_rename_probes_numbered_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("Photo.JPG");
        fs::write(&path, "1").unwrap();
        let resolver = DuplicateResolver::new(DuplicatePolicy::Rename);

        let first = resolver.resolve(&path).unwrap().unwrap();
        assert_eq!(first, temp_dir.path().join("Photo_001.JPG"));

        fs::write(&first, "2").unwrap();
        let second = resolver.resolve(&path).unwrap().unwrap();
        assert_eq!(second, temp_dir.path().join("Photo_002.JPG"));
    }

    #[test]
    fn test_rename_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("Makefile");
        fs::write(&path, "all:").unwrap();

        let resolved = DuplicateResolver::new(DuplicatePolicy::Rename)
            .resolve(&path)
            .unwrap();
        assert_eq!(resolved, Some(temp_dir.path().join("Makefile_001")));
    }

    #[test]
    fn test_rename_keeps_inner_dots() {
        assert_eq!(
            numbered_path(Path::new("/d/backup.tar.gz"), 7),
            PathBuf::from("/d/backup.tar_007.gz")
        );
        assert_eq!(
            numbered_path(Path::new("/d/a.txt"), 1234),
            PathBuf::from("/d/a_1234.txt")
        );
    }

    #[test]
    fn test_rename_gives_up_at_cap() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "0").unwrap();
        fs::write(temp_dir.path().join("a_001.txt"), "1").unwrap();
        fs::write(temp_dir.path().join("a_002.txt"), "2").unwrap();

        let resolver = DuplicateResolver::new(DuplicatePolicy::Rename).with_max_attempts(2);
        let result = resolver.resolve(&path);

        assert!(matches!(
            result,
            Err(FileError::NamesExhausted { attempts: 2, .. })
        ));
    }

    #[test]
    fn test_claimed_paths_count_as_taken() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a.txt");
        let mut resolver = DuplicateResolver::new(DuplicatePolicy::Rename);

        resolver.claim(path.clone());
        assert_eq!(
            resolver.resolve(&path).unwrap(),
            Some(temp_dir.path().join("a_001.txt"))
        );
    }
}
