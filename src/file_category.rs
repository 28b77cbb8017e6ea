/// Extension-based categorization of files.
///
/// Categories come from configuration, so the mapping is built at runtime.
/// Lookups walk the categories in configured order and the first category
/// listing the extension wins, even if a later category also lists it.
///
/// # Examples
///
/// ```
/// use file_router::config::TargetDirectory;
/// use file_router::file_category::CategoryResolver;
/// use std::path::PathBuf;
///
/// let targets = vec![TargetDirectory {
///     name: "images".to_string(),
///     path: PathBuf::from("/pictures"),
///     extensions: vec![".png".to_string(), ".jpg".to_string()],
/// }];
/// let resolver = CategoryResolver::new(&targets);
/// assert_eq!(resolver.resolve(".PNG"), Some("images"));
/// assert_eq!(resolver.resolve(".mp3"), None);
/// ```
use std::collections::HashSet;
use std::path::Path;

use crate::config::TargetDirectory;

/// Maps lower-cased extensions to category names.
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    categories: Vec<(String, HashSet<String>)>,
}

impl CategoryResolver {
    /// Builds a resolver preserving the order of `targets`.
    pub fn new(targets: &[TargetDirectory]) -> Self {
        let categories = targets
            .iter()
            .map(|target| {
                let extensions = target
                    .extensions
                    .iter()
                    .map(|ext| ext.to_lowercase())
                    .collect();
                (target.name.clone(), extensions)
            })
            .collect();

        Self { categories }
    }

    /// Returns the first category whose extension set contains `extension`.
    ///
    /// `extension` includes the leading `.` and is compared case-insensitively.
    pub fn resolve(&self, extension: &str) -> Option<&str> {
        let extension = extension.to_lowercase();
        self.categories
            .iter()
            .find(|(_, extensions)| extensions.contains(&extension))
            .map(|(name, _)| name.as_str())
    }

    /// Resolves the category of a file from its path.
    pub fn resolve_path(&self, path: &Path) -> Option<&str> {
        file_extension(path).and_then(|ext| self.resolve(&ext))
    }

    /// Number of configured categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The last extension of `path`, lower-cased and with its leading `.`.
///
/// Dot-files such as `.bashrc` and names ending in a bare `.` have none.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
}
