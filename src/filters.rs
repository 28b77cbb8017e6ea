//! Cheap eligibility checks applied before any path is computed.
//!
//! [`ExclusionFilter`] matches bare file names against shell globs, and
//! [`SizeLimits`] enforces the configured byte range.

use glob::{MatchOptions, Pattern};

use crate::config::{ConfigError, Settings};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled exclusion patterns.
///
/// Patterns use shell-glob semantics (`*`, `?`, `[...]`, `[!...]`) and are
/// matched case-insensitively against the file name only, never the
/// directory part. A `[` without a closing `]` is a literal character and
/// runs of `*` act as a single `*`.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<(String, Pattern)>,
}

impl ExclusionFilter {
    /// Compile `patterns`, in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first pattern that is not a
    /// valid glob.
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|raw| {
                Pattern::new(&file_name_glob(&raw.to_lowercase()))
                    .map(|compiled| (raw.clone(), compiled))
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: raw.clone(),
                        reason: e.msg.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True if any pattern matches `file_name`.
    pub fn should_exclude(&self, file_name: &str) -> bool {
        self.matching_pattern(file_name).is_some()
    }

    /// The first pattern (as configured) that matches `file_name`.
    pub fn matching_pattern(&self, file_name: &str) -> Option<&str> {
        let file_name = file_name.to_lowercase();
        self.patterns
            .iter()
            .find(|(_, pattern)| pattern.matches_with(&file_name, MATCH_OPTIONS))
            .map(|(raw, _)| raw.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Rewrites a shell pattern into the dialect `glob::Pattern` accepts for a
/// bare file name: `**` and longer runs collapse to `*`, and an unclosed `[`
/// becomes the literal class `[[]`. Closed classes are copied unchanged.
fn file_name_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the `]` closing the class opened at `start`. A `]` right after
/// `[` or `[!` belongs to the set.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

/// Accepted file size range in bytes.
///
/// `min` is inclusive; `max`, when set, is inclusive too: only sizes strictly
/// above it fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeLimits {
    pub min: u64,
    pub max: Option<u64>,
}

impl SizeLimits {
    pub fn new(min: u64, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.min_file_size, settings.max_file_size)
    }

    pub fn passes(&self, file_size: u64) -> bool {
        if file_size < self.min {
            return false;
        }
        !matches!(self.max, Some(max) if file_size > max)
    }
}
