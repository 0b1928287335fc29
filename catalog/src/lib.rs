#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only pattern catalog.
//!
//! The catalog ships a built-in collection of well known patterns and can be
//! extended from TOML documents of the form
//!
//! ```toml
//! [[pattern]]
//! name = "Glider"
//! category = "spaceship"
//! data = [[0, 1, 0], [0, 0, 1], [1, 1, 1]]
//! ```
//!
//! Every matrix is validated once while loading, so consumers can rely on
//! patterns being rectangular.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use life_canvas_core::{Pattern, PatternCategory, PatternError};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN: &str = include_str!("builtin.toml");

/// Errors raised while loading pattern definitions.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read pattern catalog {path}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid catalog TOML.
    #[error("failed to parse pattern catalog")]
    Parse(#[from] toml::de::Error),
    /// A pattern matrix is malformed.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// A pattern name is already present in the catalog.
    #[error("pattern '{name}' is defined more than once")]
    Duplicate {
        /// Conflicting pattern name.
        name: String,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    pattern: Vec<PatternEntry>,
}

#[derive(Debug, Deserialize)]
struct PatternEntry {
    name: String,
    category: PatternCategory,
    data: Vec<Vec<u8>>,
}

/// Patterns sharing one category, in catalog order.
#[derive(Clone, Debug)]
pub struct PatternGroup<'a> {
    /// Category shared by every pattern of the group.
    pub category: PatternCategory,
    /// Patterns in the order they were loaded.
    pub patterns: Vec<&'a Arc<Pattern>>,
}

/// Ordered, immutable-after-load collection of patterns.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    patterns: Vec<Arc<Pattern>>,
}

impl Catalog {
    /// Creates a catalog with no patterns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the catalog of built-in patterns.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        let _ = catalog.extend_from_toml_str(BUILTIN)?;
        Ok(catalog)
    }

    /// Appends every pattern defined in a TOML document.
    ///
    /// Nothing is appended when any entry is rejected.
    pub fn extend_from_toml_str(&mut self, source: &str) -> Result<usize, CatalogError> {
        let document: CatalogDocument = toml::from_str(source)?;
        let mut loaded: Vec<Arc<Pattern>> = Vec::with_capacity(document.pattern.len());

        for entry in document.pattern {
            let duplicate = self
                .patterns
                .iter()
                .chain(loaded.iter())
                .any(|existing| existing.name() == entry.name);
            if duplicate {
                return Err(CatalogError::Duplicate { name: entry.name });
            }

            let pattern = Pattern::from_rows(entry.name, entry.category, entry.data.as_slice())?;
            loaded.push(Arc::new(pattern));
        }

        let count = loaded.len();
        self.patterns.extend(loaded);
        Ok(count)
    }

    /// Appends every pattern defined in the TOML file at `path`.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let source = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.extend_from_toml_str(&source)?;
        tracing::info!(path = %path.display(), count, "loaded extra patterns");
        Ok(count)
    }

    /// Looks up a pattern by its exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<Pattern>> {
        self.patterns.iter().find(|pattern| pattern.name() == name)
    }

    /// Groups patterns by category, ordered by first appearance of each category.
    #[must_use]
    pub fn groups(&self) -> Vec<PatternGroup<'_>> {
        let mut groups: Vec<PatternGroup<'_>> = Vec::new();
        for pattern in &self.patterns {
            match groups
                .iter_mut()
                .find(|group| group.category == pattern.category())
            {
                Some(group) => group.patterns.push(pattern),
                None => groups.push(PatternGroup {
                    category: pattern.category(),
                    patterns: vec![pattern],
                }),
            }
        }
        groups
    }

    /// Iterates patterns in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Pattern>> {
        self.patterns.iter()
    }

    /// Number of patterns in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the catalog holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().expect("built-in catalog is valid");

        assert_eq!(catalog.len(), 14);
        let glider = catalog.find("Glider").expect("glider is built in");
        assert_eq!((glider.rows(), glider.columns()), (3, 3));
        assert_eq!(glider.population(), 5);
    }

    #[test]
    fn rejected_documents_leave_catalog_untouched() {
        let mut catalog = Catalog::empty();
        let error = catalog
            .extend_from_toml_str(
                r#"
                [[pattern]]
                name = "Dot"
                category = "still_life"
                data = [[1]]

                [[pattern]]
                name = "Broken"
                category = "oscillator"
                data = [[1, 1], [1]]
                "#,
            )
            .expect_err("ragged matrix must be rejected");

        assert!(matches!(
            error,
            CatalogError::Pattern(PatternError::Ragged { .. })
        ));
        assert!(catalog.is_empty());
    }
}
