use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use indexmap::IndexMap;

use super::WordSource;
use crate::error::PracticeError;

static CATALOG_DIR: Dir = include_dir!("src/catalogs");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{} not found. Make sure the catalog file exists.", .0.display())]
    NotFound(PathBuf),
    #[error("unable to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse catalog '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no built-in catalog named '{0}'")]
    UnknownBuiltin(String),
}

/// Curated word lists keyed by sublist name, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    lists: IndexMap<String, Vec<String>>,
}

impl Catalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CatalogError::NotFound(path.to_path_buf())
            } else {
                CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&path.display().to_string(), &contents)
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self, CatalogError> {
        let lists = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            name: name.to_string(),
            source,
        })?;
        Ok(Self { lists })
    }

    /// Loads one of the catalogs compiled into the binary, e.g. `awl`.
    pub fn builtin(name: &str) -> Result<Self, CatalogError> {
        let file_name = format!("{}.json", name.to_lowercase());
        let file = CATALOG_DIR
            .get_file(&file_name)
            .ok_or_else(|| CatalogError::UnknownBuiltin(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| CatalogError::UnknownBuiltin(name.to_string()))?;
        Self::from_json(&file_name, contents)
    }

    /// Sublist names with their word counts, in file order.
    pub fn sublists(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lists.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    /// Label shown in the selector: `"<name> (<n> words)"`.
    pub fn label(name: &str, count: usize) -> String {
        format!("{name} ({count} words)")
    }

    pub fn labels(&self) -> Vec<String> {
        self.sublists()
            .map(|(name, count)| Self::label(name, count))
            .collect()
    }

    /// Maps a selector label back to its sublist key.
    pub fn key_for_label(&self, label: &str) -> Option<&str> {
        self.sublists()
            .find(|(name, count)| Self::label(name, *count) == label)
            .map(|(name, _)| name)
    }

    pub fn get(&self, sublist: &str) -> Result<Vec<String>, PracticeError> {
        self.lists
            .get(sublist)
            .cloned()
            .ok_or_else(|| PracticeError::UnknownSublist(sublist.to_string()))
    }
}

impl WordSource for Catalog {
    fn words(&self, selector: &str) -> Result<Vec<String>, PracticeError> {
        if selector.is_empty() {
            return Err(PracticeError::NoSublistSelected);
        }
        self.get(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    const SAMPLE: &str = r#"
    {
        "Sublist 2": ["achieve", "acquire"],
        "Sublist 1": ["analyse", "approach", "area"]
    }
    "#;

    #[test]
    fn keeps_file_order() {
        let catalog = Catalog::from_json("sample", SAMPLE).unwrap();
        let names: Vec<_> = catalog.sublists().collect();
        assert_eq!(names, vec![("Sublist 2", 2), ("Sublist 1", 3)]);
    }

    #[test]
    fn labels_round_trip_to_keys() {
        let catalog = Catalog::from_json("sample", SAMPLE).unwrap();
        let labels = catalog.labels();
        assert_eq!(labels[0], "Sublist 2 (2 words)");
        assert_eq!(catalog.key_for_label("Sublist 1 (3 words)"), Some("Sublist 1"));
        assert_eq!(catalog.key_for_label("Sublist 1 (4 words)"), None);
    }

    #[test]
    fn get_returns_words_in_order() {
        let catalog = Catalog::from_json("sample", SAMPLE).unwrap();
        assert_eq!(
            catalog.words("Sublist 1").unwrap(),
            vec!["analyse", "approach", "area"]
        );
    }

    #[test]
    fn unknown_sublist_is_reported() {
        let catalog = Catalog::from_json("sample", SAMPLE).unwrap();
        assert_matches!(
            catalog.words("Sublist 9"),
            Err(PracticeError::UnknownSublist(name)) if name == "Sublist 9"
        );
        assert_matches!(catalog.words(""), Err(PracticeError::NoSublistSelected));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab_words.json");
        assert_matches!(Catalog::from_path(&path), Err(CatalogError::NotFound(p)) if p == path);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.labels().len(), 2);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"Sublist 1": "not a list"}"#).unwrap();
        assert_matches!(Catalog::from_path(file.path()), Err(CatalogError::Parse { .. }));
    }

    #[test]
    fn builtin_academic_word_list() {
        let catalog = Catalog::builtin("awl").unwrap();
        assert_eq!(catalog.sublists().next().map(|(name, _)| name), Some("Sublist 1"));
        assert!(catalog.get("Sublist 1").unwrap().contains(&"analyse".to_string()));
    }

    #[test]
    fn unknown_builtin() {
        assert_matches!(
            Catalog::builtin("klingon"),
            Err(CatalogError::UnknownBuiltin(_))
        );
    }
}
