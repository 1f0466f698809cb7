//! Mapping between backend collection ids and human-readable titles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDirectoryEntry {
    #[serde(rename = "index")]
    pub id: String,
    pub title: String,
}

impl CollectionDirectoryEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("collection id {0:?} appears more than once in the directory")]
    DuplicateId(String),
    #[error("collection title {0:?} appears more than once in the directory")]
    DuplicateTitle(String),
    #[error("directory entry has an empty {0}")]
    EmptyField(&'static str),
}

/// Read-only directory; both lookup tables are built in [`CollectionDirectory::new`].
#[derive(Debug, Clone, Default)]
pub struct CollectionDirectory {
    entries: Vec<CollectionDirectoryEntry>,
    id_to_title: HashMap<String, String>,
    title_to_id: HashMap<String, String>,
}

impl CollectionDirectory {
    pub fn new(entries: Vec<CollectionDirectoryEntry>) -> Result<Self, DirectoryError> {
        let mut id_to_title = HashMap::with_capacity(entries.len());
        let mut title_to_id = HashMap::with_capacity(entries.len());
        for entry in &entries {
            if entry.id.is_empty() {
                return Err(DirectoryError::EmptyField("index"));
            }
            if entry.title.is_empty() {
                return Err(DirectoryError::EmptyField("title"));
            }
            if id_to_title.insert(entry.id.clone(), entry.title.clone()).is_some() {
                return Err(DirectoryError::DuplicateId(entry.id.clone()));
            }
            if title_to_id.insert(entry.title.clone(), entry.id.clone()).is_some() {
                return Err(DirectoryError::DuplicateTitle(entry.title.clone()));
            }
        }
        Ok(Self { entries, id_to_title, title_to_id })
    }

    pub fn entries(&self) -> &[CollectionDirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every known collection id, in directory order.
    pub fn all_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn title_for_id(&self, id: &str) -> Option<&str> {
        self.id_to_title.get(id).map(String::as_str)
    }

    pub fn id_for_title(&self, title: &str) -> Option<&str> {
        self.title_to_id.get(title).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries() -> Vec<CollectionDirectoryEntry> {
        vec![
            CollectionDirectoryEntry::new("idx-maps", "Maps"),
            CollectionDirectoryEntry::new("idx-letters", "Letters"),
        ]
    }

    #[test]
    fn lookups_work_in_both_directions() {
        let directory = CollectionDirectory::new(entries()).unwrap();
        assert_eq!(directory.title_for_id("idx-maps"), Some("Maps"));
        assert_eq!(directory.id_for_title("Letters"), Some("idx-letters"));
        assert_eq!(directory.title_for_id("nope"), None);
        assert_eq!(directory.all_ids(), vec!["idx-maps", "idx-letters"]);
    }

    #[test]
    fn duplicate_title_rejects_the_whole_directory() {
        let mut e = entries();
        e.push(CollectionDirectoryEntry::new("idx-other", "Maps"));
        assert_eq!(
            CollectionDirectory::new(e).unwrap_err(),
            DirectoryError::DuplicateTitle("Maps".into())
        );
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut e = entries();
        e.push(CollectionDirectoryEntry::new("idx-maps", "Atlas"));
        assert_eq!(CollectionDirectory::new(e).unwrap_err(), DirectoryError::DuplicateId("idx-maps".into()));
    }

    #[test]
    fn directory_documents_use_the_index_key() {
        let entry: CollectionDirectoryEntry =
            serde_json::from_str(r#"{"index": "idx-maps", "title": "Maps", "doc_count": 12}"#).unwrap();
        assert_eq!(entry.id, "idx-maps");
        assert_eq!(entry.title, "Maps");
    }
}
