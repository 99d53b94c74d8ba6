//! Defines the [`Collection`] type.

use crate::document::Document;
use serde_yaml::Mapping;
use std::path::PathBuf;
use std::rc::Rc;

/// A named group of documents sharing a source directory and default front
/// matter. `docs` holds the renderable, visible documents; `files` holds
/// everything else found in the directory.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    pub label: String,

    /// Ascending by date for posts and drafts, scan order otherwise.
    pub docs: Vec<Rc<Document>>,
    pub files: Vec<Rc<Document>>,
    pub directory: PathBuf,

    /// `directory` relative to the site source.
    pub relative_directory: PathBuf,
    pub output: bool,
    pub defaults: Mapping,

    /// Set once `docs` has been fully built for this generation, so an
    /// empty collection isn't rescanned.
    pub(crate) populated: bool,
}

impl Collection {
    pub fn new<L: Into<String>, D: Into<PathBuf>>(label: L, directory: D) -> Collection {
        Collection {
            label: label.into(),
            directory: directory.into(),
            ..Collection::default()
        }
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }
}
