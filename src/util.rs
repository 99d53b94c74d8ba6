//! Small helpers shared by the document model and the site graph: path
//! normalization, directory scanning, and loose YAML value coercions.

use serde_yaml::{Mapping, Value};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const MODULES: &str = "node_modules";
const PACKAGE: &str = "package.json";

/// Makes `path` absolute (relative to the current directory) and removes `.`
/// and `..` components lexically. The file does not need to exist, which is
/// what lets the object cache remember lookups of missing paths.
pub fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_owned()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_owned(),
        }
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Controls which entries [`scan`] skips.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scan {
    /// Include files and directories whose name starts with `.`.
    pub dot: bool,

    /// Skip `node_modules` directories and a top-level `package.json`.
    pub ignore_modules: bool,
}

/// Recursively lists the files under `dir` as paths relative to `dir`,
/// sorted by name. Files and directories whose name begins with `_` are
/// private and skipped, along with everything beneath them. A missing directory yields an empty list; unreadable
/// entries are logged and skipped.
pub fn scan(dir: &Path, opts: Scan) -> Vec<PathBuf> {
    if !dir.is_dir() {
        log::debug!("skipping scan of missing directory `{}`", dir.display());
        return Vec::new();
    }

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('_') {
                return false;
            }
            if opts.ignore_modules && entry.file_type().is_dir() && name == MODULES {
                return false;
            }
            opts.dot || !name.starts_with('.')
        });

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("scanning `{}`: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        // strip_prefix shouldn't fail since `dir` is always an ancestor of
        // the walked entry
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            if opts.ignore_modules && relative == Path::new(PACKAGE) {
                continue;
            }
            files.push(relative.to_owned());
        }
    }
    files
}

/// Renders a path with `/` separators regardless of platform.
pub fn slashed(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Loose truthiness used for front-matter flags such as `draft: yes`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => truthy(&tagged.value),
    }
}

/// Reads a string field, treating non-string scalars as absent.
pub fn get_str<'a>(data: &'a Mapping, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

/// Reads a list of names from a sequence of scalars or from a single
/// comma-separated string. Empty entries are dropped.
pub fn get_list(data: &Mapping, key: &str) -> Vec<String> {
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    match data.get(key) {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(other) => scalar(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Inserts a string-keyed entry.
pub fn set<V: Into<Value>>(data: &mut Mapping, key: &str, value: V) {
    data.insert(Value::String(key.to_owned()), value.into());
}
