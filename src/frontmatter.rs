//! Reading source files into [`RawRecord`]s. The [`Loader`] trait is the seam
//! the site graph reads files through; [`FrontMatterLoader`] is the default
//! implementation.

use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Filesystem timestamps of a source file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FileTimestamps {
    /// Last access time.
    pub added: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl FileTimestamps {
    /// Reads the timestamps of `path`. Platforms that don't record access or
    /// creation times report the modification time for those.
    pub fn stat(path: &Path) -> std::io::Result<FileTimestamps> {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata.modified()?;
        let added = metadata.accessed().unwrap_or(modified);
        let created = metadata.created().unwrap_or(modified);
        Ok(FileTimestamps {
            added: added.into(),
            modified: modified.into(),
            created: created.into(),
        })
    }
}

/// One source file as read from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub filepath: PathBuf,
    pub relative_path: PathBuf,

    /// The parsed front matter, or `None` when the file has no front-matter
    /// block. Pages and generic documents require front matter; plain files
    /// don't.
    pub front_matter: Option<Mapping>,

    /// The body after the front-matter block (the whole file when there is
    /// none).
    pub content: Option<String>,
    pub timestamps: FileTimestamps,
}

/// Reads source files. Returning `None` means the file is unreadable,
/// binary, or has front matter that doesn't parse, and should be skipped.
pub trait Loader {
    fn load(&self, directory: &Path, relative_path: &Path) -> Option<RawRecord>;
}

/// Reads UTF-8 files with an optional YAML front-matter block fenced by
/// lines of three or more `-` (or `;`):
///
/// ```md
/// ---
/// title: Hello, world!
/// tags: [greet]
/// ---
/// # Hello
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontMatterLoader;

const BINARY_SNIFF_LEN: usize = 8000;

impl Loader for FrontMatterLoader {
    fn load(&self, directory: &Path, relative_path: &Path) -> Option<RawRecord> {
        let filepath = directory.join(relative_path);
        let bytes = match std::fs::read(&filepath) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::debug!("reading `{}`: {}", filepath.display(), err);
                return None;
            }
        };
        if bytes.iter().take(BINARY_SNIFF_LEN).any(|b| *b == 0) {
            return None;
        }
        let text = String::from_utf8(bytes).ok()?;
        let timestamps = FileTimestamps::stat(&filepath).ok()?;

        let (front_matter, content) = match split(&text) {
            Some((yaml, body)) => match parse(yaml) {
                Ok(data) => (Some(data), body.to_owned()),
                Err(err) => {
                    log::warn!("parsing front matter of `{}`: {}", filepath.display(), err);
                    return None;
                }
            },
            None => (None, text),
        };

        Some(RawRecord {
            filepath,
            relative_path: relative_path.to_owned(),
            front_matter,
            content: Some(content),
            timestamps,
        })
    }
}

/// Splits `input` into its front-matter text and body. Returns `None` when
/// the input doesn't open with a fence line or the fence is never closed.
pub fn split(input: &str) -> Option<(&str, &str)> {
    let first_end = input.find('\n')?;
    let fence = input[..first_end].trim_end_matches('\r');
    let fence_char = fence.chars().next()?;
    if fence.len() < 3 || !(fence_char == '-' || fence_char == ';') {
        return None;
    }
    if !fence.chars().all(|c| c == fence_char) {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut line_start = yaml_start;
    while line_start <= input.len() {
        let line_end = input[line_start..]
            .find('\n')
            .map_or(input.len(), |i| line_start + i);
        if input[line_start..line_end].trim_end_matches('\r') == fence {
            let body_start = (line_end + 1).min(input.len());
            return Some((&input[yaml_start..line_start], &input[body_start..]));
        }
        line_start = line_end + 1;
    }
    None
}

fn parse(yaml: &str) -> Result<Mapping, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(data) => Ok(data),
        Value::Null => Ok(Mapping::new()),
        other => Err(serde::de::Error::custom(format!(
            "front matter must be a mapping, found {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_split() {
        assert_eq!(
            Some(("title: A\n", "body\n")),
            split("---\ntitle: A\n---\nbody\n")
        );
        assert_eq!(Some(("", "")), split("---\n---"));
        assert_eq!(Some(("a: 1\n", "x")), split(";;;;\na: 1\n;;;;\nx"));
        assert_eq!(None, split("---\ntitle: A\nbody"));
        assert_eq!(None, split("# Just markdown\n"));
        assert_eq!(None, split("--\n--\n"));
    }

    #[test]
    fn test_load() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.md"), "---\ntitle: Hello\n---\nBody")?;
        fs::write(dir.path().join("b.html"), "<p>No front matter</p>")?;
        fs::write(dir.path().join("c.png"), [0x89, b'P', b'N', b'G', 0, 0])?;
        fs::write(dir.path().join("d.md"), "---\ntitle: [unclosed\n---\n")?;

        let loader = FrontMatterLoader;
        let a = loader.load(dir.path(), Path::new("a.md")).unwrap();
        assert_eq!(
            Some("Hello"),
            a.front_matter
                .as_ref()
                .and_then(|d| d.get("title"))
                .and_then(Value::as_str)
        );
        assert_eq!(Some("Body"), a.content.as_deref());
        assert_eq!(PathBuf::from("a.md"), a.relative_path);

        let b = loader.load(dir.path(), Path::new("b.html")).unwrap();
        assert_eq!(None, b.front_matter);
        assert_eq!(Some("<p>No front matter</p>"), b.content.as_deref());

        assert_eq!(None, loader.load(dir.path(), Path::new("c.png")));
        assert_eq!(None, loader.load(dir.path(), Path::new("d.md")));
        assert_eq!(None, loader.load(dir.path(), Path::new("missing.md")));
        Ok(())
    }
}
