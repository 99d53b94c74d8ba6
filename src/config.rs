//! Defines the [`Config`] type, which carries every option the content graph
//! reads, plus the option value types ([`Extensions`], [`Timezone`],
//! [`Collections`], [`DefaultRule`]).

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Site configuration. Directory options are interpreted relative to
/// `source`; use the `*_directory` accessors to get the resolved paths.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: PathBuf,
    pub posts_dir: PathBuf,
    pub drafts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub styles_dir: PathBuf,

    /// Prefix for every generated URL, e.g. `/blog`. Stripped again when
    /// computing output destinations.
    pub baseurl: String,

    /// The global permalink pattern. Used by posts and by any document whose
    /// front matter, defaults, and type provide no pattern of their own.
    pub permalink: String,

    pub timezone: Timezone,
    pub markdown_ext: Extensions,
    pub html_ext: Extensions,
    pub images_ext: Extensions,
    pub scripts_ext: Extensions,
    pub styles_ext: Extensions,
    pub data_ext: Extensions,

    /// Output documents whose front matter says `published: false`.
    pub unpublished: bool,

    /// Output posts dated after the generation time.
    pub future: bool,

    /// Output drafts.
    pub show_drafts: bool,

    pub collections: Collections,
    pub defaults: Vec<DefaultRule>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: PathBuf::from("."),
            posts_dir: PathBuf::from("_posts"),
            drafts_dir: PathBuf::from("_drafts"),
            data_dir: PathBuf::from("_data"),
            images_dir: PathBuf::from("_images"),
            scripts_dir: PathBuf::from("_scripts"),
            styles_dir: PathBuf::from("_styles"),
            baseurl: String::new(),
            permalink: String::from("/:categories/:year/:month/:day/:title/"),
            timezone: Timezone::default(),
            markdown_ext: Extensions::from("md,markdown"),
            html_ext: Extensions::from("html,htm"),
            images_ext: Extensions::from("jpg,jpeg,png,gif,svg,webp"),
            scripts_ext: Extensions::from("js"),
            styles_ext: Extensions::from("css,scss,sass"),
            data_ext: Extensions::from("yml,yaml,json"),
            unpublished: false,
            future: false,
            show_drafts: false,
            collections: Collections::default(),
            defaults: Vec::new(),
        }
    }
}

impl Config {
    /// A default configuration rooted at `source`.
    pub fn new<P: Into<PathBuf>>(source: P) -> Config {
        Config {
            source: source.into(),
            ..Config::default()
        }
    }

    /// Parses a configuration from YAML text. Missing keys take their
    /// defaults.
    pub fn from_yaml(input: &str) -> Result<Config> {
        if input.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    /// Loads a configuration file. A relative `source` inside the file is
    /// taken relative to the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        let mut config = Config::from_yaml(&contents).map_err(|e| {
            Error::Annotated(format!("loading `{}`", path.display()), Box::new(e))
        })?;
        if config.source.is_relative() {
            if let Some(root) = path.parent() {
                config.source = root.join(&config.source);
            }
        }
        Ok(config)
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        self.source.join(dir)
    }

    pub fn posts_directory(&self) -> PathBuf {
        self.resolve(&self.posts_dir)
    }

    pub fn drafts_directory(&self) -> PathBuf {
        self.resolve(&self.drafts_dir)
    }

    pub fn data_directory(&self) -> PathBuf {
        self.resolve(&self.data_dir)
    }

    pub fn images_directory(&self) -> PathBuf {
        self.resolve(&self.images_dir)
    }

    pub fn scripts_directory(&self) -> PathBuf {
        self.resolve(&self.scripts_dir)
    }

    pub fn styles_directory(&self) -> PathBuf {
        self.resolve(&self.styles_dir)
    }

    /// The current time in the configured timezone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.timezone.localize(&Utc::now())
    }
}

/// A list of file extensions without the leading dot. Deserializes from
/// either a comma-separated string (`"md,markdown"`) or a YAML sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extensions(Vec<String>);

impl Extensions {
    /// Reports whether `path` has one of the extensions. Matching is
    /// case-sensitive.
    pub fn matches(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.0.iter().any(|e| e == ext),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Extensions {
    fn from(s: &str) -> Extensions {
        Extensions(
            s.split(',')
                .map(|e| e.trim().trim_start_matches('.').to_owned())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Extensions, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            List(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Joined(s) => Extensions::from(s.as_str()),
            Raw::List(v) => Extensions::from(v.join(",").as_str()),
        })
    }
}

/// The zone dates are read and shown in: an IANA zone name such as
/// `America/New_York`, or a fixed offset given as `UTC`, `Z`, `+HH:MM`, or
/// `-HHMM`. Named zones resolve their offset per instant, so daylight saving
/// is honoured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Timezone {
    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Timezone::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Timezone::Fixed(offset) => *offset,
        }
    }

    /// Converts `time` into this zone.
    pub fn localize<T: TimeZone>(&self, time: &DateTime<T>) -> DateTime<FixedOffset> {
        let utc = time.with_timezone(&Utc);
        utc.with_timezone(&self.offset_at(&utc))
    }

    /// Reads a wall-clock time in this zone. An ambiguous time takes the
    /// earlier instant; a time skipped by a transition gives `None`.
    pub fn from_local(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Timezone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|d| self.localize(&d)),
            Timezone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Timezone::Fixed(Utc.fix())
    }
}

impl std::str::FromStr for Timezone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Timezone> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Timezone::default());
        }
        if s.starts_with('+') || s.starts_with('-') {
            return fixed_offset(s)
                .map(Timezone::Fixed)
                .ok_or_else(|| Error::InvalidTimezone(s.to_owned()));
        }
        s.parse::<Tz>()
            .map(Timezone::Named)
            .map_err(|_| Error::InvalidTimezone(s.to_owned()))
    }
}

fn fixed_offset(s: &str) -> Option<FixedOffset> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Timezone, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<Timezone>()
            .map_err(|e| D::Error::custom(format!("{}", e)))
    }
}

/// User-defined collections: either bare labels or a mapping of label to
/// per-collection options. The options double as default front matter for
/// the collection's documents.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Collections {
    Labels(Vec<String>),
    Options(Mapping),
}

impl Default for Collections {
    fn default() -> Self {
        Collections::Labels(Vec::new())
    }
}

impl Collections {
    /// Yields each label with its options (empty for the label-list form).
    /// Non-string labels and non-mapping options are ignored.
    pub fn entries(&self) -> Vec<(String, Mapping)> {
        match self {
            Collections::Labels(labels) => labels
                .iter()
                .map(|label| (label.clone(), Mapping::new()))
                .collect(),
            Collections::Options(map) => map
                .iter()
                .filter_map(|(label, options)| {
                    let label = label.as_str()?.to_owned();
                    let options = match options {
                        Value::Mapping(m) => m.clone(),
                        _ => Mapping::new(),
                    };
                    Some((label, options))
                })
                .collect(),
        }
    }
}

/// One ranked defaults rule. A rule applies when its scope matches a
/// document's type and path; `values` become default front matter and
/// `process` carries processing hints.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DefaultRule {
    pub scope: Scope,
    pub values: Mapping,
    pub process: Mapping,
}

/// Restricts a [`DefaultRule`]. An empty path matches every document; an
/// absent type matches every type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scope {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Represents the result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the configuration file can't be read.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when there was an error parsing the configuration as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for a `timezone` that isn't `UTC`, a fixed offset, or a known
    /// IANA zone name.
    InvalidTimezone(String),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Reading config file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::InvalidTimezone(tz) => {
                write!(
                    f,
                    "invalid timezone `{}`: expected UTC, an offset like +02:00, \
                     or a zone name like Europe/Paris",
                    tz
                )
            }
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidTimezone(_) => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_when_empty() -> Result<()> {
        let config = Config::from_yaml("")?;
        assert_eq!(PathBuf::from("./_posts"), config.posts_directory());
        assert!(config.markdown_ext.matches(Path::new("a/b.md")));
        assert!(!config.markdown_ext.matches(Path::new("a/b.html")));
        assert!(!config.show_drafts);
        Ok(())
    }

    #[test]
    fn test_parse_full_config() -> Result<()> {
        let config = Config::from_yaml(
            r#"
source: site
baseurl: /blog
permalink: /:year/:title/
timezone: "+05:30"
markdown_ext: [md, mdown]
show_drafts: true
collections:
  recipes:
    output: true
    layout: recipe
defaults:
  - scope: { path: "", type: posts }
    values: { layout: post }
"#,
        )?;
        assert_eq!(PathBuf::from("site/_drafts"), config.drafts_directory());
        assert_eq!("/blog", config.baseurl);
        assert_eq!(
            Timezone::Fixed(FixedOffset::east_opt(19800).unwrap()),
            config.timezone
        );
        assert!(config.markdown_ext.matches(Path::new("x.mdown")));
        assert!(config.show_drafts);

        let entries = config.collections.entries();
        assert_eq!(1, entries.len());
        assert_eq!("recipes", entries[0].0);
        assert_eq!(Some("recipe"), entries[0].1.get("layout").and_then(Value::as_str));

        assert_eq!(Some("posts"), config.defaults[0].scope.kind.as_deref());
        Ok(())
    }

    #[test]
    fn test_collection_labels() -> Result<()> {
        let config = Config::from_yaml("collections: [authors, recipes]")?;
        let labels: Vec<String> = config
            .collections
            .entries()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(vec!["authors", "recipes"], labels);
        Ok(())
    }

    #[test]
    fn test_timezone_parsing() {
        let instant = Utc.with_ymd_and_hms(2021, 7, 1, 12, 0, 0).unwrap();
        let offset = |s: &str| s.parse::<Timezone>().unwrap().offset_at(&instant);
        assert_eq!(0, offset("UTC").local_minus_utc());
        assert_eq!(-18000, offset("-0500").local_minus_utc());
        assert_eq!(7200, offset("Europe/Paris").local_minus_utc());
        assert!("+25:00".parse::<Timezone>().is_err());
        assert!("Mars/Olympus_Mons".parse::<Timezone>().is_err());
        assert!(Config::from_yaml("timezone: nowhere").is_err());
    }

    #[test]
    fn test_named_timezone_follows_daylight_saving() -> Result<()> {
        let config = Config::from_yaml("timezone: America/New_York")?;
        assert_eq!(Timezone::Named(Tz::America__New_York), config.timezone);

        let summer = Utc.with_ymd_and_hms(2021, 7, 1, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2021, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(-4 * 3600, config.timezone.offset_at(&summer).local_minus_utc());
        assert_eq!(-5 * 3600, config.timezone.offset_at(&winter).local_minus_utc());
        assert_eq!(
            "2021-07-01T08:00:00-04:00",
            config.timezone.localize(&summer).to_rfc3339()
        );
        assert_eq!(
            "2021-01-15T07:00:00-05:00",
            config.timezone.localize(&winter).to_rfc3339()
        );

        let noon = chrono::NaiveDate::from_ymd_opt(2021, 1, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        assert_eq!(
            "2021-01-15T12:00:00-05:00",
            config.timezone.from_local(&noon).unwrap().to_rfc3339()
        );
        Ok(())
    }
}
