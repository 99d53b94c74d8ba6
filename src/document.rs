//! Defines the [`Document`] type and its base construction. Type-specific
//! construction lives in [`crate::page`] and [`crate::post`].
//!
//! A document is built once per site generation from a [`DocumentOptions`]
//! (usually filled from a [`RawRecord`]). Its `data` mapping and permalink
//! tokens are fixed at construction; `url`, `content`, and `excerpt` are
//! computed on first access and memoized, while `output` is evaluated on
//! every call against the configuration it's given.

use crate::config::{Config, Timezone};
use crate::defaults::{self, apply_to_defaults, Resolved};
use crate::frontmatter::{FileTimestamps, RawRecord};
use crate::hooks::Subject;
use crate::markdown::Converter;
use crate::permalink::{self, Tokens, UrlOptions};
use crate::site::Context;
use crate::util::{self, get_list, get_str, set, truthy};
use crate::{page, post};
use chrono::{DateTime, FixedOffset};
use serde_yaml::{Mapping, Value};
use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// The type of a [`Document`]. Fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Page,
    Post,
    Draft,
    Data,
    File,
    Image,
    Script,
    Style,
    Generic,
}

impl Kind {
    /// The plural name used as the hook scope and in defaults scopes.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Page => "pages",
            Kind::Post => "posts",
            Kind::Draft => "drafts",
            Kind::Data => "data",
            Kind::File => "files",
            Kind::Image => "images",
            Kind::Script => "scripts",
            Kind::Style => "styles",
            Kind::Generic => "documents",
        }
    }

    /// Reports whether `name` (plural or singular) names this type.
    pub fn matches(self, name: &str) -> bool {
        let plural = self.as_str();
        name == plural || plural.strip_suffix('s') == Some(name)
    }

    /// The scope `postInit` fires under. Drafts are announced as posts.
    pub fn hook_scope(self) -> &'static str {
        match self {
            Kind::Draft => Kind::Post.as_str(),
            _ => self.as_str(),
        }
    }

    /// Posts and drafts: dated, ordered, and excerpted.
    pub fn is_post(self) -> bool {
        matches!(self, Kind::Post | Kind::Draft)
    }

    /// Types rendered to HTML (as opposed to copied through).
    pub fn is_rendered(self) -> bool {
        matches!(self, Kind::Page | Kind::Post | Kind::Draft | Kind::Generic)
    }

    fn default_permalink(self) -> Option<&'static str> {
        match self {
            Kind::Post | Kind::Draft => None,
            Kind::Generic => Some("/:collection/:path:output_ext"),
            _ => Some("/:path:output_ext"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to construct a [`Document`].
#[derive(Clone, Debug, Default)]
pub struct DocumentOptions {
    /// Source path relative to `directory`.
    pub path: PathBuf,

    /// Absolute source path.
    pub filepath: PathBuf,

    /// Label of the owning collection.
    pub collection: Option<String>,

    /// Collection-level default front matter. Explicit `data` wins.
    pub defaults: Mapping,

    /// Front matter.
    pub data: Mapping,

    /// Raw body text.
    pub content: Option<String>,

    /// Timestamps already read by the loader. When absent the file is
    /// stat'ed during construction.
    pub timestamps: Option<FileTimestamps>,

    /// A type-specific permalink pattern, used when neither front matter
    /// nor defaults rules provide one.
    pub permalink: Option<String>,

    /// Cache-busting revision for `:revision` in the permalink.
    pub revision: Option<String>,
}

impl DocumentOptions {
    pub fn new<P: Into<PathBuf>>(directory: &Path, path: P) -> DocumentOptions {
        let path = path.into();
        DocumentOptions {
            filepath: directory.join(&path),
            path,
            ..DocumentOptions::default()
        }
    }

    /// Takes front matter, body, and timestamps from `record`.
    pub fn with_record(mut self, record: RawRecord) -> DocumentOptions {
        self.data = record.front_matter.unwrap_or_default();
        self.content = record.content;
        self.timestamps = Some(record.timestamps);
        self
    }
}

/// A source file resolved into the content graph. Identity is the absolute
/// source path; the [`crate::site::Site`] hands out one shared instance per
/// path.
#[derive(Debug)]
pub struct Document {
    pub(crate) kind: Kind,
    pub(crate) data: Mapping,
    pub(crate) path: PathBuf,
    pub(crate) filepath: PathBuf,
    pub(crate) collection: Option<String>,
    pub(crate) tokens: Tokens,
    pub(crate) defaults: Resolved,
    pub(crate) timestamps: FileTimestamps,
    pub(crate) timezone: Timezone,
    pub(crate) baseurl: String,
    pub(crate) revision: Option<String>,
    pub(crate) markdown: bool,

    pub(crate) date: Option<DateTime<FixedOffset>>,
    pub(crate) categories: Vec<String>,
    pub(crate) tags: Vec<String>,

    variants: RefCell<Vec<Rc<Document>>>,
    pub(crate) previous: Cell<Option<usize>>,
    pub(crate) next: Cell<Option<usize>>,

    url: OnceCell<String>,
    content: OnceCell<String>,
    excerpt: OnceCell<String>,
}

impl Document {
    /// Builds a document of type `kind`. Pages, posts, and drafts fire
    /// `postInit` once fully built, drafts under the `posts` scope.
    pub fn new(kind: Kind, options: DocumentOptions, ctx: &Context) -> Result<Document> {
        let mut doc = Document::base(kind, options, ctx)?;

        match kind {
            Kind::Page => page::init(&mut doc),
            Kind::Post | Kind::Draft => post::init(&mut doc, &ctx.config),
            Kind::Generic => doc.apply_defaults(),
            _ => {}
        }
        doc.extend();

        if matches!(kind, Kind::Page | Kind::Post | Kind::Draft) {
            ctx.hooks
                .trigger(kind.hook_scope(), "postInit", Subject::Document(&doc));
        }
        Ok(doc)
    }

    fn base(kind: Kind, options: DocumentOptions, ctx: &Context) -> Result<Document> {
        let config = &ctx.config;
        let timezone = config.timezone;

        let mut data = apply_to_defaults(&options.defaults, &options.data);

        let path = options.path;
        let basename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidFileName(path.clone()))?;
        let dirname = path.parent().map(util::slashed).unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let timestamps = match options.timestamps {
            Some(timestamps) => timestamps,
            None => FileTimestamps::stat(&options.filepath).map_err(|err| Error::Stat {
                path: options.filepath.clone(),
                err,
            })?,
        };

        let source = util::absolute(&config.source);
        let source_path = util::absolute(&options.filepath)
            .strip_prefix(&source)
            .map(Path::to_owned)
            .unwrap_or_else(|_| path.clone());
        let resolved = defaults::resolve(&config.defaults, kind, &source_path);

        set(&mut data, "path", util::slashed(&path));
        set(&mut data, "filepath", options.filepath.to_string_lossy().into_owned());
        set(
            &mut data,
            "collection",
            options.collection.clone().map_or(Value::Null, Value::from),
        );
        set(
            &mut data,
            "raw_content",
            options.content.clone().map_or(Value::Null, Value::from),
        );
        for (key, time) in &[
            ("file_added_time", timestamps.added),
            ("file_modified_time", timestamps.modified),
            ("file_created_time", timestamps.created),
        ] {
            set(&mut data, key, timezone.localize(time).to_rfc3339());
        }

        let permalink = get_str(&data, "permalink")
            .or_else(|| get_str(&resolved.values, "permalink"))
            .or_else(|| options.permalink.as_deref())
            .or_else(|| kind.default_permalink())
            .unwrap_or(&config.permalink)
            .to_owned();
        set(&mut data, "permalink", permalink);

        let path_categories = path_categories(&path);
        let slug = get_str(&data, "slug").map(str::to_owned);
        let mut tokens = Tokens::new();
        let mut token = |name: &str, value: String| {
            tokens.insert(format!(":{}", name), value);
        };
        token("collection", options.collection.clone().unwrap_or_default());
        token(
            "output_ext",
            if kind.is_rendered() {
                String::from(".html")
            } else {
                extension
            },
        );
        token("basename", basename.clone());
        token("dirname", dirname);
        token("baseurl", config.baseurl.clone());
        token("categories", path_categories.join("/"));
        token(
            "path",
            util::slashed(&path.with_extension("")),
        );
        token("title", slug.clone().unwrap_or_else(|| basename.clone()));
        token("slug", slug.unwrap_or_else(|| slug::slugify(&basename)));

        let markdown = config.markdown_ext.matches(&path)
            && resolved.process.get("markdown").and_then(Value::as_bool) != Some(false);

        Ok(Document {
            kind,
            data,
            path,
            filepath: options.filepath,
            collection: options.collection,
            tokens,
            defaults: resolved,
            timestamps,
            timezone,
            baseurl: config.baseurl.clone(),
            revision: options.revision,
            markdown,
            date: None,
            categories: path_categories,
            tags: Vec::new(),
            variants: RefCell::new(Vec::new()),
            previous: Cell::new(None),
            next: Cell::new(None),
            url: OnceCell::new(),
            content: OnceCell::new(),
            excerpt: OnceCell::new(),
        })
    }

    /// Layers the resolved default values under the front matter.
    pub(crate) fn apply_defaults(&mut self) {
        self.data = apply_to_defaults(&self.defaults.values, &self.data);
    }

    /// Copies the typed fields out of `data` once construction is complete.
    /// Path-derived categories win over front matter.
    fn extend(&mut self) {
        if self.categories.is_empty() {
            self.categories = get_list(&self.data, "categories");
            if self.categories.is_empty() {
                self.categories = get_list(&self.data, "category");
            }
        }
        self.tags = get_list(&self.data, "tags");
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Front matter merged with defaults and the standard fields (`path`,
    /// `filepath`, `collection`, `raw_content`, `permalink`, file times).
    pub fn data(&self) -> &Mapping {
        &self.data
    }

    /// Source path relative to the directory the document was found in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn title(&self) -> Option<&str> {
        get_str(&self.data, "title")
    }

    pub fn permalink(&self) -> &str {
        get_str(&self.data, "permalink").unwrap_or_default()
    }

    pub fn raw_content(&self) -> Option<&str> {
        get_str(&self.data, "raw_content")
    }

    /// The explicit `layout` (an explicit `null` means no layout), else the
    /// resolved default.
    pub fn layout(&self) -> Option<&str> {
        match self.data.get("layout") {
            Some(layout) => layout.as_str(),
            None => get_str(&self.defaults.values, "layout"),
        }
    }

    /// Whether the document should be wrapped in a layout.
    pub fn place_in_layout(&self) -> bool {
        self.layout().is_some()
    }

    pub fn default_values(&self) -> &Mapping {
        &self.defaults.values
    }

    pub fn default_process(&self) -> &Mapping {
        &self.defaults.process
    }

    /// False only when the front matter says `published: false`.
    pub fn published(&self) -> bool {
        self.data.get("published").and_then(Value::as_bool) != Some(false)
    }

    /// Directory components of the path, else front-matter `categories` (or
    /// `category`).
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn file_added_time(&self) -> DateTime<FixedOffset> {
        self.timezone.localize(&self.timestamps.added)
    }

    pub fn file_modified_time(&self) -> DateTime<FixedOffset> {
        self.timezone.localize(&self.timestamps.modified)
    }

    pub fn file_created_time(&self) -> DateTime<FixedOffset> {
        self.timezone.localize(&self.timestamps.created)
    }

    /// Attaches a derived artifact, e.g. a resized image.
    pub fn add_variant(&self, variant: Rc<Document>) -> Rc<Document> {
        self.variants.borrow_mut().push(Rc::clone(&variant));
        variant
    }

    pub fn variants(&self) -> Vec<Rc<Document>> {
        self.variants.borrow().clone()
    }

    /// The permalink with its tokens expanded. `:title` and `:slug` follow
    /// the `slug` field when there is one.
    pub fn url(&self) -> &str {
        self.url.get_or_init(|| {
            let mut tokens = self.tokens.clone();
            if let Some(slug) = get_str(&self.data, "slug") {
                tokens.insert(String::from(":title"), slug.to_owned());
                tokens.insert(String::from(":slug"), slug.to_owned());
            }
            permalink::build_url(
                &tokens,
                UrlOptions {
                    pattern: self.permalink(),
                    revision: self.revision.as_deref(),
                    kind: self.kind,
                },
            )
        })
    }

    /// The output file path relative to the output root.
    pub fn destination(&self) -> String {
        permalink::destination(self.url(), &self.baseurl)
    }

    pub fn id(&self) -> String {
        permalink::id(self.url())
    }

    /// Whether the document belongs in the generated site. An explicit
    /// `output` field decides outright; otherwise unpublished, future, and
    /// draft documents are hidden unless `config` allows them.
    pub fn output(&self, config: &Config) -> bool {
        if let Some(output) = self.data.get("output") {
            return truthy(output);
        }
        if !self.published() && !config.unpublished {
            return false;
        }
        if self.future(config) && !config.future {
            return false;
        }
        if self.draft() && !config.show_drafts {
            return false;
        }
        true
    }

    /// The post date. `None` for other types.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
    }

    /// Whether the post is dated after the current time.
    pub fn future(&self, config: &Config) -> bool {
        match self.date {
            Some(date) => date > config.now(),
            None => false,
        }
    }

    /// Whether a post is marked `draft`. Always false for other types.
    pub fn draft(&self) -> bool {
        self.kind.is_post() && self.data.get("draft").map_or(false, truthy)
    }

    /// The body ready for templating: an explicit `content` field, else the
    /// raw content, converted from Markdown for Markdown sources unless the
    /// defaults disable it.
    pub fn content(&self, converter: &dyn Converter) -> &str {
        self.content.get_or_init(|| {
            if let Some(content) = get_str(&self.data, "content") {
                return content.to_owned();
            }
            let raw = self.raw_content().unwrap_or_default();
            if self.markdown {
                converter.markdown(raw)
            } else {
                raw.to_owned()
            }
        })
    }

    /// The first paragraph of the content, or an empty string when there is
    /// none. `None` for types other than posts and drafts.
    pub fn excerpt(&self, converter: &dyn Converter) -> Option<&str> {
        if !self.kind.is_post() {
            return None;
        }
        Some(
            self.excerpt
                .get_or_init(|| post::first_paragraph(self.content(converter))),
        )
    }

    /// Index of the previous (older) document in the owning collection's
    /// ascending sequence.
    pub fn previous_index(&self) -> Option<usize> {
        self.previous.get()
    }

    /// Index of the next (newer) document in the owning collection's
    /// ascending sequence.
    pub fn next_index(&self) -> Option<usize> {
        self.next.get()
    }
}

fn path_categories(path: &Path) -> Vec<String> {
    match path.parent() {
        Some(parent) => parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect(),
        None => Vec::new(),
    }
}

/// Represents the result of constructing a [`Document`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error constructing a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the source file can't be stat'ed, typically because it
    /// vanished after the directory scan.
    Stat { path: PathBuf, err: std::io::Error },

    /// Returned when the source path has no file name.
    InvalidFileName(PathBuf),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Stat { path, err } => {
                write!(f, "Reading file times of '{}': {}", path.display(), err)
            }
            Error::InvalidFileName(path) => write!(f, "invalid file name: {:?}", path),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Stat { path: _, err } => Some(err),
            Error::InvalidFileName(_) => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::markdown::Markdown;
    use chrono::{TimeZone, Utc};

    pub(crate) fn timestamps() -> FileTimestamps {
        let t = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
        FileTimestamps {
            added: t,
            modified: t,
            created: t,
        }
    }

    pub(crate) fn options(path: &str, front_matter: &str, body: &str) -> DocumentOptions {
        let mut options = DocumentOptions::new(Path::new("/site"), path);
        options.data = serde_yaml::from_str(front_matter).unwrap_or_default();
        options.content = Some(body.to_owned());
        options.timestamps = Some(timestamps());
        options
    }

    pub(crate) fn context(config: Config) -> Context {
        Context::new(config)
    }

    fn site_config() -> Config {
        Config::new("/site")
    }

    #[test]
    fn test_kind_names() {
        assert!(Kind::Post.matches("posts"));
        assert!(Kind::Post.matches("post"));
        assert!(!Kind::Post.matches("pages"));
        assert_eq!("documents", Kind::Generic.to_string());
    }

    #[test]
    fn test_base_data_and_tokens() -> Result<()> {
        let ctx = context(site_config());
        let mut opts = options("guides/setup.md", "title: Setup", "Body");
        opts.collection = Some(String::from("guides"));
        let doc = Document::new(Kind::Generic, opts, &ctx)?;

        assert_eq!(Some("Setup"), doc.title());
        assert_eq!(Some("guides/setup.md"), get_str(doc.data(), "path"));
        assert_eq!(Some("guides"), doc.collection());
        assert_eq!(Some("Body"), doc.raw_content());
        assert!(doc.data().contains_key("file_modified_time"));

        let tokens = doc.tokens();
        assert_eq!("setup", tokens[":basename"]);
        assert_eq!("guides", tokens[":dirname"]);
        assert_eq!("guides", tokens[":categories"]);
        assert_eq!(".html", tokens[":output_ext"]);
        assert_eq!("setup", tokens[":slug"]);
        assert_eq!("/guides/guides/setup.html", doc.url());
        Ok(())
    }

    #[test]
    fn test_collection_defaults_sit_under_front_matter() -> Result<()> {
        let ctx = context(site_config());
        let mut opts = options("a.md", "layout: custom", "");
        opts.defaults = serde_yaml::from_str("layout: default\nauthor: me").unwrap();
        let doc = Document::new(Kind::Page, opts, &ctx)?;
        assert_eq!(Some("custom"), doc.layout());
        assert_eq!(Some("me"), get_str(doc.data(), "author"));
        Ok(())
    }

    #[test]
    fn test_permalink_precedence() -> Result<()> {
        let mut config = site_config();
        config.permalink = String::from("/global/:title/");
        config.defaults = Config::from_yaml(
            "defaults:\n  - scope: { path: notes }\n    values: { permalink: '/notes/:basename/' }",
        )
        .unwrap()
        .defaults;
        let ctx = context(config);

        let explicit = Document::new(
            Kind::Page,
            options("notes/a.md", "permalink: /custom/", ""),
            &ctx,
        )?;
        assert_eq!("/custom/", explicit.url());

        let ruled = Document::new(Kind::Page, options("notes/b.md", "", ""), &ctx)?;
        assert_eq!("/notes/b/", ruled.url());

        let typed = Document::new(Kind::Page, options("about.md", "", ""), &ctx)?;
        assert_eq!("/about.html", typed.url());

        let global = Document::new(Kind::Post, options("2021-01-01-hi.md", "", ""), &ctx)?;
        assert_eq!("/global/hi/", global.url());
        Ok(())
    }

    #[test]
    fn test_slug_drives_title_and_slug_tokens() -> Result<()> {
        let ctx = context(site_config());
        let doc = Document::new(
            Kind::Page,
            options("My Page.md", "slug: mine\npermalink: /:title/:slug/", ""),
            &ctx,
        )?;
        assert_eq!("/mine/mine/", doc.url());

        let unslugged = Document::new(
            Kind::Page,
            options("My Page.md", "permalink: /:slug/", ""),
            &ctx,
        )?;
        assert_eq!("/my-page/", unslugged.url());
        Ok(())
    }

    #[test]
    fn test_destination_and_id() -> Result<()> {
        let mut config = site_config();
        config.baseurl = String::from("/blog");
        let ctx = context(config);
        let doc = Document::new(
            Kind::Page,
            options("about.md", "permalink: /:baseurl/:basename/", ""),
            &ctx,
        )?;
        assert_eq!("/blog/about/", doc.url());
        assert_eq!("about/index.html", doc.destination());
        assert_eq!("/blog/about", doc.id());
        Ok(())
    }

    #[test]
    fn test_output_precedence() -> Result<()> {
        let ctx = context(site_config());
        let mut config = site_config();

        let unpublished = Document::new(Kind::Page, options("a.md", "published: false", ""), &ctx)?;
        assert!(!unpublished.published());
        assert!(!unpublished.output(&config));
        config.unpublished = true;
        assert!(unpublished.output(&config));

        let forced = Document::new(
            Kind::Post,
            options(
                "2999-01-01-later.md",
                "output: true\ndraft: true\npublished: false",
                "",
            ),
            &ctx,
        )?;
        assert!(forced.output(&site_config()));

        let hidden = Document::new(Kind::Page, options("b.md", "output: false", ""), &ctx)?;
        assert!(!hidden.output(&config));
        Ok(())
    }

    #[test]
    fn test_draft_visibility_follows_config() -> Result<()> {
        let ctx = context(site_config());
        let doc = Document::new(
            Kind::Post,
            options("2021-01-01-wip.md", "draft: true", ""),
            &ctx,
        )?;
        let mut config = site_config();
        assert!(doc.draft());
        assert!(!doc.output(&config));
        config.show_drafts = true;
        assert!(doc.output(&config));
        Ok(())
    }

    #[test]
    fn test_draft_flag_ignored_for_pages() -> Result<()> {
        let ctx = context(site_config());
        let doc = Document::new(Kind::Page, options("a.md", "draft: true", ""), &ctx)?;
        assert!(!doc.draft());
        assert!(doc.output(&site_config()));
        Ok(())
    }

    #[test]
    fn test_content_is_converted_and_memoized() -> Result<()> {
        let ctx = context(site_config());
        let md = Document::new(Kind::Page, options("a.md", "", "Hello *there*"), &ctx)?;
        assert_eq!("<p>Hello <em>there</em></p>\n", md.content(&Markdown));
        assert!(std::ptr::eq(md.content(&Markdown), md.content(&Markdown)));

        let html = Document::new(Kind::Page, options("a.html", "", "<b>raw</b>"), &ctx)?;
        assert_eq!("<b>raw</b>", html.content(&Markdown));

        let explicit = Document::new(Kind::Page, options("c.md", "content: given", "*x*"), &ctx)?;
        assert_eq!("given", explicit.content(&Markdown));
        Ok(())
    }

    #[test]
    fn test_process_hint_disables_markdown() -> Result<()> {
        let mut config = site_config();
        config.defaults = Config::from_yaml(
            "defaults:\n  - scope: { path: raw }\n    process: { markdown: false }",
        )
        .unwrap()
        .defaults;
        let ctx = context(config);
        let doc = Document::new(Kind::Page, options("raw/a.md", "", "*x*"), &ctx)?;
        assert_eq!("*x*", doc.content(&Markdown));
        Ok(())
    }

    #[test]
    fn test_layout_and_categories() -> Result<()> {
        let mut config = site_config();
        config.defaults = Config::from_yaml("defaults:\n  - values: { layout: base }")
            .unwrap()
            .defaults;
        let ctx = context(config);

        let defaulted = Document::new(Kind::Page, options("a.md", "categories: [x, y]", ""), &ctx)?;
        assert_eq!(Some("base"), defaulted.layout());
        assert!(defaulted.place_in_layout());
        assert_eq!(&["x", "y"], defaulted.categories());

        let none = Document::new(Kind::Page, options("a/b/c.md", "layout: ~\ncategories: z", ""), &ctx)?;
        assert_eq!(None, none.layout());
        assert_eq!(&["a", "b"], none.categories());
        Ok(())
    }

    #[test]
    fn test_missing_file_fails_construction() {
        let ctx = context(site_config());
        let opts = DocumentOptions::new(Path::new("/definitely/not/here"), "gone.md");
        match Document::new(Kind::File, opts, &ctx) {
            Err(Error::Stat { .. }) => {}
            other => panic!("expected a stat error, got {:?}", other.map(|d| d.path)),
        }
    }

    #[test]
    fn test_variants_append() -> Result<()> {
        let ctx = context(site_config());
        let image = Document::new(Kind::Image, options("a.png", "", ""), &ctx)?;
        let small = Rc::new(Document::new(Kind::Image, options("a-small.png", "", ""), &ctx)?);
        image.add_variant(Rc::clone(&small));
        let variants = image.variants();
        assert_eq!(1, variants.len());
        assert!(Rc::ptr_eq(&small, &variants[0]));
        assert_eq!("/a.png", image.url());
        Ok(())
    }
}
