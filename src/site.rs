//! Defines the [`Site`] content graph and the [`Context`] it is built from.
//!
//! A `Site` owns one generation of the graph. Every document is reached
//! through [`Site::get_or_set_object`], which caches by absolute source path
//! so that each path maps to exactly one [`Document`] instance (or to a
//! remembered "does not exist"). Collections, data, assets, and taxonomies
//! are built on first access and cached until [`Site::reset`]; each is built
//! into a local value and only stored once complete, so nothing re-entrant
//! ever observes a half-built sequence.

use crate::collection::Collection;
use crate::config::{Config, Extensions};
use crate::document::{self, Document, DocumentOptions, Kind};
use crate::frontmatter::{FileTimestamps, FrontMatterLoader, Loader, RawRecord};
use crate::hooks::{Hooks, NoHooks, Subject};
use crate::markdown::{Converter, Markdown};
use crate::tag::Taxonomy;
use crate::util::{self, scan, set, truthy, Scan};
use chrono::{DateTime, FixedOffset};
use serde_yaml::{Mapping, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;

const PAGES: &str = "pages";
const POSTS: &str = "posts";
const DRAFTS: &str = "drafts";

/// The configuration and collaborators a [`Site`] and its documents are
/// built with.
#[derive(Clone)]
pub struct Context {
    pub config: Config,
    pub hooks: Rc<dyn Hooks>,
    pub converter: Rc<dyn Converter>,
    pub loader: Rc<dyn Loader>,
}

impl Context {
    /// A context with no hooks, the Markdown converter, and the front-matter
    /// loader.
    pub fn new(config: Config) -> Context {
        Context {
            config,
            hooks: Rc::new(NoHooks),
            converter: Rc::new(Markdown),
            loader: Rc::new(FrontMatterLoader),
        }
    }
}

/// How [`Site::get_or_set_object`] should build a document on a cache miss.
#[derive(Clone, Debug)]
pub struct ObjectOptions {
    pub kind: Kind,
    pub collection: Option<String>,
    pub defaults: Mapping,
    pub record: Option<RawRecord>,
    pub permalink: Option<String>,
    pub revision: Option<String>,
}

impl ObjectOptions {
    pub fn new(kind: Kind) -> ObjectOptions {
        ObjectOptions {
            kind,
            collection: None,
            defaults: Mapping::new(),
            record: None,
            permalink: None,
            revision: None,
        }
    }
}

/// Per-generation state. `None` means "not built yet".
struct Store {
    time: DateTime<FixedOffset>,
    objects_by_path: HashMap<PathBuf, Option<Rc<Document>>>,
    objects_by_url: HashMap<String, Rc<Document>>,
    collections: BTreeMap<String, Collection>,
    named: Option<BTreeMap<String, Collection>>,
    data: Option<BTreeMap<String, Rc<Document>>>,
    categories: Option<Taxonomy>,
    tags: Option<Taxonomy>,
    images: Option<Vec<Rc<Document>>>,
    files: Option<Vec<Rc<Document>>>,
    scripts: Option<Vec<Rc<Document>>>,
    styles: Option<Vec<Rc<Document>>>,
}

impl Store {
    fn new(time: DateTime<FixedOffset>) -> Store {
        Store {
            time,
            objects_by_path: HashMap::new(),
            objects_by_url: HashMap::new(),
            collections: BTreeMap::new(),
            named: None,
            data: None,
            categories: None,
            tags: None,
            images: None,
            files: None,
            scripts: None,
            styles: None,
        }
    }
}

/// The content graph of one site generation.
pub struct Site {
    ctx: Context,
    store: RefCell<Store>,
}

impl Site {
    /// Creates the site, fires `site/afterInit`, then [`Site::reset`]s it,
    /// which builds the whole graph.
    pub fn new(ctx: Context) -> Site {
        let time = ctx.config.now();
        let site = Site {
            ctx,
            store: RefCell::new(Store::new(time)),
        };
        site.trigger("afterInit");
        site.reset();
        site
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    pub fn converter(&self) -> &dyn Converter {
        &*self.ctx.converter
    }

    fn trigger(&self, event: &str) {
        self.ctx.hooks.trigger("site", event, Subject::Site(self));
    }

    /// Starts a new generation: drops every cached document and collection,
    /// fixes [`Site::time`], rebuilds the named collections, fires
    /// `site/afterReset`, and then [`Site::read`]s the whole graph.
    pub fn reset(&self) {
        *self.store.borrow_mut() = Store::new(self.ctx.config.now());
        self.reset_collections();
        self.trigger("afterReset");
        self.read();
    }

    /// Builds every lazily computed part of the graph, then fires
    /// `site/postRead`.
    pub fn read(&self) {
        self.pages();
        self.data();
        self.posts();
        self.drafts();
        self.categories();
        self.tags();
        self.images();
        self.files();
        self.scripts();
        self.styles();
        self.collections();
        self.trigger("postRead");
    }

    /// The generation time, fixed at the last reset.
    pub fn time(&self) -> DateTime<FixedOffset> {
        self.store.borrow().time
    }

    fn cached(&self, filepath: &Path) -> Option<Option<Rc<Document>>> {
        let hit = self.store.borrow().objects_by_path.get(filepath).cloned();
        if hit.is_some() {
            log::trace!("object cache hit for `{}`", filepath.display());
        }
        hit
    }

    /// Cache lookup for `directory/relpath`. A path that doesn't exist is
    /// remembered as missing. `None` means it must still be built.
    fn lookup(&self, directory: &Path, relpath: &Path) -> Option<Option<Rc<Document>>> {
        let filepath = util::absolute(&directory.join(relpath));
        if let Some(hit) = self.cached(&filepath) {
            return Some(hit);
        }
        if !filepath.is_file() {
            log::debug!("`{}` does not exist", filepath.display());
            self.store
                .borrow_mut()
                .objects_by_path
                .insert(filepath, None);
            return Some(None);
        }
        None
    }

    /// Returns the value in `slot`, computing and storing it first when the
    /// slot is empty. No borrow is held while `compute` runs, so it may use
    /// other accessors; the slot is only filled with the finished value.
    fn get_or_compute<T: Clone>(
        &self,
        slot: fn(&mut Store) -> &mut Option<T>,
        compute: impl FnOnce() -> T,
    ) -> T {
        let cached = slot(&mut self.store.borrow_mut()).clone();
        if let Some(value) = cached {
            return value;
        }
        let value = compute();
        slot(&mut self.store.borrow_mut()).get_or_insert(value).clone()
    }

    /// Returns the one document for `directory/relpath`, building it on
    /// first request. A path that doesn't exist is remembered as missing and
    /// not looked up on disk again this generation. A document that fails to
    /// build is logged and skipped without being cached.
    pub fn get_or_set_object(
        &self,
        relpath: &Path,
        directory: &Path,
        options: ObjectOptions,
    ) -> Option<Rc<Document>> {
        if let Some(hit) = self.lookup(directory, relpath) {
            return hit;
        }
        let filepath = util::absolute(&directory.join(relpath));

        let mut doc_options = DocumentOptions::new(directory, relpath);
        if let Some(record) = options.record {
            doc_options = doc_options.with_record(record);
        }
        doc_options.filepath = filepath.clone();
        doc_options.collection = options.collection;
        doc_options.defaults = options.defaults;
        doc_options.permalink = options.permalink;
        doc_options.revision = options.revision;

        match Document::new(options.kind, doc_options, &self.ctx) {
            Ok(doc) => self
                .store
                .borrow_mut()
                .objects_by_path
                .entry(filepath)
                .or_insert_with(|| Some(Rc::new(doc)))
                .clone(),
            Err(err) => {
                log::warn!("skipping `{}`: {}", filepath.display(), err);
                None
            }
        }
    }

    /// Looks up a cached document by source path without building one.
    pub fn object(&self, path: &Path) -> Option<Rc<Document>> {
        self.cached(&util::absolute(path)).flatten()
    }

    /// Evicts a path from the object cache. Returns whether it was cached.
    pub fn delete_object(&self, path: &Path) -> bool {
        self.store
            .borrow_mut()
            .objects_by_path
            .remove(&util::absolute(path))
            .is_some()
    }

    fn builtin(&self, label: &str) -> Collection {
        let config = &self.ctx.config;
        let (directory, relative, output) = match label {
            POSTS => (config.posts_directory(), config.posts_dir.clone(), true),
            DRAFTS => (config.drafts_directory(), config.drafts_dir.clone(), false),
            _ => (config.source.clone(), PathBuf::from("."), true),
        };
        let mut collection = Collection::new(label, directory);
        collection.relative_directory = relative;
        collection.output = output;
        if label == DRAFTS {
            set(&mut collection.defaults, "draft", true);
        }
        collection
    }

    /// The stored collection for `label`, registering its descriptor first
    /// if needed.
    fn ensure_collection(&self, label: &str) -> Collection {
        if let Some(collection) = self.store.borrow().collections.get(label) {
            return collection.clone();
        }
        let collection = self.builtin(label);
        self.store
            .borrow_mut()
            .collections
            .entry(label.to_owned())
            .or_insert(collection)
            .clone()
    }

    fn populated_docs(&self, label: &str) -> Option<Vec<Rc<Document>>> {
        let store = self.store.borrow();
        let collection = store.collections.get(label)?;
        if collection.populated {
            Some(collection.docs.clone())
        } else {
            None
        }
    }

    fn publish(&self, label: &str, docs: Vec<Rc<Document>>) {
        let mut store = self.store.borrow_mut();
        if let Some(collection) = store.collections.get_mut(label) {
            collection.docs = docs;
            collection.populated = true;
        }
    }

    fn page_in(&self, directory: &Path, relpath: &Path, label: Option<&str>) -> Option<Rc<Document>> {
        if let Some(hit) = self.lookup(directory, relpath) {
            return hit;
        }
        let record = self.ctx.loader.load(directory, relpath)?;
        record.front_matter.as_ref()?;
        self.get_or_set_object(
            relpath,
            directory,
            ObjectOptions {
                collection: label.map(str::to_owned),
                record: Some(record),
                ..ObjectOptions::new(Kind::Page)
            },
        )
    }

    /// The page at `relpath` under the site source. Files without front
    /// matter aren't pages.
    pub fn page(&self, relpath: &Path) -> Option<Rc<Document>> {
        self.page_in(&self.ctx.config.source, relpath, None)
    }

    /// Every visible Markdown or HTML page under the source. Private
    /// (`_`-prefixed) files and directories are skipped.
    pub fn pages(&self) -> Vec<Rc<Document>> {
        if let Some(docs) = self.populated_docs(PAGES) {
            return docs;
        }
        let collection = self.ensure_collection(PAGES);
        let config = &self.ctx.config;

        let mut docs = Vec::new();
        let found = scan(
            &collection.directory,
            Scan {
                dot: false,
                ignore_modules: true,
            },
        );
        for relpath in found {
            if !(config.html_ext.matches(&relpath) || config.markdown_ext.matches(&relpath)) {
                continue;
            }
            if let Some(page) = self.page_in(&collection.directory, &relpath, Some(PAGES)) {
                if page.output(config) {
                    docs.push(page);
                }
            }
        }

        log::debug!("read {} pages", docs.len());
        self.publish(PAGES, docs.clone());
        docs
    }

    fn post_in(&self, collection: &Collection, relpath: &Path, kind: Kind) -> Option<Rc<Document>> {
        let directory = &collection.directory;
        if let Some(hit) = self.lookup(directory, relpath) {
            return hit;
        }
        let record = self.ctx.loader.load(directory, relpath)?;
        self.get_or_set_object(
            relpath,
            directory,
            ObjectOptions {
                collection: Some(collection.label.clone()),
                defaults: collection.defaults.clone(),
                record: Some(record),
                ..ObjectOptions::new(kind)
            },
        )
    }

    /// The post at `relpath` under the posts directory.
    pub fn post(&self, relpath: &Path) -> Option<Rc<Document>> {
        let collection = self.ensure_collection(POSTS);
        self.post_in(&collection, relpath, Kind::Post)
    }

    /// The draft at `relpath` under the drafts directory.
    pub fn draft(&self, relpath: &Path) -> Option<Rc<Document>> {
        let collection = self.ensure_collection(DRAFTS);
        self.post_in(&collection, relpath, Kind::Draft)
    }

    /// Visible posts, newest first.
    pub fn posts(&self) -> Vec<Rc<Document>> {
        self.dated(POSTS, Kind::Post)
    }

    /// Visible drafts, newest first. Drafts default to `draft: true`, so
    /// they only show with `show_drafts`.
    pub fn drafts(&self) -> Vec<Rc<Document>> {
        self.dated(DRAFTS, Kind::Draft)
    }

    /// Builds a dated collection. The collection keeps its documents oldest
    /// first with `previous`/`next` indexing into that order; callers get
    /// them newest first.
    fn dated(&self, label: &str, kind: Kind) -> Vec<Rc<Document>> {
        if let Some(mut docs) = self.populated_docs(label) {
            docs.reverse();
            return docs;
        }
        let collection = self.ensure_collection(label);
        let config = &self.ctx.config;

        let mut docs = Vec::new();
        for relpath in scan(&collection.directory, Scan::default()) {
            if !config.markdown_ext.matches(&relpath) {
                continue;
            }
            if let Some(post) = self.post_in(&collection, &relpath, kind) {
                if post.output(config) {
                    docs.push(post);
                }
            }
        }

        docs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
        let len = docs.len();
        for (i, doc) in docs.iter().enumerate() {
            doc.previous.set(i.checked_sub(1));
            doc.next.set(if i + 1 < len { Some(i + 1) } else { None });
        }

        log::debug!("read {} {}", len, label);
        self.publish(label, docs.clone());
        docs.reverse();
        docs
    }

    fn neighbour(&self, doc: &Document, index: Option<usize>) -> Option<Rc<Document>> {
        let index = index?;
        let store = self.store.borrow();
        let neighbour = store.collections.get(doc.collection()?)?.docs.get(index).cloned();
        neighbour
    }

    /// The next older post or draft.
    pub fn previous(&self, doc: &Document) -> Option<Rc<Document>> {
        self.neighbour(doc, doc.previous_index())
    }

    /// The next newer post or draft.
    pub fn next(&self, doc: &Document) -> Option<Rc<Document>> {
        self.neighbour(doc, doc.next_index())
    }

    /// Posts grouped by lower-cased category.
    pub fn categories(&self) -> Taxonomy {
        self.get_or_compute(|store| &mut store.categories, || self.read_categories())
    }

    fn read_categories(&self) -> Taxonomy {
        Taxonomy::build(&self.posts(), Document::categories)
    }

    /// Posts grouped by lower-cased tag.
    pub fn tags(&self) -> Taxonomy {
        self.get_or_compute(|store| &mut store.tags, || self.read_tags())
    }

    fn read_tags(&self) -> Taxonomy {
        Taxonomy::build(&self.posts(), Document::tags)
    }

    fn load_data(&self, directory: &Path, relpath: &Path) -> Option<RawRecord> {
        let filepath = directory.join(relpath);
        let parsed = std::fs::read_to_string(&filepath)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_yaml::from_str::<Value>(&text).map_err(|e| e.to_string()));
        let value = match parsed {
            Ok(value) => value,
            Err(err) => {
                log::warn!("skipping data file `{}`: {}", filepath.display(), err);
                return None;
            }
        };
        let data = match value {
            Value::Mapping(data) => data,
            Value::Null => Mapping::new(),
            other => {
                let mut data = Mapping::new();
                set(&mut data, "value", other);
                data
            }
        };
        Some(RawRecord {
            timestamps: FileTimestamps::stat(&filepath).ok()?,
            filepath,
            relative_path: relpath.to_owned(),
            front_matter: Some(data),
            content: None,
        })
    }

    /// Data files keyed by file stem. A file whose root isn't a mapping is
    /// exposed under the `value` field.
    pub fn data(&self) -> BTreeMap<String, Rc<Document>> {
        self.get_or_compute(|store| &mut store.data, || self.read_data())
    }

    fn read_data(&self) -> BTreeMap<String, Rc<Document>> {
        let config = &self.ctx.config;
        let directory = config.data_directory();

        let mut data = BTreeMap::new();
        for relpath in scan(&directory, Scan::default()) {
            if !config.data_ext.matches(&relpath) {
                continue;
            }
            let name = match relpath.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            };
            let doc = match self.lookup(&directory, &relpath) {
                Some(hit) => hit,
                None => match self.load_data(&directory, &relpath) {
                    Some(record) => self.get_or_set_object(
                        &relpath,
                        &directory,
                        ObjectOptions {
                            record: Some(record),
                            ..ObjectOptions::new(Kind::Data)
                        },
                    ),
                    None => None,
                },
            };
            if let Some(doc) = doc {
                if data.insert(name.clone(), doc).is_some() {
                    log::debug!("data file `{}` shadows an earlier `{}`", relpath.display(), name);
                }
            }
        }

        data
    }

    /// `dir` relative to the source, as a URL prefix without the private
    /// `_` marker, e.g. `_images` becomes `/images`.
    fn asset_permalink(&self, dir: &Path) -> String {
        let relative = dir
            .strip_prefix(&self.ctx.config.source)
            .unwrap_or(dir);
        let prefix = util::slashed(relative);
        format!(
            "/{}/:path:output_ext",
            prefix.trim_start_matches('/').trim_start_matches('_')
        )
    }

    fn asset(&self, kind: Kind, directory: &Path, relpath: &Path) -> Option<Rc<Document>> {
        self.get_or_set_object(
            relpath,
            directory,
            ObjectOptions {
                permalink: Some(self.asset_permalink(directory)),
                ..ObjectOptions::new(kind)
            },
        )
    }

    fn assets(&self, kind: Kind, directory: &Path, extensions: &Extensions) -> Vec<Rc<Document>> {
        let found = scan(
            directory,
            Scan {
                dot: false,
                ignore_modules: true,
            },
        );
        let assets: Vec<Rc<Document>> = found
            .iter()
            .filter(|relpath| extensions.matches(relpath))
            .filter_map(|relpath| match kind {
                Kind::Image => self.image(relpath),
                _ => self.asset(kind, directory, relpath),
            })
            .collect();
        log::debug!("read {} {}", assets.len(), kind);
        assets
    }

    /// The image at `relpath` under the images directory. Images are also
    /// indexed by URL.
    pub fn image(&self, relpath: &Path) -> Option<Rc<Document>> {
        let image = self.asset(Kind::Image, &self.ctx.config.images_directory(), relpath)?;
        self.store
            .borrow_mut()
            .objects_by_url
            .entry(image.url().to_owned())
            .or_insert_with(|| Rc::clone(&image));
        Some(image)
    }

    /// Registers an image built outside the scan, such as a generated
    /// variant, under both its path and its URL. Existing entries are kept.
    pub fn add_image(&self, options: DocumentOptions) -> document::Result<Rc<Document>> {
        let image = Rc::new(Document::new(Kind::Image, options, &self.ctx)?);
        let mut store = self.store.borrow_mut();
        store
            .objects_by_path
            .entry(util::absolute(image.filepath()))
            .or_insert_with(|| Some(Rc::clone(&image)));
        store
            .objects_by_url
            .entry(image.url().to_owned())
            .or_insert_with(|| Rc::clone(&image));
        Ok(image)
    }

    pub fn image_by_url(&self, url: &str) -> Option<Rc<Document>> {
        self.store.borrow().objects_by_url.get(url).cloned()
    }

    pub fn images(&self) -> Vec<Rc<Document>> {
        let config = &self.ctx.config;
        self.get_or_compute(
            |store| &mut store.images,
            || self.assets(Kind::Image, &config.images_directory(), &config.images_ext),
        )
    }

    pub fn script(&self, relpath: &Path) -> Option<Rc<Document>> {
        self.asset(Kind::Script, &self.ctx.config.scripts_directory(), relpath)
    }

    pub fn scripts(&self) -> Vec<Rc<Document>> {
        let config = &self.ctx.config;
        self.get_or_compute(
            |store| &mut store.scripts,
            || self.assets(Kind::Script, &config.scripts_directory(), &config.scripts_ext),
        )
    }

    pub fn style(&self, relpath: &Path) -> Option<Rc<Document>> {
        self.asset(Kind::Style, &self.ctx.config.styles_directory(), relpath)
    }

    pub fn styles(&self) -> Vec<Rc<Document>> {
        let config = &self.ctx.config;
        self.get_or_compute(
            |store| &mut store.styles,
            || self.assets(Kind::Style, &config.styles_directory(), &config.styles_ext),
        )
    }

    fn file_in(&self, directory: &Path, relpath: &Path, label: Option<&str>) -> Option<Rc<Document>> {
        let config = &self.ctx.config;
        if let Some(hit) = self.lookup(directory, relpath) {
            // an HTML file that already became a page isn't also a file
            if config.html_ext.matches(relpath) && hit.is_some() {
                return None;
            }
            return hit;
        }
        let record = if config.images_ext.matches(relpath) {
            None
        } else {
            self.ctx.loader.load(directory, relpath)
        };
        self.get_or_set_object(
            relpath,
            directory,
            ObjectOptions {
                collection: label.map(str::to_owned),
                record,
                ..ObjectOptions::new(Kind::File)
            },
        )
    }

    /// The plain file at `relpath` under the source.
    pub fn file(&self, relpath: &Path) -> Option<Rc<Document>> {
        self.file_in(&self.ctx.config.source, relpath, None)
    }

    /// Every non-Markdown file under the source (dot files included) that
    /// isn't a page.
    pub fn files(&self) -> Vec<Rc<Document>> {
        self.get_or_compute(|store| &mut store.files, || self.read_files())
    }

    fn read_files(&self) -> Vec<Rc<Document>> {
        // pages claim their HTML files first
        self.pages();

        let config = &self.ctx.config;
        let found = scan(
            &config.source,
            Scan {
                dot: true,
                ignore_modules: true,
            },
        );
        let files: Vec<Rc<Document>> = found
            .iter()
            .filter(|relpath| !config.markdown_ext.matches(relpath))
            .filter_map(|relpath| self.file_in(&config.source, relpath, None))
            .collect();

        log::debug!("read {} files", files.len());
        files
    }

    /// A generic document in `collection`. Requires front matter.
    pub fn document(&self, relpath: &Path, collection: &Collection) -> Option<Rc<Document>> {
        let directory = &collection.directory;
        if let Some(hit) = self.lookup(directory, relpath) {
            return hit;
        }
        let record = self.ctx.loader.load(directory, relpath)?;
        record.front_matter.as_ref()?;
        self.get_or_set_object(
            relpath,
            directory,
            ObjectOptions {
                collection: Some(collection.label.clone()),
                defaults: collection.defaults.clone(),
                record: Some(record),
                ..ObjectOptions::new(Kind::Generic)
            },
        )
    }

    /// Builds the user-defined collection `label` from `_<label>` under the
    /// source. Markdown and HTML files with front matter become documents
    /// (kept when visible); everything else becomes a file. `options` serve
    /// as the documents' default front matter.
    pub fn get_collection(&self, label: &str, options: &Mapping) -> Collection {
        let config = &self.ctx.config;
        let relative = PathBuf::from(format!("_{}", label));
        let mut collection = Collection::new(label, config.source.join(&relative));
        collection.relative_directory = relative;
        collection.output = options.get("output").map_or(false, truthy);
        collection.defaults = options.clone();

        let directory = collection.directory.clone();
        for relpath in scan(&directory, Scan::default()) {
            let renderable =
                config.markdown_ext.matches(&relpath) || config.html_ext.matches(&relpath);
            let doc = if renderable {
                self.document(&relpath, &collection)
            } else {
                None
            };
            match doc {
                Some(doc) => {
                    if doc.output(config) {
                        collection.docs.push(doc);
                    }
                }
                None => {
                    if let Some(file) = self.file_in(&directory, &relpath, Some(label)) {
                        collection.files.push(file);
                    }
                }
            }
        }

        log::debug!(
            "read collection `{}`: {} docs, {} files",
            label,
            collection.docs.len(),
            collection.files.len()
        );
        collection.populated = true;
        collection
    }

    /// Builds every configured collection.
    pub fn get_collections(&self) -> BTreeMap<String, Collection> {
        self.ctx
            .config
            .collections
            .entries()
            .into_iter()
            .map(|(label, options)| {
                let collection = self.get_collection(&label, &options);
                (label, collection)
            })
            .collect()
    }

    /// Rebuilds the configured collections for this generation.
    pub fn reset_collections(&self) {
        let named = self.get_collections();
        self.store.borrow_mut().named = Some(named);
    }

    /// Every collection: pages, posts, drafts, and the configured ones. A
    /// configured collection named like a built-in one replaces it.
    pub fn collections(&self) -> BTreeMap<String, Collection> {
        self.pages();
        self.posts();
        self.drafts();

        let built = self.store.borrow().named.clone();
        let named = match built {
            Some(named) => named,
            None => {
                let named = self.get_collections();
                self.store.borrow_mut().named = Some(named.clone());
                named
            }
        };

        let mut all = self.store.borrow().collections.clone();
        all.extend(named);
        all
    }

    pub fn collection(&self, label: &str) -> Option<Collection> {
        self.collections().remove(label)
    }
}
