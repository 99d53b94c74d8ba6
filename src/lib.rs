//! The library code for the `velvet` content engine. It turns a static site's
//! source tree into a graph of documents with resolved metadata and
//! permalinks, ready to be handed to a renderer. The work breaks down into
//! four parts:
//!
//! 1. Resolving cascading defaults for a document from ranked configuration
//!    rules ([`crate::defaults`])
//! 2. Expanding permalink patterns into URLs and output paths
//!    ([`crate::permalink`])
//! 3. Building documents (pages, posts, drafts, data, assets, and generic
//!    collection documents) from source files ([`crate::document`])
//! 4. Assembling and caching the site graph: collections, ordering,
//!    taxonomies, and lifecycle hooks ([`crate::site`])
//!
//! Everything is built lazily and cached per generation; [`Site::reset`]
//! starts a new generation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod collection;
pub mod config;
pub mod defaults;
pub mod document;
pub mod frontmatter;
pub mod hooks;
pub mod markdown;
pub mod page;
pub mod permalink;
pub mod post;
pub mod site;
pub mod tag;
pub mod util;
pub mod value;

pub use crate::collection::Collection;
pub use crate::config::Config;
pub use crate::document::{Document, DocumentOptions, Kind};
pub use crate::site::{Context, Site};
