//! The seam through which the content graph announces lifecycle events to
//! plugins. Dispatching is up to the [`Hooks`] implementation; the graph only
//! fires the trigger points:
//!
//! | scope | event | subject |
//! |---|---|---|
//! | `site` | `afterInit`, `afterReset`, `postRead` | the [`Site`] |
//! | `pages`, `posts` | `postInit` | the newly built [`Document`] |
//!
//! Drafts are built as posts and fire `posts/postInit`; check
//! [`Document::kind`] to tell them apart.

use crate::document::Document;
use crate::site::Site;

/// What a hook is fired for.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    Site(&'a Site),
    Document(&'a Document),
}

pub trait Hooks {
    fn trigger(&self, scope: &str, event: &str, subject: Subject<'_>);
}

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl Hooks for NoHooks {
    fn trigger(&self, _scope: &str, _event: &str, _subject: Subject<'_>) {}
}

impl<F> Hooks for F
where
    F: Fn(&str, &str, Subject<'_>),
{
    fn trigger(&self, scope: &str, event: &str, subject: Subject<'_>) {
        self(scope, event, subject)
    }
}
