//! Page construction: standalone documents found anywhere under the site
//! source. Documents of user-defined collections take no title default.

use crate::document::Document;
use crate::util::set;

/// Finishes a page: the title defaults to the file's base name, then the
/// resolved defaults are layered under the front matter.
pub(crate) fn init(doc: &mut Document) {
    if doc.title().is_none() {
        let title = doc.tokens[":basename"].clone();
        set(&mut doc.data, "title", title);
    }
    doc.apply_defaults();
}

#[cfg(test)]
mod test {
    use crate::config::Config;
    use crate::document::test::{context, options};
    use crate::document::{Document, Kind, Result};
    use crate::hooks::{Hooks, Subject};
    use crate::site::Context;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(String, String, String)>>);

    impl Hooks for Recorder {
        fn trigger(&self, scope: &str, event: &str, subject: Subject<'_>) {
            let title = match subject {
                Subject::Document(doc) => doc.title().unwrap_or_default().to_owned(),
                Subject::Site(_) => String::new(),
            };
            self.0
                .borrow_mut()
                .push((scope.to_owned(), event.to_owned(), title));
        }
    }

    #[test]
    fn test_title_defaults_to_basename() -> Result<()> {
        let ctx = context(Config::new("/site"));
        let page = Document::new(Kind::Page, options("docs/install.md", "", ""), &ctx)?;
        assert_eq!(Some("install"), page.title());

        let titled = Document::new(Kind::Page, options("docs/install.md", "title: Setup", ""), &ctx)?;
        assert_eq!(Some("Setup"), titled.title());
        Ok(())
    }

    #[test]
    fn test_rule_defaults_apply_below_front_matter() -> Result<()> {
        let mut config = Config::new("/site");
        config.defaults = Config::from_yaml(
            "defaults:\n  - scope: { type: pages }\n    values: { layout: page, title: Untitled, slug: fixed }",
        )
        .unwrap()
        .defaults;
        let ctx = context(config);

        let page = Document::new(
            Kind::Page,
            options("a.md", "layout: wide\npermalink: /:slug/", ""),
            &ctx,
        )?;
        assert_eq!(Some("wide"), page.layout());
        // the base name is filled in before the rule defaults are consulted
        assert_eq!(Some("a"), page.title());
        assert_eq!("/fixed/", page.url());
        Ok(())
    }

    #[test]
    fn test_post_init_hook_fires_once_built() -> Result<()> {
        let recorder = Rc::new(Recorder::default());
        let mut ctx: Context = context(Config::new("/site"));
        ctx.hooks = recorder.clone();

        Document::new(Kind::Page, options("a.md", "", ""), &ctx)?;
        Document::new(Kind::File, options("b.css", "", ""), &ctx)?;
        Document::new(Kind::Generic, options("c.md", "", ""), &ctx)?;
        Document::new(Kind::Draft, options("2021-01-01-idea.md", "", ""), &ctx)?;

        let fired = |scope: &str, title: &str| {
            (scope.to_owned(), String::from("postInit"), title.to_owned())
        };
        assert_eq!(
            vec![fired("pages", "a"), fired("posts", "idea")],
            *recorder.0.borrow()
        );
        Ok(())
    }

    #[test]
    fn test_generic_documents_take_no_title_default() -> Result<()> {
        let mut config = Config::new("/site");
        config.defaults = Config::from_yaml(
            "defaults:\n  - scope: { type: documents }\n    values: { layout: entry }",
        )
        .unwrap()
        .defaults;
        let ctx = context(config);

        let mut opts = options("_recipes/pie.md", "", "");
        opts.collection = Some(String::from("recipes"));
        let doc = Document::new(Kind::Generic, opts, &ctx)?;
        assert_eq!(None, doc.title());
        assert_eq!(Some("entry"), doc.layout());
        Ok(())
    }
}
