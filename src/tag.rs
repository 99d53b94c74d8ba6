//! Defines the [`Taxonomy`] type, which groups posts by category or tag.

use crate::document::Document;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Posts grouped under lower-cased names. Keys are sorted; each group keeps
/// the order in which its posts were indexed, and holds a post at most once.
#[derive(Clone, Debug, Default)]
pub struct Taxonomy(BTreeMap<String, Vec<Rc<Document>>>);

impl Taxonomy {
    /// Indexes `posts` by the names `names` yields for each post. `Tech` and
    /// `tech` land in the same group.
    pub fn build<'a, I, F>(posts: I, names: F) -> Taxonomy
    where
        I: IntoIterator<Item = &'a Rc<Document>>,
        F: Fn(&Document) -> &[String],
    {
        let mut groups: BTreeMap<String, Vec<Rc<Document>>> = BTreeMap::new();
        for post in posts {
            for name in names(&**post) {
                let group = groups.entry(name.to_lowercase()).or_default();
                if !group.iter().any(|p| Rc::ptr_eq(p, post)) {
                    group.push(Rc::clone(post));
                }
            }
        }
        Taxonomy(groups)
    }

    pub fn get(&self, name: &str) -> Option<&[Rc<Document>]> {
        self.0.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rc<Document>])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::document::test::{context, options};
    use crate::document::{Document, Kind};

    #[test]
    fn test_groups_case_insensitively_in_order() {
        let ctx = context(Config::new("/site"));
        let post = |path: &str, tags: &str| {
            Rc::new(Document::new(Kind::Post, options(path, tags, ""), &ctx).unwrap())
        };
        let a = post("2021-01-01-a.md", "tags: [Tech, Life]");
        let b = post("2021-01-02-b.md", "tags: [tech]");
        let c = post("2021-01-03-c.md", "tags: [TECH, tech]");
        let posts = vec![a.clone(), b.clone(), c.clone()];

        let tags = Taxonomy::build(&posts, Document::tags);
        assert_eq!(vec!["life", "tech"], tags.names().collect::<Vec<_>>());

        let tech = tags.get("Tech").unwrap();
        assert_eq!(3, tech.len());
        assert!(Rc::ptr_eq(&a, &tech[0]));
        assert!(Rc::ptr_eq(&b, &tech[1]));
        assert!(Rc::ptr_eq(&c, &tech[2]));
        assert!(tags.get("missing").is_none());
    }
}
