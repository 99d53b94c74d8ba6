//! Converts documents, taxonomies, and front matter into [`Value`]s for
//! templating.

use crate::document::Document;
use crate::markdown::Converter;
use crate::site::Site;
use crate::tag::Taxonomy;
use gtmpl_value::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Converts a YAML value. Mapping keys that aren't strings are rendered as
/// YAML scalars.
pub fn yaml(value: &serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or_default())
            }
        }
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(items.iter().map(yaml).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .iter()
                .map(|(k, v)| (key(k), yaml(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml(&tagged.value),
    }
}

fn key(k: &serde_yaml::Value) -> String {
    match k.as_str() {
        Some(s) => s.to_owned(),
        None => serde_yaml::to_string(k)
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_default(),
    }
}

fn strings(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
}

fn optional(s: Option<&str>) -> Value {
    s.map_or(Value::Nil, |s| Value::String(s.to_owned()))
}

impl From<&Document> for Value {
    /// A summary of the document for listings: everything but the body.
    fn from(doc: &Document) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("url".to_owned(), Value::String(doc.url().to_owned()));
        m.insert("id".to_owned(), Value::String(doc.id()));
        m.insert("title".to_owned(), optional(doc.title()));
        m.insert("path".to_owned(), Value::String(crate::util::slashed(doc.path())));
        m.insert("type".to_owned(), Value::String(doc.kind().to_string()));
        m.insert(
            "date".to_owned(),
            doc.date()
                .map_or(Value::Nil, |d| Value::String(d.to_rfc3339())),
        );
        m.insert("categories".to_owned(), strings(doc.categories()));
        m.insert("tags".to_owned(), strings(doc.tags()));
        Value::Object(m)
    }
}

fn summaries(docs: &[Rc<Document>]) -> Value {
    Value::Array(docs.iter().map(|d| Value::from(&**d)).collect())
}

impl From<&Taxonomy> for Value {
    /// Each name maps to the summaries of its posts.
    fn from(taxonomy: &Taxonomy) -> Value {
        Value::Object(
            taxonomy
                .iter()
                .map(|(name, posts)| (name.to_owned(), summaries(posts)))
                .collect(),
        )
    }
}

/// The full view of a document for rendering it: the summary fields plus
/// `destination`, `layout`, `permalink`, `collection`, `content`, `excerpt`,
/// and the complete `data` mapping.
pub fn document(doc: &Document, converter: &dyn Converter) -> Value {
    let mut value = Value::from(doc);
    if let Value::Object(m) = &mut value {
        m.insert("destination".to_owned(), Value::String(doc.destination()));
        m.insert("layout".to_owned(), optional(doc.layout()));
        m.insert("permalink".to_owned(), Value::String(doc.permalink().to_owned()));
        m.insert("collection".to_owned(), optional(doc.collection()));
        m.insert(
            "content".to_owned(),
            Value::String(doc.content(converter).to_owned()),
        );
        m.insert("excerpt".to_owned(), optional(doc.excerpt(converter)));
        m.insert(
            "data".to_owned(),
            yaml(&serde_yaml::Value::Mapping(doc.data().clone())),
        );
    }
    value
}

/// The site-wide view: `time`, `pages`, `posts`, `drafts`, `categories`,
/// `tags`, `data` (each file's mapping by stem), and every collection's
/// documents by label.
pub fn site(site: &Site) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("time".to_owned(), Value::String(site.time().to_rfc3339()));
    m.insert("pages".to_owned(), summaries(&site.pages()));
    m.insert("posts".to_owned(), summaries(&site.posts()));
    m.insert("drafts".to_owned(), summaries(&site.drafts()));
    m.insert("categories".to_owned(), Value::from(&site.categories()));
    m.insert("tags".to_owned(), Value::from(&site.tags()));
    m.insert(
        "data".to_owned(),
        Value::Object(
            site.data()
                .into_iter()
                .map(|(name, doc)| {
                    let data = yaml(&serde_yaml::Value::Mapping(doc.data().clone()));
                    (name, data)
                })
                .collect(),
        ),
    );
    m.insert(
        "collections".to_owned(),
        Value::Object(
            site.collections()
                .into_iter()
                .map(|(label, collection)| (label, summaries(&collection.docs)))
                .collect(),
        ),
    );
    Value::Object(m)
}
