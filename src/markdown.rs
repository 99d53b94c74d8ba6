use pulldown_cmark::{html, Options, Parser};

/// Converts document source text into HTML for [`crate::document::Document::content`].
pub trait Converter {
    fn markdown(&self, input: &str) -> String;
}

/// The default [`Converter`], backed by `pulldown_cmark` with footnotes,
/// smart punctuation, strikethrough, tables, and task lists enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct Markdown;

impl Converter for Markdown {
    fn markdown(&self, input: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut out = String::with_capacity(input.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(input, options));
        out
    }
}
