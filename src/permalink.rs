//! Builds concrete URLs from permalink patterns such as
//! `/:year/:month/:title/` and derives output destinations and ids from them.

use crate::document::Kind;
use std::collections::BTreeMap;

/// Maps token placeholders (including the leading `:`, e.g. `:year`) to
/// their values.
pub type Tokens = BTreeMap<String, String>;

/// Options for [`build_url`].
#[derive(Clone, Copy, Debug)]
pub struct UrlOptions<'a> {
    /// The permalink pattern.
    pub pattern: &'a str,

    /// Cache-busting revision substituted for `:revision`. Without one, the
    /// placeholder is dropped together with a `-` or `.` right before it.
    pub revision: Option<&'a str>,

    /// The type of document the URL is for.
    pub kind: Kind,
}

const REVISION: &str = ":revision";

/// Expands every token in `opts.pattern`. Each token is replaced literally,
/// all occurrences at once, longest token first so that no token can clip a
/// longer one. Placeholders with no matching token stay as they are; a
/// pattern without placeholders is a static URL. Runs of `/` left behind by
/// empty tokens collapse into one.
pub fn build_url(tokens: &Tokens, opts: UrlOptions) -> String {
    let mut url = opts.pattern.to_owned();

    url = match opts.revision {
        Some(revision) => url.replace(REVISION, revision),
        None => url
            .replace(&format!("-{}", REVISION), "")
            .replace(&format!(".{}", REVISION), "")
            .replace(REVISION, ""),
    };

    let mut ordered: Vec<(&String, &String)> = tokens.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
    for (token, value) in ordered {
        if url.contains(token.as_str()) {
            url = url.replace(token.as_str(), value);
        }
    }

    if url.is_empty() {
        log::debug!("empty permalink for {} document", opts.kind);
    }
    collapse_slashes(&url)
}

fn collapse_slashes(url: &str) -> String {
    let (scheme, rest) = match url.find("://") {
        Some(i) => url.split_at(i + 3),
        None => ("", url),
    };

    let mut out = String::with_capacity(url.len());
    out.push_str(scheme);
    let mut previous = '\0';
    for c in rest.chars() {
        if c == '/' && previous == '/' {
            continue;
        }
        out.push(c);
        previous = c;
    }
    out
}

/// The output file path for `url`, relative to the output root. A URL ending
/// in `/` gets `index.html`; the `baseurl` prefix, leading slashes, and any
/// query string or fragment are removed.
pub fn destination(url: &str, baseurl: &str) -> String {
    let mut destination = url.to_owned();

    if url != "index.html" && destination.ends_with('/') {
        destination.push_str("index.html");
    }

    if !baseurl.is_empty() {
        if let Some(stripped) = destination.strip_prefix(baseurl) {
            destination = stripped.to_owned();
        }
    }

    let trimmed = destination.trim_start_matches('/');
    match trimmed.find(|c: char| c == '?' || c == '#') {
        Some(i) => trimmed[..i].to_owned(),
        None => trimmed.to_owned(),
    }
}

/// The document id: `url` without a single trailing slash.
pub fn id(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> Tokens {
        pairs
            .iter()
            .map(|(k, v)| (format!(":{}", k), v.to_string()))
            .collect()
    }

    fn url(pattern: &str, tokens: &Tokens) -> String {
        build_url(
            tokens,
            UrlOptions {
                pattern,
                revision: None,
                kind: Kind::Post,
            },
        )
    }

    #[test]
    fn test_substitutes_tokens() {
        let tokens = tokens(&[("year", "2023"), ("month", "04"), ("title", "hello-world")]);
        let url = url("/:year/:month/:title/", &tokens);
        assert_eq!("/2023/04/hello-world/", url);
        assert_eq!("2023/04/hello-world/index.html", destination(&url, "/blog"));
        assert_eq!("/2023/04/hello-world", id(&url));
    }

    #[test]
    fn test_baseurl_is_stripped_from_destination() {
        let tokens = tokens(&[
            ("baseurl", "/blog"),
            ("year", "2023"),
            ("month", "04"),
            ("title", "hello-world"),
        ]);
        let url = url("/:baseurl/:year/:month/:title/", &tokens);
        assert_eq!("/blog/2023/04/hello-world/", url);
        assert_eq!("2023/04/hello-world/index.html", destination(&url, "/blog"));
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let tokens = tokens(&[("title", "a")]);
        assert_eq!("/a/a.html", url("/:title/:title.html", &tokens));
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let tokens = tokens(&[("title", "a")]);
        assert_eq!("/:nope/a/", url("/:nope/:title/", &tokens));
        assert_eq!("/static/", url("/static/", &tokens));
    }

    #[test]
    fn test_longer_tokens_are_not_clipped() {
        let tokens = tokens(&[("day", "05"), ("i_day", "5"), ("month", "04"), ("i_month", "4")]);
        assert_eq!("/4/04/5/05", url("/:i_month/:month/:i_day/:day", &tokens));
    }

    #[test]
    fn test_empty_tokens_collapse_slashes() {
        let tokens = tokens(&[("categories", ""), ("title", "a")]);
        assert_eq!("/a/", url("/:categories/:title/", &tokens));
        assert_eq!(
            "https://example.org/a/",
            url("https://example.org/:categories/:title/", &tokens)
        );
    }

    #[test]
    fn test_revision() {
        let tokens = tokens(&[("basename", "app")]);
        let with = build_url(
            &tokens,
            UrlOptions {
                pattern: "/:basename-:revision.js",
                revision: Some("abc123"),
                kind: Kind::Script,
            },
        );
        assert_eq!("/app-abc123.js", with);
        assert_eq!("/app.js", url("/:basename-:revision.js", &tokens));
    }

    #[test]
    fn test_destination_edge_cases() {
        assert_eq!("index.html", destination("index.html", ""));
        assert_eq!("index.html", destination("/", ""));
        assert_eq!("about.html", destination("//about.html?v=2", ""));
        assert_eq!("docs/", destination("/docs/#intro", ""));
        assert_eq!("/about", id("/about/"));
        assert_eq!("/about.html", id("/about.html"));
    }
}
