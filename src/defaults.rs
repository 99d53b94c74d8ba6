//! Cascading defaults. [`resolve`] ranks the configured [`DefaultRule`]s that
//! match a document and folds them into one set of default values and
//! processing hints; [`apply_to_defaults`] layers front matter over them.

use crate::config::DefaultRule;
use crate::document::Kind;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// The defaults that apply to one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolved {
    /// Default front-matter values. Explicit front matter wins over these.
    pub values: Mapping,

    /// Processing hints such as `markdown: false`.
    pub process: Mapping,
}

/// Resolves the defaults for a document of `kind` whose path relative to the
/// site source is `path`.
///
/// Every rule whose scope matches contributes. Rules are applied from least
/// to most specific, so a longer scope path beats a shorter one and a rule
/// naming a type beats an otherwise equal rule that doesn't; between equally
/// specific rules the later one wins. No matching rule gives empty mappings.
pub fn resolve(rules: &[DefaultRule], kind: Kind, path: &Path) -> Resolved {
    let mut matching: Vec<(usize, bool, usize, &DefaultRule)> = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| matches(rule, kind, path))
        .map(|(i, rule)| {
            let depth = Path::new(rule.scope.path.trim_matches('/'))
                .components()
                .count();
            (depth, rule.scope.kind.is_some(), i, rule)
        })
        .collect();
    matching.sort_by_key(|&(depth, typed, i, _)| (depth, typed, i));

    let mut resolved = Resolved::default();
    for (_, _, _, rule) in matching {
        resolved.values = apply_to_defaults(&resolved.values, &rule.values);
        resolved.process = apply_to_defaults(&resolved.process, &rule.process);
    }
    resolved
}

fn matches(rule: &DefaultRule, kind: Kind, path: &Path) -> bool {
    if let Some(scope_kind) = &rule.scope.kind {
        if !kind.matches(scope_kind) {
            return false;
        }
    }
    let scope_path = rule.scope.path.trim_matches('/');
    scope_path.is_empty() || scope_path == "." || path.starts_with(scope_path)
}

/// Deep-merges `data` over `defaults`: nested mappings merge key by key,
/// anything else in `data` replaces the default outright (including `null`).
pub fn apply_to_defaults(defaults: &Mapping, data: &Mapping) -> Mapping {
    let mut merged = defaults.clone();
    for (key, value) in data {
        let replacement = match (merged.get(key), value) {
            (Some(Value::Mapping(base)), Value::Mapping(over)) => {
                Value::Mapping(apply_to_defaults(base, over))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), replacement);
    }
    merged
}
