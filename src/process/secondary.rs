//! Secondary-file suffix algebra
//!
//! A binding may declare companion files by suffix rule. A literal
//! rule is applied to the primary path: each leading `^` strips one
//! trailing extension (everything after the last `.`), stopping early
//! when no extension remains, and the rest is appended behind a `.`
//! unless the rule already starts with one. Rules of the form `$(...)`
//! are expressions and are resolved by the injected evaluator instead.

use once_cell::sync::Lazy;
use regex::Regex;

/// Expression-form suffix rules: `$( ... )`
static EXPRESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\(.*\)$").expect("expression pattern is valid"));

/// True when the rule must be resolved by the expression evaluator
pub fn is_expression(rule: &str) -> bool {
    EXPRESSION_RE.is_match(rule.trim())
}

/// Apply a literal suffix rule to a primary path
pub fn apply_suffix(primary_path: &str, rule: &str) -> String {
    let mut path = primary_path;
    let mut suffix = rule;
    while let Some(rest) = suffix.strip_prefix('^') {
        match path.rfind('.') {
            Some(dot) => {
                path = &path[..dot];
                suffix = rest;
            }
            None => break,
        }
    }
    if suffix.starts_with('.') {
        format!("{path}{suffix}")
    } else {
        format!("{path}.{suffix}")
    }
}

/// Filename component behind the last `/`, when the path has one
pub fn derived_name(path: &str) -> Option<String> {
    path.rfind('/').map(|slash| path[slash + 1..].to_string())
}
