use crate::catalog::definition::{DisplayOptions, literal_text};
use itertools::Itertools;
use serde_json::Value;

/// Keys the compiler resolves itself; they never show up in a rendered condition.
const SCOPE_KEYS: [&str; 2] = ["resource", "operation"];

/// Whether a property gated by `options` exists for the given resource and operation.
///
/// Only the `resource` and `operation` keys are evaluated here. Gating on any other
/// sibling is kept as a rendered condition for the model.
pub fn is_visible(options: &DisplayOptions, resource: &str, operation: &str) -> bool {
    let scope = [("resource", resource), ("operation", operation)];
    if let Some(show) = &options.show {
        for (key, current) in scope {
            if let Some(allowed) = show.get(key) {
                if !contains_literal(allowed, current) {
                    return false;
                }
            }
        }
    }
    if let Some(hide) = &options.hide {
        for (key, current) in scope {
            if let Some(hidden) = hide.get(key) {
                if contains_literal(hidden, current) {
                    return false;
                }
            }
        }
    }
    true
}

/// Renders the sibling gating of a property, e.g.
/// `authentication in ["oAuth2"] and mode not in ["raw"]`.
///
/// Returns `None` when nothing beyond resource/operation (or `@`-prefixed internals)
/// gates the property.
pub fn condition_text(options: &DisplayOptions) -> Option<String> {
    let shown = options
        .show
        .iter()
        .flatten()
        .filter(|(key, _)| renders(key))
        .map(|(key, values)| format!("{} in {}", key, Value::Array(values.clone())));
    let hidden = options
        .hide
        .iter()
        .flatten()
        .filter(|(key, _)| renders(key))
        .map(|(key, values)| format!("{} not in {}", key, Value::Array(values.clone())));

    let condition = shown.chain(hidden).join(" and ");
    (!condition.is_empty()).then_some(condition)
}

fn renders(key: &str) -> bool {
    !SCOPE_KEYS.contains(&key) && !key.starts_with('@')
}

fn contains_literal(values: &[Value], current: &str) -> bool {
    values.iter().any(|value| literal_text(value) == current)
}
