//! `{{name}}` placeholder substitution for server configs and CI job configs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ToolbeltError;

/// Named values substituted into a template.
pub type TemplateContext = BTreeMap<String, String>;

#[allow(clippy::expect_used)] // static pattern
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex"));

/// Build a context from literal pairs.
pub fn context<I, K, V>(pairs: I) -> TemplateContext
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Literal substitution: every `{{key}}` (whitespace inside the braces
/// allowed) whose key is in `ctx` is replaced; everything else is left as is.
#[must_use]
pub fn substitute(text: &str, ctx: &TemplateContext) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            ctx.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Strict rendering: substitute, then refuse output with leftover placeholders.
///
/// # Errors
///
/// Returns [`ToolbeltError::InvalidInput`] listing the unresolved names.
pub fn render(name: &str, text: &str, ctx: &TemplateContext) -> Result<String, ToolbeltError> {
    let missing: Vec<&str> = PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|key| !ctx.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ToolbeltError::InvalidInput(format!(
            "template {name} has unresolved placeholders: {}",
            missing.join(", ")
        )));
    }
    Ok(substitute(text, ctx))
}
