//! Directive recognition in Markdown sources.
//!
//! A directive is an XML-ish `<schemadoc>` tag, either self-closing or
//! paired; any body text is discarded and the whole tag is replaced by
//! rendered documentation. Options are attributes on the opening tag.

use regex::{Captures, Regex};
use schemadoc_core::{DirectiveOptions, OptionsError};
use std::sync::OnceLock;

fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(r"<schemadoc(?P<options>\s[^>]*?)?(?:/>|>(?s:.*?)</schemadoc>)")
            .expect("Invalid regex pattern")
    })
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"(\w+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid regex pattern")
    })
}

/// Whether the content carries at least one directive.
pub fn contains_directive(content: &str) -> bool {
    directive_regex().is_match(content)
}

/// Parse directive attribute text into sparse options.
///
/// Attributes use `key="value"` or `key='value'` form; unknown keys are
/// an error.
pub fn parse_options(attribute_text: &str) -> Result<DirectiveOptions, OptionsError> {
    let mut options = DirectiveOptions::default();
    for captures in attribute_regex().captures_iter(attribute_text) {
        let key = &captures[1];
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| m.as_str())
            .unwrap_or("");
        options.set(key, value)?;
    }
    Ok(options)
}

/// Replace every directive in `content` via the supplied renderer.
///
/// The renderer receives the raw attribute text of each directive and
/// produces its replacement. Non-directive text passes through
/// untouched; a directive-free document is returned unchanged.
pub fn replace_directives(
    content: &str,
    mut render: impl FnMut(&str) -> String,
) -> (String, usize) {
    let mut count = 0usize;
    let replaced = directive_regex().replace_all(content, |captures: &Captures<'_>| {
        count += 1;
        let attribute_text = captures
            .name("options")
            .map(|m| m.as_str())
            .unwrap_or("");
        render(attribute_text)
    });
    (replaced.into_owned(), count)
}
