use std::{io, path::Path};

use crate::{page::PlaceholderMap, utils};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Substitutes every `{{NAME}}` token whose name is in `placeholders`.
///
/// The template is scanned once from left to right. Tokens with unknown
/// names and stray braces are copied unchanged, and substituted values are
/// never scanned again, so upstream text that looks like a token stays
/// literal.
pub fn render(template: &str, placeholders: &PlaceholderMap) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let replacement = after_open
            .find(CLOSE)
            .and_then(|end| placeholders.get(&after_open[..end]).map(|v| (end, v)));

        match replacement {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Step over one brace so "{{{NAME}}" still finds "{{NAME}}".
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Writes the rendered page atomically.
pub async fn write_page(path: &Path, html: &str) -> io::Result<()> {
    utils::write_atomic(path, html.as_bytes()).await
}
