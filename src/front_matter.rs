//! # Front-Matter Generation
//!
//! Pure helpers for the metadata header injected into mirrored documents:
//! detecting an existing header, deriving a title from a filename, and
//! rendering a new header block from a source's default fields.
//!
//! The header is a YAML front-matter block: a `---` marker line, one
//! `key: value` line per field with the value serialized in flow style,
//! and a closing `---` followed by a single blank line before the body.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Marker line delimiting a front-matter block.
pub const MARKER: &str = "---";

const BOM: char = '\u{feff}';

/// Whether the content already starts with a front-matter block.
///
/// A leading UTF-8 BOM is ignored; leading whitespace is not. A file
/// whose marker sits after blank lines is treated as unannotated.
pub fn has_front_matter(content: &str) -> bool {
    content.trim_start_matches(BOM).starts_with(MARKER)
}

/// Derive a human-readable title from a file name.
///
/// The extension is dropped, underscores and hyphens become spaces, and
/// each alphabetic run is capitalized: `my_cool-Doc.md` -> `My Cool Doc`.
pub fn title_from_filename(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    let spaced = stem.replace(['_', '-'], " ");

    let mut title = String::with_capacity(spaced.len());
    let mut in_word = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

/// Render the header block for a file without front matter.
///
/// Default fields come first in mapping order; a generated `title` is
/// appended only when the defaults do not already carry one. The returned
/// block ends with the closing marker and the blank separator line, ready
/// to be prepended to the document body.
pub fn render_block(defaults: &Mapping, file_name: &str) -> Result<String> {
    let mut lines = vec![MARKER.to_string()];
    for (key, value) in defaults {
        lines.push(format!("{}: {}", flow_value(key)?, flow_value(value)?));
    }
    if !defaults.contains_key(&Value::from("title")) {
        lines.push(format!("title: {}", title_from_filename(file_name)));
    }
    lines.push(MARKER.to_string());
    Ok(lines.join("\n") + "\n\n")
}

/// Normalize document content: inject a header when none exists, pass
/// annotated content through unchanged.
pub fn apply(content: &str, defaults: &Mapping, file_name: &str) -> Result<String> {
    if has_front_matter(content) {
        return Ok(content.to_string());
    }
    let block = render_block(defaults, file_name)?;
    // Drop a leading BOM so the marker lands at byte 0 of the result.
    Ok(block + content.trim_start_matches(BOM))
}

/// Serialize a YAML value in flow style: `[a, b]`, `{k: v}`, plain scalars.
fn flow_value(value: &Value) -> Result<String> {
    match value {
        Value::Sequence(items) => {
            let rendered: Vec<String> = items.iter().map(flow_value).collect::<Result<_>>()?;
            Ok(format!("[{}]", rendered.join(", ")))
        }
        Value::Mapping(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (k, v) in map {
                pairs.push(format!("{}: {}", flow_value(k)?, flow_value(v)?));
            }
            Ok(format!("{{{}}}", pairs.join(", ")))
        }
        scalar => {
            let rendered = serde_yaml::to_string(scalar).map_err(Error::Yaml)?;
            Ok(rendered.trim_end().to_string())
        }
    }
}
