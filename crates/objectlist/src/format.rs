//! Value formatting for cells and group headers.
//!
//! Templates use positional placeholders: `{0}` is the first argument, `{1}`
//! the second, and so on. `{{` and `}}` produce literal braces. A placeholder
//! whose index has no argument is copied through unchanged.

use std::fmt::{Display, Write};

use crate::value::AspectValue;

/// Render `template`, substituting positional placeholders.
pub fn format_template(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let rest = &template[start + 1..];
                let Some(close) = rest.find('}') else {
                    out.push_str(&template[start..]);
                    break;
                };
                let index = &rest[..close];
                match index.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) => {
                        let _ = write!(out, "{arg}");
                    }
                    None => out.push_str(&template[start..start + close + 2]),
                }
                while chars.peek().is_some_and(|&(i, _)| i <= start + close + 1) {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Convert an aspect value to display text.
///
/// Null is always the empty string. Otherwise the converter wins, then the
/// template (with the value as `{0}`), then the value's own display form.
pub fn value_to_string(
    value: &AspectValue,
    converter: Option<&(dyn Fn(&AspectValue) -> String + Send + Sync)>,
    template: Option<&str>,
) -> String {
    if value.is_null() {
        return String::new();
    }
    if let Some(convert) = converter {
        return convert(value);
    }
    if let Some(template) = template {
        return format_template(template, &[value]);
    }
    value.to_string()
}
