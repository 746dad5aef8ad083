//! Cell type coercion
//!
//! Stateless conversions from loosely typed cells. Nothing here ever yields
//! NaN: unparseable input collapses to the caller's default.

use crate::c2array::{Cell, Row};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Literal escape token the exporter writes for line breaks
const NEWLINE_TOKEN: &str = "&newline&";

/// Convert to a number, falling back to `default` for absent, empty or non-numeric input
pub fn to_number(value: Option<&Cell>, default: f64) -> f64 {
    match value {
        None | Some(Cell::Null) => default,
        Some(Cell::Number(n)) if n.is_nan() => default,
        Some(Cell::Number(n)) => *n,
        Some(Cell::Bool(b)) => f64::from(u8::from(*b)),
        Some(Cell::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return default;
            }
            match s.parse::<f64>() {
                Ok(n) if !n.is_nan() => n,
                _ => default,
            }
        }
    }
}

/// Integer variant of [`to_number`]; fractional values are truncated
pub fn to_integer(value: Option<&Cell>, default: i64) -> i64 {
    let n = to_number(value, f64::NAN);
    if n.is_finite() {
        n.trunc() as i64
    } else {
        default
    }
}

/// Convert to a trimmed string
pub fn to_string(value: Option<&Cell>, default: &str) -> String {
    match value {
        None | Some(Cell::Null) => default.to_string(),
        Some(Cell::Text(s)) => s.trim().to_string(),
        Some(Cell::Number(n)) => format_number(*n),
        Some(Cell::Bool(b)) => b.to_string(),
    }
}

/// Convert to a boolean.
///
/// Numbers are true unless 0; strings are true for `true`, `yes` or `1`
/// (case-insensitive).
pub fn to_bool(value: Option<&Cell>) -> bool {
    match value {
        None | Some(Cell::Null) => false,
        Some(Cell::Bool(b)) => *b,
        Some(Cell::Number(n)) => *n != 0.0 && !n.is_nan(),
        Some(Cell::Text(s)) => {
            let lower = s.trim().to_lowercase();
            lower == "true" || lower == "yes" || lower == "1"
        }
    }
}

/// Split a text cell on `separator`, dropping empty pieces
pub fn to_array(value: Option<&Cell>, separator: char) -> Vec<String> {
    match value {
        None | Some(Cell::Null) => Vec::new(),
        Some(Cell::Text(s)) => s
            .split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) if other.is_blank() => Vec::new(),
        Some(other) => vec![to_string(Some(other), "")],
    }
}

/// Accept `value` when it is one of `allowed`, otherwise `default` or the first allowed value
pub fn to_enum<T: PartialEq + Clone>(value: T, allowed: &[T], default: Option<T>) -> Option<T> {
    if allowed.contains(&value) {
        return Some(value);
    }
    default.or_else(|| allowed.first().cloned())
}

/// Collect the non-zero numbers from `count` consecutive columns starting at `start`
pub fn extract_nonzero(row: &Row<'_>, start: usize, count: usize) -> Vec<f64> {
    (start..start + count)
        .map(|col| to_number(row.get(col), 0.0))
        .filter(|v| *v != 0.0)
        .collect()
}

/// Integer slots from consecutive columns, zeros kept
pub fn integer_slots<const N: usize>(row: &Row<'_>, start: usize) -> [i64; N] {
    std::array::from_fn(|i| to_integer(row.get(start + i), 0))
}

/// Description text in both its raw and markup-free forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedText {
    pub raw: String,
    pub plain: String,
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[/?[A-Za-z]+(?:=[^\]]*)?\]").unwrap())
}

fn bracket_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[^\]]*\]").unwrap())
}

/// Replace escape tokens and strip `[tag=value]...[/tag]` markup
pub fn parse_formatted_text(text: &str) -> FormattedText {
    let raw = text.replace(NEWLINE_TOKEN, "\n");
    let plain = tag_pattern().replace_all(&raw, "").into_owned();
    FormattedText { raw, plain }
}

/// Remove every bracketed tag (`[size=20]`, `[/color]`, ...) and trim
pub fn strip_markup(text: &str) -> String {
    bracket_pattern().replace_all(text, "").trim().to_string()
}

/// Render a number the way the exporter's runtime stringifies it
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_to_number_defaults() {
        assert_eq!(to_number(None, 7.0), 7.0);
        assert_eq!(to_number(Some(&Cell::Null), 7.0), 7.0);
        assert_eq!(to_number(Some(&text("abc")), 7.0), 7.0);
        assert_eq!(to_number(Some(&text("")), 7.0), 7.0);
        assert_eq!(to_number(Some(&text("NaN")), 7.0), 7.0);
        assert_eq!(to_number(Some(&Cell::Number(f64::NAN)), 7.0), 7.0);
        assert_eq!(to_number(Some(&text(" 12.5 ")), 0.0), 12.5);
        assert_eq!(to_number(Some(&Cell::Number(0.0)), 7.0), 0.0);
        assert_eq!(to_number(Some(&Cell::Bool(true)), 0.0), 1.0);
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(to_integer(Some(&Cell::Number(3.9)), 0), 3);
        assert_eq!(to_integer(Some(&text("42")), 0), 42);
        assert_eq!(to_integer(Some(&text("x")), -1), -1);
        assert_eq!(to_integer(None, 5), 5);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(Some(&text("  曹操 ")), ""), "曹操");
        assert_eq!(to_string(Some(&Cell::Number(12.0)), ""), "12");
        assert_eq!(to_string(Some(&Cell::Number(0.25)), ""), "0.25");
        assert_eq!(to_string(None, "none"), "none");
    }

    #[test]
    fn test_to_bool() {
        assert!(!to_bool(Some(&Cell::Number(0.0))));
        assert!(to_bool(Some(&Cell::Number(1.0))));
        assert!(to_bool(Some(&Cell::Number(-3.0))));
        assert!(to_bool(Some(&text("YES"))));
        assert!(to_bool(Some(&text("True"))));
        assert!(to_bool(Some(&text("1"))));
        assert!(!to_bool(Some(&text("no"))));
        assert!(!to_bool(None));
    }

    #[test]
    fn test_to_array() {
        assert_eq!(to_array(Some(&text("a, b,,c")), ','), vec!["a", "b", "c"]);
        assert!(to_array(Some(&text("")), ',').is_empty());
        assert!(to_array(None, ',').is_empty());
        assert_eq!(to_array(Some(&Cell::Number(5.0)), ','), vec!["5"]);
        assert!(to_array(Some(&Cell::Number(0.0)), ',').is_empty());
    }

    #[test]
    fn test_to_enum() {
        let allowed = ["男", "女"];
        assert_eq!(to_enum("女", &allowed, None), Some("女"));
        assert_eq!(to_enum("?", &allowed, Some("女")), Some("女"));
        assert_eq!(to_enum("?", &allowed, None), Some("男"));
        assert_eq!(to_enum(3, &[], None), None);
    }

    #[test]
    fn test_parse_formatted_text() {
        let parsed =
            parse_formatted_text("攻击[color=#ff0000]+10%[/color]&newline&持续[b]3[/b]回合");
        assert_eq!(
            parsed.raw,
            "攻击[color=#ff0000]+10%[/color]\n持续[b]3[/b]回合"
        );
        assert_eq!(parsed.plain, "攻击+10%\n持续3回合");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("[size=20]Warrior[/size] "), "Warrior");
        assert_eq!(strip_markup("plain"), "plain");
    }
}
