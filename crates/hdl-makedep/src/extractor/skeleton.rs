//! Text skeleton used for instantiation matching.
//!
//! The skeleton keeps statement structure and throws away everything that
//! could hide or fake an instantiation: string literals, comments, parameter
//! values, port connections and array dimensions. What remains of
//! `fifo #(.W(8)) u_fifo (.clk(clk), .d(d[3:0]));` is `fifo #() u_fifo ();`.
//!
//! Nested block comments are not understood; `/* a /* b */ c */` leaves
//! `c */` behind.

use regex::Regex;
use std::sync::LazyLock;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"".*?""#).unwrap());
static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//.*").unwrap());
static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static PARAM_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\s*\(").unwrap());

/// Remove string literals, then line comments, then block comments.
pub fn strip_comments_and_strings(text: &str) -> String {
    let text = QUOTED.replace_all(text, "");
    let text = LINE_COMMENT.replace_all(&text, "");
    BLOCK_COMMENT.replace_all(&text, "").into_owned()
}

/// Force a space before every parameter block opener: `fifo#(` → `fifo #(`.
pub fn normalize_param_open(text: &str) -> String {
    PARAM_OPEN.replace_all(text, " #(").into_owned()
}

/// Collapse the contents of top-level groups.
///
/// A top-level `( ... )` becomes `()`; a top-level `[ ... ]` disappears
/// entirely. Text between groups is kept as is. Unbalanced closers outside
/// any group are ignored.
pub fn collapse_groups(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut parens = 0usize;
    let mut brackets = 0usize;
    let mut last_close = 0usize;

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => {
                if parens == 0 && brackets == 0 {
                    result.push_str(&text[last_close..=i]);
                }
                parens += 1;
            }
            b'[' => {
                if parens == 0 && brackets == 0 {
                    result.push_str(&text[last_close..i]);
                }
                brackets += 1;
            }
            b')' if parens > 0 => {
                last_close = i;
                parens -= 1;
            }
            b']' if brackets > 0 => {
                last_close = i + 1;
                brackets -= 1;
            }
            _ => {}
        }
    }
    result.push_str(&text[last_close..]);
    result
}

/// Full skeleton pipeline.
pub fn skeleton(text: &str) -> String {
    let stripped = strip_comments_and_strings(text);
    let normalized = normalize_param_open(&stripped);
    collapse_groups(&normalized)
}
