//! Descriptor re-indentation.
//!
//! The YAML emitter writes 2-space mappings with sequence dashes aligned to
//! their parent key. [`reindent`] rewrites that layout to a configured
//! mapping indent and dash offset, leaving block scalar bodies intact
//! relative to their key.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static BLOCK_SCALAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|:\s)[|>][1-9]?[+-]?[1-9]?$").unwrap());

/// A block scalar being copied through.
struct BlockScalar {
    /// Indent of the line that opened the scalar.
    opener: usize,
    /// Original column of the opener's content.
    content_orig: usize,
    /// New column of the opener's content.
    content_new: usize,
}

/// Re-indents emitter output.
///
/// Nested mappings are indented by `indent`. Sequence dashes sit `offset`
/// columns right of their parent and item content `indent` columns right of
/// the dash. `indent` must be at least 2.
#[must_use]
pub fn reindent(text: &str, indent: usize, offset: usize) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    // (original column, new column) of each open block level
    let mut levels: Vec<(usize, usize)> = vec![(0, 0)];
    let mut last_content_new = 0;
    let mut block: Option<BlockScalar> = None;

    for line in text.lines() {
        let trimmed = line.trim_start_matches(' ');
        let orig = line.len() - trimmed.len();

        if let Some(scalar) = &block {
            if trimmed.is_empty() || orig > scalar.opener {
                if !trimmed.is_empty() {
                    push_spaces(&mut out, orig - scalar.content_orig.min(orig) + scalar.content_new);
                    out.push_str(trimmed);
                }
                out.push('\n');
                continue;
            }
            block = None;
        }

        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }

        while levels.len() > 1 && levels.last().is_some_and(|&(level, _)| level > orig) {
            levels.pop();
        }

        let base_new = match levels.last() {
            Some(&(level, new)) if level == orig => new,
            _ => {
                let new = last_content_new + indent;
                levels.push((orig, new));
                new
            }
        };

        let mut rest = trimmed;
        let mut col_orig = orig;
        let mut col_new = base_new;
        let mut dashes = 0;
        while let Some(after) = rest.strip_prefix("- ") {
            let dash_new = col_new + offset;
            push_spaces(&mut out, if dashes == 0 { dash_new } else { offset });
            out.push('-');
            push_spaces(&mut out, indent - 1);

            col_orig += 2;
            col_new = dash_new + indent;
            levels.push((col_orig, col_new));
            rest = after;
            dashes += 1;
        }

        if dashes == 0 {
            push_spaces(&mut out, col_new);
        }
        out.push_str(rest);
        out.push('\n');
        last_content_new = col_new;

        if BLOCK_SCALAR_RE.is_match(rest) {
            block = Some(BlockScalar {
                opener: orig,
                content_orig: col_orig,
                content_new: col_new,
            });
        }
    }

    out
}

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n(' ', count));
}
