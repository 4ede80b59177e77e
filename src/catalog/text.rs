//! Text Utilities for Rewrites
//!
//! Byte-offset and line bookkeeping shared by every rule. Rewrites work on raw
//! source text, so everything here is plain string manipulation.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::constants::rewrite::MAX_DIFF_CELLS;
use crate::types::RewriteError;

/// Output of a successful rule rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub code: String,
    /// 1-based lines of `code` touched by the rewrite, ascending and unique
    pub lines: Vec<usize>,
}

impl Rewrite {
    /// Build a rewrite, dropping line numbers outside the new text
    pub fn new(code: String, mut lines: Vec<usize>) -> Self {
        let max = line_count(&code);
        lines.retain(|line| (1..=max).contains(line));
        lines.sort_unstable();
        lines.dedup();
        Self { code, lines }
    }
}

/// Resolve a lazily compiled pattern, reporting a compile failure by name
pub fn pattern(
    re: &'static LazyLock<Option<Regex>>,
    name: &'static str,
) -> Result<&'static Regex, RewriteError> {
    re.as_ref().ok_or(RewriteError::PatternUnavailable(name))
}

/// Number of lines in `text` (a trailing newline does not start a new line)
pub fn line_count(text: &str) -> usize {
    text.lines().count()
}

/// 1-based line containing byte `offset`
pub fn line_at(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

/// Lines covered by a byte range
pub fn lines_in(text: &str, span: Range<usize>) -> Range<usize> {
    let first = line_at(text, span.start);
    let last = if span.end > span.start {
        line_at(text, span.end - 1)
    } else {
        first
    };
    first..last + 1
}

/// Lines that differ between two texts, compared position by position
pub fn changed_lines(before: &str, after: &str) -> Vec<usize> {
    let old: Vec<&str> = before.lines().collect();
    after
        .lines()
        .enumerate()
        .filter(|(idx, line)| old.get(*idx) != Some(line))
        .map(|(idx, _)| idx + 1)
        .collect()
}

/// Carry 1-based line numbers of `before` over to `after`.
///
/// Lines are matched by a longest-common-subsequence diff over the region
/// between the shared prefix and suffix. Lines that were edited, removed, or
/// sit in a region too large to diff have no position in `after` and are
/// dropped.
pub fn remap_lines<I>(before: &str, after: &str, lines: I) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mapping = line_mapping(before, after);
    lines
        .into_iter()
        .filter_map(|line| {
            line.checked_sub(1)
                .and_then(|idx| mapping.get(idx).copied().flatten())
        })
        .collect()
}

/// For every line of `before` (0-based), its 1-based position in `after`
fn line_mapping(before: &str, after: &str) -> Vec<Option<usize>> {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    let mut mapping = vec![None; old.len()];

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    for (idx, slot) in mapping.iter_mut().enumerate().take(prefix) {
        *slot = Some(idx + 1);
    }
    for k in 0..suffix {
        mapping[old.len() - 1 - k] = Some(new.len() - k);
    }

    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];
    if a.is_empty() || b.is_empty() || a.len().saturating_mul(b.len()) > MAX_DIFF_CELLS {
        return mapping;
    }

    // table[i * width + j] = LCS length of a[i..] and b[j..]
    let width = b.len() + 1;
    let mut table = vec![0u32; (a.len() + 1) * width];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            mapping[prefix + i] = Some(prefix + j + 1);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    mapping
}

/// Whitespace between the start of the line holding `offset` and its first
/// non-blank character
pub fn leading_indent(text: &str, offset: usize) -> &str {
    let line_start = text[..offset.min(text.len())]
        .rfind('\n')
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Find the `}` matching the `{` at `open`, skipping string literals
pub fn find_block_end(text: &str, open: usize) -> Result<usize, RewriteError> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return Err(RewriteError::UnbalancedBraces(open));
    }

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut idx = open;
    while idx < bytes.len() {
        let b = bytes[idx];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    idx += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(idx);
                    }
                }
                _ => {}
            },
        }
        idx += 1;
    }

    Err(RewriteError::UnbalancedBraces(open))
}

/// Strip the common indentation of `body` and re-indent it with `indent`.
/// Leading and trailing blank lines are dropped.
pub fn reindent(body: &str, indent: &str) -> Vec<String> {
    let lines: Vec<&str> = body.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    let lines = &lines[first..=last];

    // A single-line body like `{ total += x; }` keeps its own leading spaces
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else if l.len() - l.trim_start().len() >= common {
                format!("{}{}", indent, &l[common..])
            } else {
                format!("{}{}", indent, l.trim_start())
            }
        })
        .collect()
}

/// `snake_case_name` → `snakeCaseName`
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (idx, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
        if idx == 0 {
            out.push_str(&part.to_lowercase());
        } else {
            let mut chars = part.chars();
            if let Some(head) = chars.next() {
                out.extend(head.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out
}

fn word_pattern(word: &str) -> Result<Regex, RewriteError> {
    Regex::new(&format!(r"\b{}\b", regex::escape(word)))
        .map_err(|e| RewriteError::InvalidPattern(e.to_string()))
}

/// Whether `word` occurs as a whole word
pub fn contains_word(text: &str, word: &str) -> Result<bool, RewriteError> {
    Ok(word_pattern(word)?.is_match(text))
}

/// Replace every whole-word occurrence of `from` with `to`
pub fn rename_identifier(text: &str, from: &str, to: &str) -> Result<String, RewriteError> {
    Ok(word_pattern(from)?
        .replace_all(text, NoExpand(to))
        .into_owned())
}

/// Incremental splice of replacements into a source text.
///
/// Replacements must be pushed in ascending, non-overlapping order. Touched
/// lines are computed against the output, so they stay valid however much
/// each replacement grows or shrinks the text.
pub struct Splicer<'a> {
    source: &'a str,
    out: String,
    cursor: usize,
    spans: Vec<Range<usize>>,
}

impl<'a> Splicer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            out: String::with_capacity(source.len()),
            cursor: 0,
            spans: Vec::new(),
        }
    }

    /// Current end of the consumed input
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace `range` of the source. Ranges before the cursor are ignored.
    pub fn replace(&mut self, range: Range<usize>, replacement: &str) -> bool {
        if range.start < self.cursor || range.end < range.start {
            return false;
        }
        self.out.push_str(&self.source[self.cursor..range.start]);
        let start = self.out.len();
        self.out.push_str(replacement);
        self.spans.push(start..self.out.len());
        self.cursor = range.end;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn finish(mut self) -> Rewrite {
        self.out.push_str(&self.source[self.cursor..]);
        let lines = self
            .spans
            .iter()
            .flat_map(|span| lines_in(&self.out, span.clone()))
            .collect();
        Rewrite::new(self.out, lines)
    }
}
