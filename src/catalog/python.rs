//! Python Rules

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::text::{Rewrite, Splicer, line_at, pattern};
use crate::analyzer::Language;
use crate::types::RewriteError;

pub const COMPREHENSION_ID: &str = "py-list-comprehension";
pub const LITERAL_EVAL_ID: &str = "py-literal-eval";

// `acc = []` / `for var in iter:` / optional `if cond:` / `acc.append(expr)`
// Groups: 1 indent, 2 accumulator, 3 loop var, 4 iterable, 5 condition,
// 6 append target, 7 appended expression.
static RE_APPEND_LOOP: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)(\w+)[ \t]*=[ \t]*\[\][ \t]*\n[ \t]*for[ \t]+(\w+)[ \t]+in[ \t]+([^\n]+?):[ \t]*\n(?:[ \t]*if[ \t]+([^\n]+?):[ \t]*\n)?[ \t]*(\w+)\.append\(([^\n]+)\)[ \t]*$",
    )
    .ok()
});

// Method calls (`obj.eval(`) are filtered out in `eval_calls`
static RE_EVAL_CALL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\beval\(").ok());

static RE_IMPORT_AST: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import[ \t]+ast[ \t]*$").ok());

/// The loop appends to its own accumulator and the append closes the loop body
fn is_convertible(source: &str, caps: &Captures<'_>) -> bool {
    let Some(whole) = caps.get(0) else {
        return false;
    };
    caps.get(2).map(|m| m.as_str()) == caps.get(6).map(|m| m.as_str())
        && body_ends_at(source, whole.end(), caps.get(1).map_or(0, |m| m.as_str().len()))
}

/// Whether the first non-blank line after `offset` is dedented to `indent`
/// or less (or there is none)
fn body_ends_at(source: &str, offset: usize, indent: usize) -> bool {
    source[offset..]
        .lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .is_none_or(|line| line.len() - line.trim_start_matches([' ', '\t']).len() <= indent)
}

pub(crate) fn detect_comprehension(source: &str, _language: Language) -> bool {
    pattern(&RE_APPEND_LOOP, "append-loop")
        .is_ok_and(|re| re.captures_iter(source).any(|caps| is_convertible(source, &caps)))
}

pub(crate) fn rewrite_comprehension(
    source: &str,
    _language: Language,
) -> Result<Rewrite, RewriteError> {
    let re = pattern(&RE_APPEND_LOOP, "append-loop")?;
    let mut splicer = Splicer::new(source);

    for caps in re.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        if !is_convertible(source, &caps) {
            continue;
        }

        let condition = caps
            .get(5)
            .map(|c| format!(" if {}", c.as_str().trim()))
            .unwrap_or_default();
        let replacement = format!(
            "{}{} = [{} for {} in {}{}]",
            &caps[1],
            &caps[2],
            caps[7].trim(),
            &caps[3],
            caps[4].trim(),
            condition
        );
        splicer.replace(whole.range(), &replacement);
    }

    if splicer.is_empty() {
        return Err(RewriteError::NoMatch(COMPREHENSION_ID));
    }
    Ok(splicer.finish())
}

/// Byte ranges of bare `eval(` calls
fn eval_calls(re: &Regex, source: &str) -> Vec<std::ops::Range<usize>> {
    re.find_iter(source)
        .filter(|m| !source[..m.start()].ends_with('.'))
        .map(|m| m.range())
        .collect()
}

pub(crate) fn detect_eval(source: &str, _language: Language) -> bool {
    pattern(&RE_EVAL_CALL, "eval-call").is_ok_and(|re| !eval_calls(re, source).is_empty())
}

pub(crate) fn rewrite_eval(source: &str, _language: Language) -> Result<Rewrite, RewriteError> {
    let re = pattern(&RE_EVAL_CALL, "eval-call")?;
    let import_re = pattern(&RE_IMPORT_AST, "import-ast")?;

    let mut splicer = Splicer::new(source);
    for call in eval_calls(re, source) {
        splicer.replace(call, "ast.literal_eval(");
    }
    if splicer.is_empty() {
        return Err(RewriteError::NoMatch(LITERAL_EVAL_ID));
    }
    let rewrite = splicer.finish();

    if import_re.is_match(&rewrite.code) {
        return Ok(rewrite);
    }

    // Prepending the import shifts every touched line down by one
    let mut lines: Vec<usize> = rewrite.lines.iter().map(|line| line + 1).collect();
    lines.push(line_at(&rewrite.code, 0));
    Ok(Rewrite::new(format!("import ast\n{}", rewrite.code), lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PY: Language = Language::Python;

    #[test]
    fn test_comprehension_plain() {
        let source = "result = []\nfor item in items:\n    result.append(item * 2)\nprint(result)\n";
        assert!(detect_comprehension(source, PY));
        let rewrite = rewrite_comprehension(source, PY).unwrap();
        assert_eq!(
            rewrite.code,
            "result = [item * 2 for item in items]\nprint(result)\n"
        );
        assert_eq!(rewrite.lines, vec![1]);
        assert!(!detect_comprehension(&rewrite.code, PY));
    }

    #[test]
    fn test_comprehension_with_condition_keeps_indent() {
        let source = "def evens(xs):\n    out = []\n    for x in xs:\n        if x % 2 == 0:\n            out.append(x)\n    return out\n";
        let rewrite = rewrite_comprehension(source, PY).unwrap();
        assert_eq!(
            rewrite.code,
            "def evens(xs):\n    out = [x for x in xs if x % 2 == 0]\n    return out\n"
        );
        assert_eq!(rewrite.lines, vec![2]);
    }

    #[test]
    fn test_comprehension_skips_loop_with_trailing_statements() {
        let source = "out = []\nfor x in xs:\n    out.append(x)\n    count += 1\nprint(out)\n";
        assert!(!detect_comprehension(source, PY));
        assert_eq!(
            rewrite_comprehension(source, PY),
            Err(RewriteError::NoMatch(COMPREHENSION_ID))
        );
    }

    #[test]
    fn test_comprehension_allows_blank_line_before_dedent() {
        let source = "out = []\nfor x in xs:\n    out.append(x)\n\nprint(out)";
        let rewrite = rewrite_comprehension(source, PY).unwrap();
        assert_eq!(rewrite.code, "out = [x for x in xs]\n\nprint(out)");
    }

    #[test]
    fn test_comprehension_requires_same_accumulator() {
        let source = "a = []\nfor x in xs:\n    b.append(x)\n";
        assert!(!detect_comprehension(source, PY));
        assert_eq!(
            rewrite_comprehension(source, PY),
            Err(RewriteError::NoMatch(COMPREHENSION_ID))
        );
    }

    #[test]
    fn test_eval_adds_import() {
        let source = "value = eval(text)\n";
        assert!(detect_eval(source, PY));
        let rewrite = rewrite_eval(source, PY).unwrap();
        assert_eq!(rewrite.code, "import ast\nvalue = ast.literal_eval(text)\n");
        assert_eq!(rewrite.lines, vec![1, 2]);
        assert!(!detect_eval(&rewrite.code, PY));
    }

    #[test]
    fn test_eval_existing_import() {
        let source = "import ast\nx = eval(s)\ny = obj.eval(s)\n";
        let rewrite = rewrite_eval(source, PY).unwrap();
        assert_eq!(
            rewrite.code,
            "import ast\nx = ast.literal_eval(s)\ny = obj.eval(s)\n"
        );
        assert_eq!(rewrite.lines, vec![2]);
    }

    #[test]
    fn test_eval_nested_calls_rewritten_in_one_pass() {
        let source = "import ast\nx = eval(eval(s))\n";
        let once = rewrite_eval(source, PY).unwrap();
        assert_eq!(once.code, "import ast\nx = ast.literal_eval(ast.literal_eval(s))\n");
        assert!(!detect_eval(&once.code, PY));
        assert_eq!(
            rewrite_eval(&once.code, PY),
            Err(RewriteError::NoMatch(LITERAL_EVAL_ID))
        );
    }

    #[test]
    fn test_eval_ignores_methods_and_suffixes() {
        assert!(!detect_eval("model.eval()\nretrieval(x)\n", PY));
    }
}
