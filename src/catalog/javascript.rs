//! JavaScript / TypeScript Rules
//!
//! Detectors and rewrites for the JS family. Every detector is a regex or
//! substring test over raw text; nothing here understands scopes or syntax
//! beyond brace matching.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::text::{
    Rewrite, Splicer, changed_lines, contains_word, find_block_end, leading_indent, pattern,
    reindent, rename_identifier, snake_to_camel,
};
use crate::analyzer::Language;
use crate::constants::rewrite::{FLAT_INDEX, FLAT_INDEX_ALT, INDENT};
use crate::types::RewriteError;

pub const FIBONACCI_ID: &str = "js-fibonacci-memo";
pub const NESTED_LOOP_ID: &str = "js-nested-loop-flatten";
pub const INNER_HTML_ID: &str = "js-inner-html";
pub const VAR_CONST_ID: &str = "js-var-const";

macro_rules! js_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// Single-parameter `function fibonacci(n)` with optional TS annotations.
// Groups: 1 parameter, 2 parameter type, 3 return type.
js_pattern!(
    RE_FIBONACCI,
    r"function\s+fibonacci\s*\(\s*([A-Za-z_$][\w$]*)\s*(?::\s*([A-Za-z_$][\w$<>\[\]]*)\s*)?\)\s*(?::\s*([A-Za-z_$][\w$<>\[\]]*)\s*)?\{"
);

// Two directly nested counting loops, ending at the inner loop's `{`.
// Groups: 1-4 outer (init, condition, bound, increment), 5-8 inner.
js_pattern!(
    RE_NESTED_LOOP,
    r"for\s*\(\s*(?:(?:let|var)\s+)?([A-Za-z_$][\w$]*)\s*=\s*0\s*;\s*([A-Za-z_$][\w$]*)\s*<\s*([^;{}]+?)\s*;\s*([A-Za-z_$][\w$]*)\s*\+\+\s*\)\s*\{\s*for\s*\(\s*(?:(?:let|var)\s+)?([A-Za-z_$][\w$]*)\s*=\s*0\s*;\s*([A-Za-z_$][\w$]*)\s*<\s*([^;{}]+?)\s*;\s*([A-Za-z_$][\w$]*)\s*\+\+\s*\)\s*\{"
);

js_pattern!(RE_SIMPLE_OPERAND, r"^[\w$.\[\]]+$");

// `.innerHTML =` but not `==`/`===`. Group 1 spacing, group 2 the next char.
js_pattern!(RE_INNER_HTML, r"\.innerHTML(\s*)=([^=]|$)");

js_pattern!(RE_VAR_DECL, r"\bvar\s+([A-Za-z_$][\w$]*)");

js_pattern!(
    RE_SNAKE_DECL,
    r"\b(?:var|let|const)\s+([a-z][a-z0-9]*(?:_[a-z0-9]+)+)\b"
);

// =============================================================================
// Fibonacci memoization
// =============================================================================

pub(crate) fn detect_fibonacci(source: &str, _language: Language) -> bool {
    let Ok(re) = pattern(&RE_FIBONACCI, "fibonacci") else {
        return false;
    };
    re.find(source)
        .is_some_and(|m| source[m.end()..].contains("fibonacci("))
}

pub(crate) fn rewrite_fibonacci(source: &str, _language: Language) -> Result<Rewrite, RewriteError> {
    let re = pattern(&RE_FIBONACCI, "fibonacci")?;
    let caps = re
        .captures(source)
        .ok_or(RewriteError::NoMatch(FIBONACCI_ID))?;
    let whole = caps.get(0).ok_or(RewriteError::NoMatch(FIBONACCI_ID))?;
    let close = find_block_end(source, whole.end() - 1)?;

    let n = &caps[1];
    let param_type = caps
        .get(2)
        .map(|t| format!(": {}", t.as_str()))
        .unwrap_or_default();
    let memo_type = if caps.get(2).is_some() {
        ": Record<number, number>"
    } else {
        ""
    };
    let return_type = caps
        .get(3)
        .map(|t| format!(": {}", t.as_str()))
        .unwrap_or_default();
    let indent = leading_indent(source, whole.start());

    let replacement = [
        format!("function fibonacci({n}{param_type}, memo{memo_type} = {{}}){return_type} {{"),
        format!("{indent}{INDENT}if ({n} in memo) return memo[{n}];"),
        format!("{indent}{INDENT}if ({n} <= 1) return {n};"),
        format!("{indent}{INDENT}memo[{n}] = fibonacci({n} - 1, memo) + fibonacci({n} - 2, memo);"),
        format!("{indent}{INDENT}return memo[{n}];"),
        format!("{indent}}}"),
    ]
    .join("\n");

    let mut splicer = Splicer::new(source);
    splicer.replace(whole.start()..close + 1, &replacement);
    Ok(splicer.finish())
}

// =============================================================================
// Nested loop flattening
// =============================================================================

/// A nested loop pair that passed every structural check
struct LoopNest<'a> {
    span: std::ops::Range<usize>,
    outer_var: &'a str,
    outer_bound: &'a str,
    inner_var: &'a str,
    inner_bound: &'a str,
    body: &'a str,
}

fn adjacent_index_pattern(var: &str) -> Result<Regex, RewriteError> {
    Regex::new(&format!(r"\b{}\s*[-+]\s*1\b", regex::escape(var)))
        .map_err(|e| RewriteError::InvalidPattern(e.to_string()))
}

fn find_loop_nests(source: &str) -> Result<Vec<LoopNest<'_>>, RewriteError> {
    let re = pattern(&RE_NESTED_LOOP, "nested-loop")?;
    let mut nests = Vec::new();
    let mut consumed = 0;

    for caps in re.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() < consumed {
            continue;
        }

        let (outer, inner) = (&caps[1], &caps[5]);
        if caps[2] != *outer || caps[4] != *outer || caps[6] != *inner || caps[8] != *inner {
            continue;
        }
        if outer == inner {
            continue;
        }

        let Some(outer_brace) = whole.as_str().find('{') else {
            continue;
        };
        let outer_open = whole.start() + outer_brace;
        let inner_open = whole.end() - 1;
        let (Ok(outer_close), Ok(inner_close)) = (
            find_block_end(source, outer_open),
            find_block_end(source, inner_open),
        ) else {
            continue;
        };

        // Perfectly nested: nothing but whitespace after the inner loop
        if inner_close >= outer_close || !source[inner_close + 1..outer_close].trim().is_empty() {
            continue;
        }

        let body = &source[inner_open + 1..inner_close];
        if adjacent_index_pattern(inner)?.is_match(body) {
            continue;
        }

        consumed = outer_close + 1;
        nests.push(LoopNest {
            span: whole.start()..outer_close + 1,
            outer_var: caps.get(1).map_or("", |m| m.as_str()),
            outer_bound: caps.get(3).map_or("", |m| m.as_str()),
            inner_var: caps.get(5).map_or("", |m| m.as_str()),
            inner_bound: caps.get(7).map_or("", |m| m.as_str()),
            body,
        });
    }

    Ok(nests)
}

fn operand(expr: &str) -> String {
    let expr = expr.trim();
    match RE_SIMPLE_OPERAND.as_ref() {
        Some(re) if re.is_match(expr) => expr.to_string(),
        _ => format!("({})", expr),
    }
}

pub(crate) fn detect_nested_loop(source: &str, _language: Language) -> bool {
    find_loop_nests(source).is_ok_and(|nests| !nests.is_empty())
}

pub(crate) fn rewrite_nested_loop(
    source: &str,
    _language: Language,
) -> Result<Rewrite, RewriteError> {
    let nests = find_loop_nests(source)?;
    if nests.is_empty() {
        return Err(RewriteError::NoMatch(NESTED_LOOP_ID));
    }

    let flat = if contains_word(source, FLAT_INDEX)? {
        FLAT_INDEX_ALT
    } else {
        FLAT_INDEX
    };

    let mut splicer = Splicer::new(source);
    for nest in &nests {
        let indent = leading_indent(source, nest.span.start);
        let inner_indent = format!("{indent}{INDENT}");
        let outer_bound = operand(nest.outer_bound);
        let inner_bound = operand(nest.inner_bound);

        let mut lines = vec![
            format!("for (let {flat} = 0; {flat} < {outer_bound} * {inner_bound}; {flat}++) {{"),
            format!(
                "{inner_indent}const {} = Math.floor({flat} / {inner_bound});",
                nest.outer_var
            ),
            format!("{inner_indent}const {} = {flat} % {inner_bound};", nest.inner_var),
        ];
        lines.extend(reindent(nest.body, &inner_indent));
        lines.push(format!("{indent}}}"));

        splicer.replace(nest.span.clone(), &lines.join("\n"));
    }

    Ok(splicer.finish())
}

// =============================================================================
// innerHTML → textContent
// =============================================================================

pub(crate) fn detect_inner_html(source: &str, _language: Language) -> bool {
    pattern(&RE_INNER_HTML, "inner-html").is_ok_and(|re| re.is_match(source))
}

pub(crate) fn rewrite_inner_html(
    source: &str,
    _language: Language,
) -> Result<Rewrite, RewriteError> {
    let re = pattern(&RE_INNER_HTML, "inner-html")?;
    let mut splicer = Splicer::new(source);

    for caps in re.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let spacing = caps.get(1).map_or("", |m| m.as_str());
        let next = caps.get(2).map_or("", |m| m.as_str());
        splicer.replace(whole.range(), &format!(".textContent{spacing}={next}"));
    }

    if splicer.is_empty() {
        return Err(RewriteError::NoMatch(INNER_HTML_ID));
    }
    Ok(splicer.finish())
}

// =============================================================================
// var → const/let, snake_case → camelCase
// =============================================================================

fn reassignment_pattern(name: &str) -> Result<Regex, RewriteError> {
    let name = regex::escape(name);
    Regex::new(&format!(
        r"\b{name}\s*(?:[-+*/%]=|=[^=]|\+\+|--)|(?:\+\+|--)\s*{name}\b"
    ))
    .map_err(|e| RewriteError::InvalidPattern(e.to_string()))
}

/// `const` when the binding is initialized once and never reassigned
fn declaration_keyword(source: &str, name: &str, after_name: usize) -> Result<&'static str, RewriteError> {
    let rest = source[after_name..].trim_start();
    let initialized = rest.starts_with('=') && !rest.starts_with("==");
    if !initialized {
        return Ok("let");
    }
    let assignments = reassignment_pattern(name)?.find_iter(source).count();
    Ok(if assignments > 1 { "let" } else { "const" })
}

pub(crate) fn detect_var_const(source: &str, _language: Language) -> bool {
    let var = pattern(&RE_VAR_DECL, "var-decl").is_ok_and(|re| re.is_match(source));
    var || pattern(&RE_SNAKE_DECL, "snake-decl").is_ok_and(|re| re.is_match(source))
}

pub(crate) fn rewrite_var_const(
    source: &str,
    _language: Language,
) -> Result<Rewrite, RewriteError> {
    let var_re = pattern(&RE_VAR_DECL, "var-decl")?;
    let snake_re = pattern(&RE_SNAKE_DECL, "snake-decl")?;

    let mut splicer = Splicer::new(source);
    for caps in var_re.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let keyword = declaration_keyword(source, name.as_str(), name.end())?;
        splicer.replace(
            whole.start()..name.start(),
            &format!("{keyword} "),
        );
    }
    let mut code = splicer.finish().code;

    let snake_names: BTreeSet<String> = snake_re
        .captures_iter(&code)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    for name in snake_names {
        let camel = snake_to_camel(&name);
        if camel == name || contains_word(&code, &camel)? {
            continue;
        }
        code = rename_identifier(&code, &name, &camel)?;
    }

    if code == source {
        return Err(RewriteError::NoMatch(VAR_CONST_ID));
    }
    let lines = changed_lines(source, &code);
    Ok(Rewrite::new(code, lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS: Language = Language::JavaScript;

    const FIB: &str = "function fibonacci(n) { if (n<=0) return 0; if (n===1) return 1; return fibonacci(n-1)+fibonacci(n-2); }";

    #[test]
    fn test_fibonacci_detect() {
        assert!(detect_fibonacci(FIB, JS));
        assert!(!detect_fibonacci("function fibonacci(n, memo = {}) { return n; }", JS));
        // Not recursive
        assert!(!detect_fibonacci("function fibonacci(n) { return n; }", JS));
    }

    #[test]
    fn test_fibonacci_rewrite() {
        let rewrite = rewrite_fibonacci(FIB, JS).unwrap();
        assert!(rewrite.code.starts_with("function fibonacci(n, memo = {}) {"));
        assert!(rewrite.code.contains("if (n in memo) return memo[n];"));
        assert!(rewrite.code.contains("fibonacci(n - 1, memo) + fibonacci(n - 2, memo)"));
        assert_eq!(rewrite.lines, vec![1, 2, 3, 4, 5, 6]);
        assert!(!detect_fibonacci(&rewrite.code, JS));
    }

    #[test]
    fn test_fibonacci_typescript_and_indent() {
        let source = "class M {\n  calc() {}\n}\n  function fibonacci(n: number): number {\n    if (n < 2) { return n; }\n    return fibonacci(n - 1) + fibonacci(n - 2);\n  }\nconsole.log(fibonacci(10));\n";
        let rewrite = rewrite_fibonacci(source, Language::TypeScript).unwrap();
        assert!(rewrite.code.contains(
            "function fibonacci(n: number, memo: Record<number, number> = {}): number {"
        ));
        assert!(rewrite.code.contains("\n    return memo[n];\n  }\nconsole.log"));
        assert_eq!(rewrite.lines, vec![4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_fibonacci_unbalanced() {
        let source = "function fibonacci(n) { return fibonacci(n - 1)";
        assert_eq!(
            rewrite_fibonacci(source, JS),
            Err(RewriteError::UnbalancedBraces(22))
        );
    }

    const NESTED: &str = "for (let i = 0; i < array.length; i++) {\n  for (let j = 0; j < array.length; j++) {\n    total += array[i] * array[j];\n  }\n}\n";

    #[test]
    fn test_nested_loop_flatten() {
        assert!(detect_nested_loop(NESTED, JS));
        let rewrite = rewrite_nested_loop(NESTED, JS).unwrap();
        assert_eq!(
            rewrite.code,
            "for (let idx = 0; idx < array.length * array.length; idx++) {\n  const i = Math.floor(idx / array.length);\n  const j = idx % array.length;\n  total += array[i] * array[j];\n}\n"
        );
        assert_eq!(rewrite.code.matches("for (").count(), 1);
        assert_eq!(rewrite.lines, vec![1, 2, 3, 4, 5]);
        assert!(!detect_nested_loop(&rewrite.code, JS));
    }

    #[test]
    fn test_nested_loop_adjacent_index_is_skipped() {
        let source = "for (let i = 0; i < n; i++) {\n  for (let j = 0; j < m; j++) {\n    grid[i][j] = grid[i][j - 1];\n  }\n}";
        assert!(!detect_nested_loop(source, JS));
    }

    #[test]
    fn test_nested_loop_not_perfectly_nested() {
        let source = "for (let i = 0; i < n; i++) {\n  for (let j = 0; j < m; j++) {\n    a(i, j);\n  }\n  b(i);\n}";
        assert!(!detect_nested_loop(source, JS));
    }

    #[test]
    fn test_nested_loop_complex_bounds_and_taken_index() {
        let source = "const idx = 0;\nfor (let r = 0; r < rows - 1; r++) { for (let c = 0; c < cols; c++) { visit(r, c); } }";
        let rewrite = rewrite_nested_loop(source, JS).unwrap();
        assert!(rewrite.code.contains(
            "for (let flatIndex = 0; flatIndex < (rows - 1) * cols; flatIndex++) {"
        ));
        assert!(rewrite.code.contains("const r = Math.floor(flatIndex / cols);"));
        assert!(rewrite.code.contains("  visit(r, c);"));
    }

    #[test]
    fn test_inner_html() {
        let source = "element.innerHTML = x;\nif (el.innerHTML === '') {}\nb.innerHTML=y;";
        assert!(detect_inner_html(source, JS));
        let rewrite = rewrite_inner_html(source, JS).unwrap();
        assert_eq!(
            rewrite.code,
            "element.textContent = x;\nif (el.innerHTML === '') {}\nb.textContent=y;"
        );
        assert_eq!(rewrite.lines, vec![1, 3]);
        assert!(!detect_inner_html(&rewrite.code, JS));
        assert!(!detect_inner_html("if (a.innerHTML == b) {}", JS));
    }

    #[test]
    fn test_var_to_const_and_let() {
        let source = "var total = 0;\nvar limit = 10;\nfor (var i = 0; i < limit; i++) {\n  total += i;\n}\nvar pending;";
        let rewrite = rewrite_var_const(source, JS).unwrap();
        assert_eq!(
            rewrite.code,
            "let total = 0;\nconst limit = 10;\nfor (let i = 0; i < limit; i++) {\n  total += i;\n}\nlet pending;"
        );
        assert_eq!(rewrite.lines, vec![1, 2, 3, 6]);
        assert!(!detect_var_const(&rewrite.code, JS));
    }

    #[test]
    fn test_snake_case_recased() {
        let source = "const user_name = getName();\nconsole.log(user_name);";
        assert!(detect_var_const(source, JS));
        let rewrite = rewrite_var_const(source, JS).unwrap();
        assert_eq!(
            rewrite.code,
            "const userName = getName();\nconsole.log(userName);"
        );
    }

    #[test]
    fn test_var_const_no_match() {
        assert!(!detect_var_const("const ok = 1;", JS));
        assert_eq!(
            rewrite_var_const("const ok = 1;", JS),
            Err(RewriteError::NoMatch(VAR_CONST_ID))
        );
    }
}
