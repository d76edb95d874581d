use std::collections::HashSet;

use heck::{ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Python reserved words. A sanitized identifier that lands on one of these
/// gets a `_param` suffix.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Map an arbitrary declared name to a valid Python identifier:
/// brackets first (`foo[bar]` → `foo_bar`), then any remaining character
/// outside `[0-9a-zA-Z_]` becomes `_`, a leading digit gets a `p_` prefix,
/// and reserved words get a `_param` suffix. No case conversion — the
/// declared name is preserved as closely as possible.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '[' => out.push('_'),
            ']' => {}
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            _ => out.push('_'),
        }
    }

    if out.is_empty() {
        out.push_str("param");
    }

    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert_str(0, "p_");
    }

    if PYTHON_KEYWORDS.contains(&out.as_str()) {
        out.push_str("_param");
    }

    out
}

/// Tracks identifiers already claimed within one scope. The table is an
/// explicit argument of every caller, scoped to one operation's parameter
/// list (or, for function names, to one document) — identical names in
/// different scopes never cross-contaminate.
#[derive(Debug, Default)]
pub struct IdentTable {
    used: HashSet<String>,
}

impl IdentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize `original` and return a name unused in this table. The first
    /// occurrence keeps the sanitized base; later collisions get `_2`, `_3`,
    /// ... appended, trying increasing suffixes until free.
    pub fn claim(&mut self, original: &str) -> String {
        let base = sanitize_identifier(original);
        let mut candidate = base.clone();
        let mut index = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{index}");
            index += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Create a `NormalizedName` from an arbitrary string, computing the casing
/// variants used for function, class, and environment-variable names.
pub fn normalize_name(name: &str) -> NormalizedName {
    let cleaned = separate_words(name);
    NormalizedName {
        original: name.to_string(),
        pascal_case: cleaned.to_pascal_case(),
        snake_case: cleaned.to_snake_case(),
        screaming_snake: cleaned.to_shouty_snake_case(),
    }
}

/// Derive a snake_case function name from HTTP method + path, used when an
/// operation declares no `operationId`.
///
/// Examples:
/// - `GET /corpora` → `get_corpora`
/// - `GET /corpora/{corpusId}` → `get_corpora_corpus_id`
/// - `POST /search/concordance` → `post_search_concordance`
pub fn route_to_name(method: &str, path: &str) -> String {
    normalize_name(&format!("{} {}", method, path)).snake_case
}

/// Collapse separator characters into word boundaries for heck.
fn separate_words(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_become_single_underscore() {
        assert_eq!(sanitize_identifier("foo[bar]"), "foo_bar");
        assert_eq!(
            sanitize_identifier("concordance_query[queryselector]"),
            "concordance_query_queryselector"
        );
    }

    #[test]
    fn other_symbols_become_underscores() {
        assert_eq!(sanitize_identifier("x-request-id"), "x_request_id");
        assert_eq!(sanitize_identifier("a.b c"), "a_b_c");
    }

    #[test]
    fn leading_digit_is_prefixed() {
        assert_eq!(sanitize_identifier("2ndPage"), "p_2ndPage");
    }

    #[test]
    fn keywords_get_suffix() {
        assert_eq!(sanitize_identifier("from"), "from_param");
        assert_eq!(sanitize_identifier("class"), "class_param");
        assert_eq!(sanitize_identifier("lambda"), "lambda_param");
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(sanitize_identifier("corpusId"), "corpusId");
    }

    #[test]
    fn empty_name_gets_placeholder() {
        assert_eq!(sanitize_identifier(""), "param");
        assert_eq!(sanitize_identifier("[]"), "_");
    }

    #[test]
    fn table_appends_numeric_suffixes() {
        let mut table = IdentTable::new();
        assert_eq!(table.claim("format"), "format");
        assert_eq!(table.claim("format"), "format_2");
        assert_eq!(table.claim("format"), "format_3");
    }

    #[test]
    fn table_collides_after_sanitization() {
        // Distinct declared names that sanitize to the same identifier must
        // still come out unique.
        let mut table = IdentTable::new();
        assert_eq!(table.claim("foo[bar]"), "foo_bar");
        assert_eq!(table.claim("foo.bar"), "foo_bar_2");
    }

    #[test]
    fn tables_are_independent() {
        let mut a = IdentTable::new();
        let mut b = IdentTable::new();
        assert_eq!(a.claim("format"), "format");
        assert_eq!(b.claim("format"), "format");
    }

    #[test]
    fn normalize_computes_casings() {
        let n = normalize_name("Corpus Query API");
        assert_eq!(n.pascal_case, "CorpusQueryApi");
        assert_eq!(n.snake_case, "corpus_query_api");
        assert_eq!(n.screaming_snake, "CORPUS_QUERY_API");
    }

    #[test]
    fn route_names_are_snake_case() {
        assert_eq!(route_to_name("GET", "/corpora"), "get_corpora");
        assert_eq!(
            route_to_name("GET", "/corpora/{corpusId}"),
            "get_corpora_corpus_id"
        );
    }
}
