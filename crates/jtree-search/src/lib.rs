//! Recursive and path-scoped ("query") search over a parsed document.
//!
//! Grounded on `core-actions/src/span_resolver.rs` and `text_object.rs`
//! for the "lazily walk, test each candidate, stop at the first/next
//! match" shape; the match-precedence rules themselves (exact literal,
//! numeric, regex, glob, substring) come directly from spec.md §4.3,
//! which has no teacher analog to generalize from.

use std::collections::VecDeque;

use jtree_core::{Path, Step, is_container};
use jtree_regex::Regex;
use serde_json::Value;

/// Typed-numeric parse cache for a search pattern, computed once when the
/// pattern is set and reused for every candidate comparison.
#[derive(Debug, Clone)]
pub struct PatternCache {
    pub raw: String,
    pub is_numeric: bool,
    pub is_integer: bool,
    pub is_unsigned: bool,
    pub int_value: Option<i64>,
    pub uint_value: Option<u64>,
    pub double_value: Option<f64>,
}

impl PatternCache {
    pub fn new(pattern: &str) -> Self {
        let int_value = pattern.parse::<i64>().ok();
        let uint_value = pattern.parse::<u64>().ok();
        let double_value = pattern.parse::<f64>().ok();
        PatternCache {
            raw: pattern.to_string(),
            is_numeric: double_value.is_some(),
            is_integer: int_value.is_some(),
            is_unsigned: uint_value.is_some(),
            int_value,
            uint_value,
            double_value,
        }
    }
}

fn has_regex_metachars(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(c, '.' | '^' | '$' | '+' | '?' | '[' | ']' | '\\' | '|'))
}

/// Classic wildcard matcher: `*` matches any run of characters (including
/// none), everything else matches literally, case-insensitively.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().flat_map(|c| c.to_lowercase()).collect();
    let t: Vec<char> = text.chars().flat_map(|c| c.to_lowercase()).collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut match_from = 0usize;
    while ti < t.len() {
        if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            match_from = ti;
            pi += 1;
        } else if let Some(si) = star {
            pi = si + 1;
            match_from += 1;
            ti = match_from;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Test `text` (a string value's bytes, or a key atom's bytes) against
/// the pattern using the precedence from spec.md §4.3: exact literal,
/// numeric, regex (if metacharacters present), glob (if `*` present),
/// substring otherwise.
pub fn string_matches(cache: &PatternCache, text: &str) -> bool {
    if text == cache.raw {
        return true;
    }
    if cache.is_numeric {
        if let Ok(n) = text.parse::<f64>() {
            if n == cache.double_value.unwrap() {
                return true;
            }
        }
    }
    if has_regex_metachars(&cache.raw) {
        return Regex::compile(&cache.raw)
            .map(|re| re.is_match(text))
            .unwrap_or(false);
    }
    if cache.raw.contains('*') {
        return glob_match(&cache.raw, text);
    }
    text.to_lowercase().contains(&cache.raw.to_lowercase())
}

/// Test a JSON value against the pattern: numeric equality for numbers,
/// string-form matching for strings, no match for anything else (bools,
/// null, and containers have no string form under this rule).
pub fn value_matches(cache: &PatternCache, value: &Value) -> bool {
    if cache.is_numeric {
        if let Some(n) = value.as_f64() {
            if n == cache.double_value.unwrap() {
                return true;
            }
        }
    }
    if let Value::String(s) = value {
        return string_matches(cache, s);
    }
    false
}

/// A single search hit: the path to the matching node, and whether the
/// match was on the entry's key (`matched_key`) or its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: Path,
    pub matched_key: bool,
}

enum FrameIter<'v> {
    Array(std::iter::Enumerate<std::slice::Iter<'v, Value>>),
    Object(serde_json::map::Iter<'v, String, Value>),
}

struct Frame<'v> {
    path: Path,
    iter: FrameIter<'v>,
}

fn frame_iter(value: &Value) -> FrameIter<'_> {
    match value {
        Value::Array(a) => FrameIter::Array(a.iter().enumerate()),
        Value::Object(o) => FrameIter::Object(o.iter()),
        _ => unreachable!("frame_iter called on a non-container"),
    }
}

/// Streams matches from a whole-document recursive walk in document
/// order. Matches are produced lazily; nothing beyond the current
/// descent stack is retained.
pub struct RecursiveMatches<'v, 'p> {
    pattern: &'p PatternCache,
    stack: Vec<Frame<'v>>,
    queued: VecDeque<SearchHit>,
}

impl<'v, 'p> Iterator for RecursiveMatches<'v, 'p> {
    type Item = SearchHit;

    fn next(&mut self) -> Option<SearchHit> {
        loop {
            if let Some(hit) = self.queued.pop_front() {
                return Some(hit);
            }
            let top = self.stack.len().checked_sub(1)?;
            let next_item = match &mut self.stack[top].iter {
                FrameIter::Array(it) => it.next().map(|(idx, child)| (Step::Index(idx), child)),
                FrameIter::Object(it) => {
                    it.next().map(|(key, child)| (Step::Key(key.clone()), child))
                }
            };
            match next_item {
                None => {
                    self.stack.pop();
                }
                Some((step, child)) => {
                    let key_matched = matches!(&step, Step::Key(k) if string_matches(self.pattern, k));
                    let mut child_path = self.stack[top].path.clone();
                    child_path.push(step);
                    if key_matched {
                        self.queued.push_back(SearchHit {
                            path: child_path.clone(),
                            matched_key: true,
                        });
                    }
                    if is_container(child) {
                        self.stack.push(Frame {
                            path: child_path,
                            iter: frame_iter(child),
                        });
                    } else if value_matches(self.pattern, child) {
                        self.queued.push_back(SearchHit {
                            path: child_path,
                            matched_key: false,
                        });
                    }
                }
            }
        }
    }
}

pub fn recursive_search<'v, 'p>(
    root: &'v Value,
    pattern: &'p PatternCache,
) -> RecursiveMatches<'v, 'p> {
    let mut queued = VecDeque::new();
    let mut stack = Vec::new();
    if is_container(root) {
        stack.push(Frame {
            path: Path::default(),
            iter: frame_iter(root),
        });
    } else if value_matches(pattern, root) {
        queued.push_back(SearchHit {
            path: Path::default(),
            matched_key: false,
        });
    }
    RecursiveMatches {
        pattern,
        stack,
        queued,
    }
}

/// Streams matches from a path-scoped walk: every container in document
/// order is a candidate, `query` is evaluated relative to it, and the
/// result is tested against the pattern.
pub struct QueryMatches<'v, 'p> {
    pattern: &'p PatternCache,
    query: &'p Path,
    stack: Vec<Frame<'v>>,
    pending_root_check: Option<&'v Value>,
}

impl<'v, 'p> Iterator for QueryMatches<'v, 'p> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        if let Some(root) = self.pending_root_check.take() {
            if let Some(result) = jtree_core::eval(root, self.query) {
                if value_matches(self.pattern, result) {
                    return Some(Path::default());
                }
            }
        }
        loop {
            let top = self.stack.len().checked_sub(1)?;
            let next_item = match &mut self.stack[top].iter {
                FrameIter::Array(it) => it.next().map(|(idx, child)| (Step::Index(idx), child)),
                FrameIter::Object(it) => {
                    it.next().map(|(key, child)| (Step::Key(key.clone()), child))
                }
            };
            match next_item {
                None => {
                    self.stack.pop();
                }
                Some((step, child)) => {
                    let mut child_path = self.stack[top].path.clone();
                    child_path.push(step);
                    if is_container(child) {
                        self.stack.push(Frame {
                            path: child_path.clone(),
                            iter: frame_iter(child),
                        });
                        if let Some(result) = jtree_core::eval(child, self.query) {
                            if value_matches(self.pattern, result) {
                                return Some(child_path);
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn query_search<'v, 'p>(
    root: &'v Value,
    query: &'p Path,
    pattern: &'p PatternCache,
) -> QueryMatches<'v, 'p> {
    let mut stack = Vec::new();
    if is_container(root) {
        stack.push(Frame {
            path: Path::default(),
            iter: frame_iter(root),
        });
    }
    QueryMatches {
        pattern,
        query,
        stack,
        pending_root_check: is_container(root).then_some(root),
    }
}

/// All proper prefixes of `path`, shallowest first, used by the
/// navigation engine to expand every ancestor container on the way down
/// to a match found inside collapsed containers.
pub fn prefixes(path: &Path) -> Vec<Path> {
    let mut out = Vec::new();
    for i in 0..path.steps().len() {
        out.push(Path::new(path.steps()[..i].to_vec()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn glob_wildcard_matches() {
        assert!(glob_match("foo*", "foobar"));
        assert!(glob_match("*bar", "foobar"));
        assert!(glob_match("f*r", "foobar"));
        assert!(!glob_match("foo*", "xfoobar"));
        assert!(glob_match("FOO*", "foobar"));
    }

    #[test]
    fn numeric_pattern_matches_numeric_value() {
        let cache = PatternCache::new("42");
        assert!(value_matches(&cache, &json!(42)));
        assert!(value_matches(&cache, &json!(42.0)));
        assert!(!value_matches(&cache, &json!(43)));
    }

    #[test]
    fn exact_literal_precedes_substring() {
        let cache = PatternCache::new("a");
        assert!(string_matches(&cache, "a"));
    }

    #[test]
    fn regex_metachars_select_regex_path() {
        let cache = PatternCache::new("^foo.*bar$");
        assert!(string_matches(&cache, "foobazbar"));
        assert!(!string_matches(&cache, "xfoobazbar"));
    }

    #[test]
    fn glob_selected_only_for_plain_star() {
        let cache = PatternCache::new("foo*");
        assert!(string_matches(&cache, "foobar"));
    }

    #[test]
    fn substring_case_insensitive_fallback() {
        let cache = PatternCache::new("wor");
        assert!(string_matches(&cache, "Hello World"));
    }

    #[test]
    fn recursive_search_finds_key_and_value() {
        let doc = json!({"name": "alice", "tags": ["admin", "user"]});
        let cache = PatternCache::new("admin");
        let hits: Vec<_> = recursive_search(&doc, &cache).collect();
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].matched_key);
        assert_eq!(hits[0].path.display(), "tags[0]");
    }

    #[test]
    fn recursive_search_matches_key_name() {
        let doc = json!({"name": "alice"});
        let cache = PatternCache::new("name");
        let hits: Vec<_> = recursive_search(&doc, &cache).collect();
        assert!(hits.iter().any(|h| h.matched_key));
    }

    #[test]
    fn recursive_search_is_document_ordered() {
        let doc = json!([{"x": 1}, {"x": 2}, {"x": 1}]);
        let cache = PatternCache::new("1");
        let hits: Vec<_> = recursive_search(&doc, &cache).collect();
        let paths: Vec<_> = hits.iter().map(|h| h.path.display()).collect();
        assert_eq!(paths, vec!["[0].x", "[2].x"]);
    }

    #[test]
    fn query_search_scopes_to_a_field_per_container() {
        let doc = json!([{"name": "alice"}, {"name": "bob"}, {"name": "alicia"}]);
        let (query, _) = jtree_core::parse_path("name");
        let cache = PatternCache::new("alic*");
        let hits: Vec<_> = query_search(&doc, &query, &cache)
            .map(|p| p.display())
            .collect();
        assert_eq!(hits, vec!["[0]", "[2]"]);
    }

    #[test]
    fn prefixes_are_shallow_to_deep() {
        let (path, _) = jtree_core::parse_path("a.b[2]");
        let pfx = prefixes(&path);
        assert_eq!(pfx.iter().map(|p| p.display()).collect::<Vec<_>>(), vec!["", "a", "a.b"]);
    }
}
