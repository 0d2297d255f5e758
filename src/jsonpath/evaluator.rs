//! Walks a compiled selector chain against a root value, accumulating
//! results through one of three sinks: values, normalized paths, or
//! (path, value) nodes.

use super::selector::{NormalizedPath, Selector};
use crate::value::Value;

/// A single (path, value) result produced by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The normalized path to this value.
    pub path: NormalizedPath,
    /// The value at that path.
    pub value: Value,
}

/// Evaluation options. `NoDups`/`Sort` each imply `Path` tracking, which
/// this evaluator always performs internally regardless; the flags only
/// affect post-processing and the public projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options(u8);

impl Options {
    /// No post-processing: results in first-encountered (document) order,
    /// duplicates and all.
    pub const NONE: Options = Options(0);
    /// Ensure normalized paths are tracked (implied by the other two;
    /// exists as an explicit bit so callers can request path tracking
    /// without sorting or deduping).
    pub const PATH: Options = Options(1 << 0);
    /// Stable-deduplicate results by normalized path, preserving the
    /// first occurrence's position.
    pub const NO_DUPS: Options = Options(1 << 1);
    /// Stable-sort results by normalized path.
    pub const SORT: Options = Options(1 << 2);

    /// Whether `other`'s bits are all set in `self`.
    pub fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Options {
    type Output = Options;
    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

fn expand_descendants(path: &NormalizedPath, value: &Value, out: &mut Vec<(NormalizedPath, Value)>) {
    out.push((path.clone(), value.clone()));
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                expand_descendants(&path.with_index(i), item, out);
            }
        }
        Value::Object(members) => {
            for (name, v) in members {
                expand_descendants(&path.with_name(name.clone()), v, out);
            }
        }
        _ => {}
    }
}

fn step(current: Vec<(NormalizedPath, Value)>, selector: &Selector) -> Vec<(NormalizedPath, Value)> {
    match selector {
        Selector::Root => current,
        Selector::Identifier(name) => current
            .into_iter()
            .filter_map(|(path, value)| {
                value
                    .get(name)
                    .cloned()
                    .map(|child| (path.with_name(name.clone()), child))
            })
            .collect(),
        Selector::Index(i) => current
            .into_iter()
            .filter_map(|(path, value)| {
                let items = value.as_array()?;
                let idx = normalize_index(*i, items.len())?;
                Some((path.with_index(idx), items[idx].clone()))
            })
            .collect(),
        Selector::Wildcard => current
            .into_iter()
            .flat_map(|(path, value)| -> Vec<(NormalizedPath, Value)> {
                match value {
                    Value::Array(items) => items
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (path.with_index(i), v))
                        .collect(),
                    Value::Object(members) => members
                        .into_iter()
                        .map(|(name, v)| (path.with_name(name), v))
                        .collect(),
                    _ => Vec::new(),
                }
            })
            .collect(),
        Selector::RecursiveDescent => {
            let mut out = Vec::new();
            for (path, value) in current {
                expand_descendants(&path, &value, &mut out);
            }
            out
        }
    }
}

fn normalize_index(i: i64, len: usize) -> Option<usize> {
    if i >= 0 {
        let i = i as usize;
        (i < len).then_some(i)
    } else {
        let from_end = (-i) as usize;
        (from_end <= len).then(|| len - from_end)
    }
}

/// Evaluate `selectors` against `root`, returning raw (path, value) pairs
/// in first-encountered order, before any dedup/sort post-processing.
pub fn evaluate(root: &Value, selectors: &[Selector]) -> Vec<(NormalizedPath, Value)> {
    let mut current = vec![(NormalizedPath::root(), root.clone())];
    for selector in selectors {
        current = step(current, selector);
    }
    current
}

/// Apply `NoDups`/`Sort` post-processing, in that order: sort first (when
/// requested), then dedupe so that with both set, dedup removes the
/// survivor that sorts first among equals. This also makes dedup
/// idempotent: deduping an already-deduped, already-sorted list is a
/// no-op.
pub fn postprocess(mut results: Vec<(NormalizedPath, Value)>, options: Options) -> Vec<(NormalizedPath, Value)> {
    if options.contains(Options::SORT) {
        results.sort_by(|a, b| a.0.cmp(&b.0));
    }
    if options.contains(Options::NO_DUPS) {
        let mut seen = std::collections::HashSet::new();
        results.retain(|(path, _)| seen.insert(path.clone()));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;
    use crate::jsonpath::parser::parse;

    fn eval(expr: &str, root: &Value) -> Vec<(NormalizedPath, Value)> {
        let selectors = parse(expr).unwrap();
        evaluate(root, &selectors)
    }

    #[test]
    fn store_book_title_s6() {
        let root = json!({"store": {"book": [{"t": "A"}, {"t": "B"}]}});
        let results = eval("$.store.book[0].t", &root);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.as_str(), Some("A"));
    }

    #[test]
    fn wildcard_fans_out_over_array() {
        let root = json!({"a": [1, 2, 3]});
        let results = eval("$.a.*", &root);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn recursive_descent_finds_nested_names() {
        let root = json!({"a": {"x": 1}, "b": {"x": 2, "y": {"x": 3}}});
        let results = eval("$..x", &root);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn negative_index_counts_from_end() {
        let root = json!([1, 2, 3]);
        let results = eval("$[-1]", &root);
        assert_eq!(results.len(), 1);
        match results[0].1 {
            Value::Number(_) => {}
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn sort_then_dedup_is_idempotent() {
        let root = json!({"a": 1, "b": 1});
        let results = eval("$..*", &root);
        let once = postprocess(results.clone(), Options::SORT | Options::NO_DUPS);
        let twice = postprocess(once.clone(), Options::SORT | Options::NO_DUPS);
        assert_eq!(once, twice);
    }
}
