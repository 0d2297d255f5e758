//! A compiled JSONPath expression and its three evaluation modes.

mod evaluator;
mod parser;
mod selector;

pub use evaluator::{Node, Options};
pub use parser::ParseError;
pub use selector::{NormalizedPath, PathComponent, Selector};

use crate::value::Value;

/// A parsed, ready-to-evaluate JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    selectors: Vec<Selector>,
}

impl JsonPath {
    /// Parse a JSONPath expression such as `$.store.book[0].title`.
    pub fn parse(expr: &str) -> Result<JsonPath, ParseError> {
        Ok(JsonPath { selectors: parser::parse(expr)? })
    }

    /// Collect the matched values, in document order subject to `options`.
    pub fn select(&self, root: &Value, options: Options) -> Vec<Value> {
        let results = evaluator::postprocess(evaluator::evaluate(root, &self.selectors), options);
        results.into_iter().map(|(_, v)| v).collect()
    }

    /// Collect the normalized paths of the matched values.
    pub fn select_paths(&self, root: &Value, options: Options) -> Vec<NormalizedPath> {
        let results = evaluator::postprocess(evaluator::evaluate(root, &self.selectors), options);
        results.into_iter().map(|(p, _)| p).collect()
    }

    /// Collect (path, value) pairs for the matched values.
    pub fn select_nodes(&self, root: &Value, options: Options) -> Vec<Node> {
        let results = evaluator::postprocess(evaluator::evaluate(root, &self.selectors), options);
        results.into_iter().map(|(path, value)| Node { path, value }).collect()
    }

    /// Resolve `path` directly against `root`, independent of this
    /// expression's own selectors: walks each component in turn (a `Name`
    /// descends into an object's first-matching child, an `Index`
    /// descends into an array element), returning `None` at the first
    /// wrong-kind, out-of-range, or missing-name mismatch.
    pub fn try_select_single(&self, root: &Value, path: &NormalizedPath) -> Option<Value> {
        let mut components = path.0.iter();
        match components.next()? {
            PathComponent::Root => {}
            _ => return None,
        }
        let mut current = root;
        for component in components {
            current = match component {
                PathComponent::Name(name) => current.get(name)?,
                PathComponent::Index(index) => current.as_array()?.get(*index)?,
                PathComponent::Root => return None,
            };
        }
        Some(current.clone())
    }
}
