//! RFC 6902 JSON Patch operation types and the apply engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::Builder;
use crate::cmp::values_equal;
use crate::pointer::{self, Pointer};
use crate::value::Value;

/// JSON Patch `add` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOperation {
    /// Target location.
    pub path: String,
    /// Value to add.
    pub value: Value,
}

/// JSON Patch `remove` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveOperation {
    /// Target location.
    pub path: String,
}

/// JSON Patch `replace` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceOperation {
    /// Target location.
    pub path: String,
    /// Value to replace with.
    pub value: Value,
}

/// JSON Patch `move` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOperation {
    /// Location to move the value from.
    pub from: String,
    /// Target location.
    pub path: String,
}

/// JSON Patch `copy` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyOperation {
    /// Location to copy the value from.
    pub from: String,
    /// Target location.
    pub path: String,
}

/// JSON Patch `test` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOperation {
    /// Target location.
    pub path: String,
    /// Value to compare against.
    pub value: Value,
}

/// A single JSON Patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    /// `add`
    Add(AddOperation),
    /// `remove`
    Remove(RemoveOperation),
    /// `replace`
    Replace(ReplaceOperation),
    /// `move`
    Move(MoveOperation),
    /// `copy`
    Copy(CopyOperation),
    /// `test`
    Test(TestOperation),
}

/// An RFC 6902 JSON Patch: an ordered list of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Patch(pub Vec<PatchOperation>);

/// Parse a `Patch` out of a [`Value`] (e.g. obtained via `serde_json::from_str`).
pub fn from_value(value: Value) -> Result<Patch, serde_json::Error> {
    // Value round-trips losslessly through serde_json's text layer, so we
    // bounce through it to reuse serde_json's tagged-enum deserialization
    // logic rather than reimplementing it against our own Deserializer.
    let text = serde_json::to_string(&value)?;
    serde_json::from_str(&text)
}

/// Classifier carried by a [`PatchError`], identifying which operation
/// failed and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchErrorKind {
    /// Malformed patch element: unknown op, missing field, bad pointer syntax.
    InvalidPatch,
    /// A `test` operation's value did not match.
    TestFailed,
    /// An `add` operation's primitive edit failed.
    AddFailed,
    /// A `remove` operation's primitive edit failed.
    RemoveFailed,
    /// A `replace` operation's primitive edit failed.
    ReplaceFailed,
    /// A `move` operation's primitive edit failed.
    MoveFailed,
    /// A `copy` operation's primitive edit failed.
    CopyFailed,
}

/// Error applying a JSON Patch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{op} operation failed: {message}")]
pub struct PatchError {
    /// The `op` string of the operation that failed.
    pub op: &'static str,
    /// Index of the failing operation within the patch.
    pub index: usize,
    /// What kind of failure this was.
    pub kind: PatchErrorKind,
    message: &'static str,
}

impl PatchError {
    fn new(op: &'static str, index: usize, kind: PatchErrorKind) -> Self {
        let message = match kind {
            PatchErrorKind::InvalidPatch => "invalid patch",
            PatchErrorKind::TestFailed => "test failed",
            PatchErrorKind::AddFailed => "add failed",
            PatchErrorKind::RemoveFailed => "remove failed",
            PatchErrorKind::ReplaceFailed => "replace failed",
            PatchErrorKind::MoveFailed => "move failed",
            PatchErrorKind::CopyFailed => "copy failed",
        };
        PatchError { op, index, kind, message }
    }
}

fn parse_pointer(op: &'static str, index: usize, s: &str) -> Result<Pointer, PatchError> {
    Pointer::parse(s).map_err(|_| PatchError::new(op, index, PatchErrorKind::InvalidPatch))
}

/// Returns `true` if `path` is `from` or addresses a location inside it,
/// the self-move case RFC 6902 forbids for `move`.
fn is_prefix(from: &Pointer, path: &Pointer) -> bool {
    let (f, p) = (from.tokens(), path.tokens());
    p.len() >= f.len() && p[..f.len()] == *f
}

fn apply_add(
    builder: &mut Builder,
    op: &AddOperation,
    index: usize,
) -> Result<(), PatchError> {
    let path = parse_pointer("add", index, &op.path)?;
    let value = Builder::from_value(&op.value);
    if pointer::try_add_if_absent(builder, &path, value.clone()).is_ok() {
        return Ok(());
    }
    pointer::try_replace(builder, &path, value)
        .map(|_| ())
        .map_err(|_| PatchError::new("add", index, PatchErrorKind::AddFailed))
}

fn apply_remove(builder: &mut Builder, op: &RemoveOperation, index: usize) -> Result<(), PatchError> {
    let path = parse_pointer("remove", index, &op.path)?;
    pointer::try_remove(builder, &path)
        .map(|_| ())
        .map_err(|_| PatchError::new("remove", index, PatchErrorKind::RemoveFailed))
}

fn apply_replace(
    builder: &mut Builder,
    op: &ReplaceOperation,
    index: usize,
) -> Result<(), PatchError> {
    let path = parse_pointer("replace", index, &op.path)?;
    pointer::try_replace(builder, &path, Builder::from_value(&op.value))
        .map(|_| ())
        .map_err(|_| PatchError::new("replace", index, PatchErrorKind::ReplaceFailed))
}

fn apply_move(builder: &mut Builder, op: &MoveOperation, index: usize) -> Result<(), PatchError> {
    let from = parse_pointer("move", index, &op.from)?;
    let path = parse_pointer("move", index, &op.path)?;
    if is_prefix(&from, &path) {
        return Err(PatchError::new("move", index, PatchErrorKind::InvalidPatch));
    }
    let value = pointer::try_get(builder, &from)
        .cloned()
        .ok_or_else(|| PatchError::new("move", index, PatchErrorKind::MoveFailed))?;
    pointer::try_remove(builder, &from)
        .map_err(|_| PatchError::new("move", index, PatchErrorKind::MoveFailed))?;
    if pointer::try_add_if_absent(builder, &path, value.clone()).is_ok() {
        return Ok(());
    }
    pointer::try_replace(builder, &path, value)
        .map(|_| ())
        .map_err(|_| PatchError::new("move", index, PatchErrorKind::MoveFailed))
}

fn apply_copy(builder: &mut Builder, op: &CopyOperation, index: usize) -> Result<(), PatchError> {
    let from = parse_pointer("copy", index, &op.from)?;
    let path = parse_pointer("copy", index, &op.path)?;
    let value = pointer::try_get(builder, &from)
        .cloned()
        .ok_or_else(|| PatchError::new("copy", index, PatchErrorKind::CopyFailed))?;
    if pointer::try_add_if_absent(builder, &path, value.clone()).is_ok() {
        return Ok(());
    }
    pointer::try_replace(builder, &path, value)
        .map(|_| ())
        .map_err(|_| PatchError::new("copy", index, PatchErrorKind::CopyFailed))
}

fn apply_test(builder: &Builder, op: &TestOperation, index: usize) -> Result<(), PatchError> {
    let path = parse_pointer("test", index, &op.path)?;
    let actual = pointer::try_get(builder, &path)
        .ok_or_else(|| PatchError::new("test", index, PatchErrorKind::TestFailed))?;
    let actual_value = actual.clone().to_document();
    let equal = values_equal(&actual_value, &op.value)
        .map_err(|_| PatchError::new("test", index, PatchErrorKind::TestFailed))?;
    if equal {
        Ok(())
    } else {
        Err(PatchError::new("test", index, PatchErrorKind::TestFailed))
    }
}

fn apply_one(builder: &mut Builder, op: &PatchOperation, index: usize) -> Result<(), PatchError> {
    match op {
        PatchOperation::Add(o) => apply_add(builder, o, index),
        PatchOperation::Remove(o) => apply_remove(builder, o, index),
        PatchOperation::Replace(o) => apply_replace(builder, o, index),
        PatchOperation::Move(o) => apply_move(builder, o, index),
        PatchOperation::Copy(o) => apply_copy(builder, o, index),
        PatchOperation::Test(o) => apply_test(builder, o, index),
    }
}

/// Apply `patch` to `source`, producing a fresh, materialized document.
///
/// All-or-nothing: a clone of the pre-application builder is kept and
/// swapped back in on the first failure, so the caller never observes
/// partial mutation.
pub fn apply_patch(source: &Value, patch: &Patch) -> Result<Value, PatchError> {
    let mut builder = Builder::from_value(source);
    let snapshot = builder.clone();
    for (index, op) in patch.0.iter().enumerate() {
        if let Err(e) = apply_one(&mut builder, op, index) {
            let _ = std::mem::replace(&mut builder, snapshot);
            return Err(e);
        }
    }
    Ok(builder.to_document())
}

/// Apply `patch` to `source` with no rollback on failure: operations that
/// already succeeded stay applied even if a later operation fails. Faster
/// than [`apply_patch`] when the caller already owns a snapshot (or
/// doesn't need one).
pub fn apply_patch_mut_unchecked(source: &Value, patch: &Patch) -> Result<Value, PatchError> {
    let mut builder = Builder::from_value(source);
    for (index, op) in patch.0.iter().enumerate() {
        apply_one(&mut builder, op, index)?;
    }
    Ok(builder.to_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;

    fn patch_from(ops: Value) -> Patch {
        from_value(ops).unwrap()
    }

    #[test]
    fn rfc_example_s1() {
        let source = json!({"baz": "qux", "foo": "bar"});
        let patch = patch_from(json!([
            {"op": "replace", "path": "/baz", "value": "boo"},
            {"op": "add", "path": "/hello", "value": ["world"]},
            {"op": "remove", "path": "/foo"},
        ]));
        let result = apply_patch(&source, &patch).unwrap();
        let expected = json!({"baz": "boo", "hello": ["world"]});
        assert!(values_equal(&result, &expected).unwrap());
    }

    #[test]
    fn array_append_with_dash_s2() {
        let source = json!([1, 2, 3]);
        let patch = patch_from(json!([{"op": "add", "path": "/-", "value": 4}]));
        let result = apply_patch(&source, &patch).unwrap();
        assert!(values_equal(&result, &json!([1, 2, 3, 4])).unwrap());
    }

    #[test]
    fn array_insert_s3() {
        let source = json!([1, 2, 3]);
        let patch = patch_from(json!([{"op": "add", "path": "/1", "value": 9}]));
        let result = apply_patch(&source, &patch).unwrap();
        assert!(values_equal(&result, &json!([1, 9, 2, 3])).unwrap());
    }

    #[test]
    fn test_failure_s4() {
        let source = json!({"a": 1});
        let patch = patch_from(json!([{"op": "test", "path": "/a", "value": 2}]));
        let err = apply_patch(&source, &patch).unwrap_err();
        assert_eq!(err.kind, PatchErrorKind::TestFailed);
    }

    #[test]
    fn apply_identity_on_empty_patch() {
        let source = json!({"a": [1, 2, {"b": true}]});
        let result = apply_patch(&source, &Patch::default()).unwrap();
        assert!(values_equal(&source, &result).unwrap());
    }

    #[test]
    fn failed_patch_leaves_document_unchanged() {
        let source = json!({"a": 1});
        let patch = patch_from(json!([
            {"op": "replace", "path": "/a", "value": 2},
            {"op": "test", "path": "/a", "value": 999},
        ]));
        assert!(apply_patch(&source, &patch).is_err());
        // apply_patch operates on a fresh clone internally; re-applying
        // the first op alone proves the source itself is untouched.
        let only_first = patch_from(json!([{"op": "replace", "path": "/a", "value": 2}]));
        let result = apply_patch(&source, &only_first).unwrap();
        assert!(values_equal(&result, &json!({"a": 2})).unwrap());
    }

    #[test]
    fn move_rejects_own_prefix() {
        let source = json!({"a": {"b": 1}});
        let patch = patch_from(json!([{"op": "move", "from": "/a", "path": "/a/b"}]));
        let err = apply_patch(&source, &patch).unwrap_err();
        assert_eq!(err.kind, PatchErrorKind::InvalidPatch);
    }

    #[test]
    fn move_relocates_value() {
        let source = json!({"a": {"b": 1}, "c": {}});
        let patch = patch_from(json!([{"op": "move", "from": "/a/b", "path": "/c/b"}]));
        let result = apply_patch(&source, &patch).unwrap();
        assert!(values_equal(&result, &json!({"a": {}, "c": {"b": 1}})).unwrap());
    }

    #[test]
    fn copy_leaves_source_in_place() {
        let source = json!({"a": 1});
        let patch = patch_from(json!([{"op": "copy", "from": "/a", "path": "/b"}]));
        let result = apply_patch(&source, &patch).unwrap();
        assert!(values_equal(&result, &json!({"a": 1, "b": 1})).unwrap());
    }

    #[test]
    fn remove_failed_message_is_corrected() {
        let source = json!({});
        let patch = patch_from(json!([{"op": "remove", "path": "/missing"}]));
        let err = apply_patch(&source, &patch).unwrap_err();
        assert_eq!(err.kind, PatchErrorKind::RemoveFailed);
        assert!(err.to_string().contains("remove failed"));
        assert!(!err.to_string().contains("add failed"));
    }
}
