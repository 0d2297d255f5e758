//! Structural diff: produce an RFC 6902 patch that transforms `source`
//! into `target`, walking this crate's own [`Value`] tree directly.

use crate::cmp::values_equal;
use crate::patch::{AddOperation, Patch, PatchOperation, RemoveOperation, ReplaceOperation};
use crate::pointer::Pointer;
use crate::value::Value;

/// Diff two JSON documents and generate a JSON Patch (RFC 6902) that
/// transforms `source` into `target`.
pub fn from_diff(source: &Value, target: &Value) -> Patch {
    let mut ops = Vec::new();
    diff_at(source, target, "", &mut ops);
    Patch(ops)
}

fn diff_at(source: &Value, target: &Value, path: &str, ops: &mut Vec<PatchOperation>) {
    if let Ok(true) = values_equal(source, target) {
        return;
    }
    match (source, target) {
        (Value::Array(s), Value::Array(t)) => diff_arrays(s, t, path, ops),
        (Value::Object(s), Value::Object(t)) => diff_objects(s, t, path, ops),
        _ => ops.push(PatchOperation::Replace(ReplaceOperation {
            path: path.to_owned(),
            value: target.clone(),
        })),
    }
}

fn child_path(path: &str, token: &str) -> String {
    format!("{path}/{}", Pointer::escape(token))
}

fn diff_arrays(source: &[Value], target: &[Value], path: &str, ops: &mut Vec<PatchOperation>) {
    let common = source.len().min(target.len());
    for i in 0..common {
        diff_at(&source[i], &target[i], &child_path(path, &i.to_string()), ops);
    }
    // Removals walk from the end so each index still addresses the
    // element it named at the moment the patch is applied.
    for i in (target.len()..source.len()).rev() {
        ops.push(PatchOperation::Remove(RemoveOperation {
            path: child_path(path, &i.to_string()),
        }));
    }
    for (i, item) in target.iter().enumerate().skip(source.len()) {
        ops.push(PatchOperation::Add(AddOperation {
            path: child_path(path, &i.to_string()),
            value: item.clone(),
        }));
    }
}

fn diff_objects(
    source: &[(String, Value)],
    target: &[(String, Value)],
    path: &str,
    ops: &mut Vec<PatchOperation>,
) {
    for (name, value) in source {
        match target.iter().find(|(k, _)| k == name) {
            Some((_, tv)) => diff_at(value, tv, &child_path(path, name), ops),
            None => ops.push(PatchOperation::Remove(RemoveOperation {
                path: child_path(path, name),
            })),
        }
    }
    for (name, value) in target {
        if !source.iter().any(|(k, _)| k == name) {
            ops.push(PatchOperation::Add(AddOperation {
                path: child_path(path, name),
                value: value.clone(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;
    use crate::patch::apply_patch;

    #[test]
    fn diff_apply_round_trip() {
        let pairs = [
            (json!({"a": 1, "b": [1, 2, 3]}), json!({"a": 2, "b": [1, 2]})),
            (json!([1, 2, 3]), json!([1, 9, 2, 3])),
            (json!({"title": "Hello!"}), Value::Null),
            (Value::Null, json!({"title": "Hello!"})),
            (json!({"x": {"y": 1}}), json!({"x": {"y": 1, "z": 2}})),
        ];
        for (source, target) in pairs {
            let patch = from_diff(&source, &target);
            let result = apply_patch(&source, &patch).unwrap();
            assert!(
                values_equal(&result, &target).unwrap(),
                "diff/apply round trip failed: {:?} -> {:?} via {:?}",
                source,
                target,
                patch
            );
        }
    }

    #[test]
    fn array_removes_are_strictly_descending() {
        let source = json!([1, 2, 3, 4, 5]);
        let target = json!([1]);
        let patch = from_diff(&source, &target);
        let removes: Vec<&str> = patch
            .0
            .iter()
            .filter_map(|op| match op {
                PatchOperation::Remove(r) => Some(r.path.as_str()),
                _ => None,
            })
            .collect();
        let mut sorted = removes.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(removes, sorted);
    }

    #[test]
    fn equal_documents_produce_empty_patch() {
        let doc = json!({"a": [1, {"b": 2}]});
        let patch = from_diff(&doc, &doc);
        assert!(patch.0.is_empty());
    }

    #[test]
    fn object_diff_matches_rfc_style_example() {
        let source = json!({
            "title": "Goodbye!",
            "author": {"givenName": "John", "familyName": "Doe"},
            "tags": ["example", "sample"],
            "content": "This will be unchanged",
        });
        let target = json!({
            "title": "Hello!",
            "author": {"givenName": "John"},
            "tags": ["example"],
            "content": "This will be unchanged",
            "phoneNumber": "+01-123-456-7890",
        });
        let patch = from_diff(&source, &target);
        let result = apply_patch(&source, &patch).unwrap();
        assert!(values_equal(&result, &target).unwrap());
    }
}
