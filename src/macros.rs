//! A `json!`-style macro for building [`crate::Value`] literals, modeled
//! directly on `serde_json::json!` (the macro every doc example and test
//! in this corpus' `serde_json`-adjacent crates reach for).

/// Build a [`crate::Value`] from JSON-like literal syntax.
///
/// ```
/// use json_patch::json;
///
/// let v = json!({
///     "name": "Andrew",
///     "tags": ["a", "b"],
///     "happy": true,
/// });
/// assert_eq!(v.get("name").and_then(|v| v.as_str()), Some("Andrew"));
/// ```
#[macro_export]
macro_rules! json {
    (null) => {
        $crate::Value::Null
    };
    ([$($tt:tt)*]) => {
        $crate::Value::Array($crate::json_internal_vec![$($tt)*])
    };
    ({$($tt:tt)*}) => {
        $crate::Value::Object($crate::json_internal_map![$($tt)*])
    };
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! json_internal_vec {
    () => {
        Vec::new()
    };
    ($($tt:tt),* $(,)?) => {
        vec![$($crate::json!($tt)),*]
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! json_internal_map {
    () => {
        Vec::new()
    };
    ($($key:tt : $value:tt),* $(,)?) => {{
        let mut members: Vec<(String, $crate::Value)> = Vec::new();
        $(members.push((String::from($key), $crate::json!($value)));)*
        members
    }};
}

#[cfg(test)]
mod tests {
    use crate::Value;

    #[test]
    fn builds_nested_literal() {
        let v = json!({
            "a": 1,
            "b": [1, 2, {"c": null}],
            "d": true,
        });
        let members = v.as_object().unwrap();
        assert_eq!(members.len(), 3);
        match &members[1].1 {
            Value::Array(items) => assert_eq!(items.len(), 3),
            _ => panic!("expected array"),
        }
    }
}
