//! Value equality and the `JsonElementComparer` total order over
//! read-only [`Value`]s.

use std::cmp::Ordering;

use thiserror::Error;

use crate::value::Value;

/// Failure to compare two numbers: neither operand parses as a decimal
/// nor as a double, or an unknown value kind was encountered.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CompareError {
    /// Neither operand could be compared as a decimal or as a double.
    #[error("cannot compare numbers")]
    UnableToCompareNumbers,
}

fn kind_rank(v: &Value) -> u8 {
    // Undefined has no representation in this value model (there is no
    // "missing" Value, only absence from a container), so the ranking
    // starts at Object.
    match v {
        Value::Object(_) => 1,
        Value::Array(_) => 2,
        Value::String(_) => 3,
        Value::Number(_) => 4,
        Value::Bool(true) => 5,
        Value::Bool(false) => 6,
        Value::Null => 7,
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Result<Ordering, CompareError> {
    let (Value::Number(na), Value::Number(nb)) = (a, b) else {
        unreachable!("compare_numbers called on non-numbers")
    };
    if let (Some(da), Some(db)) = (na.try_as_decimal(), nb.try_as_decimal()) {
        if let (Ok(ia), Ok(ib)) = (da.parse::<i128>(), db.parse::<i128>()) {
            return Ok(ia.cmp(&ib));
        }
    }
    match (na.try_as_f64(), nb.try_as_f64()) {
        (Some(fa), Some(fb)) => fa.partial_cmp(&fb).ok_or(CompareError::UnableToCompareNumbers),
        _ => Err(CompareError::UnableToCompareNumbers),
    }
}

fn numbers_equal(a: &Value, b: &Value) -> Result<bool, CompareError> {
    compare_numbers(a, b).map(|o| o == Ordering::Equal)
}

/// Structural equality: same kind, and kind-specific rules.
/// Object equality is multiset equality over `(name, value)` pairs
/// (duplicate names are matched by count, not collapsed).
pub fn values_equal(a: &Value, b: &Value) -> Result<bool, CompareError> {
    match (a, b) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Number(_), Value::Number(_)) => numbers_equal(a, b),
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (Value::Array(x), Value::Array(y)) => {
            if x.len() != y.len() {
                return Ok(false);
            }
            for (xi, yi) in x.iter().zip(y.iter()) {
                if !values_equal(xi, yi)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Object(x), Value::Object(y)) => objects_equal(x, y),
        _ => Ok(false),
    }
}

fn objects_equal(a: &[(String, Value)], b: &[(String, Value)]) -> Result<bool, CompareError> {
    if a.len() != b.len() {
        return Ok(false);
    }
    let mut used = vec![false; b.len()];
    'outer: for (ka, va) in a {
        for (j, (kb, vb)) in b.iter().enumerate() {
            if used[j] || ka != kb {
                continue;
            }
            if values_equal(va, vb)? {
                used[j] = true;
                continue 'outer;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// A total order over read-only [`Value`]s, usable as `Ord`/`sort_by`
/// glue even though [`Value`] itself cannot implement `Ord` infallibly
/// (number comparison can fail).
pub struct JsonElementComparer;

impl JsonElementComparer {
    /// Compare two values per the total order: kind rank first (
    /// `Object < Array < String < Number < True < False < Null`), then a
    /// kind-specific rule.
    pub fn compare(a: &Value, b: &Value) -> Result<Ordering, CompareError> {
        let (ra, rb) = (kind_rank(a), kind_rank(b));
        if ra != rb {
            return Ok(ra.cmp(&rb));
        }
        match (a, b) {
            (Value::Null, Value::Null) | (Value::Bool(_), Value::Bool(_)) => Ok(Ordering::Equal),
            (Value::Number(_), Value::Number(_)) => compare_numbers(a, b),
            (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
            (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
            (Value::Object(x), Value::Object(y)) => compare_objects(x, y),
            _ => unreachable!("same kind rank implies same match arm"),
        }
    }
}

fn compare_arrays(x: &[Value], y: &[Value]) -> Result<Ordering, CompareError> {
    for (xi, yi) in x.iter().zip(y.iter()) {
        let ord = JsonElementComparer::compare(xi, yi)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(x.len().cmp(&y.len()))
}

fn compare_objects(x: &[(String, Value)], y: &[(String, Value)]) -> Result<Ordering, CompareError> {
    let mut xs: Vec<&(String, Value)> = x.iter().collect();
    let mut ys: Vec<&(String, Value)> = y.iter().collect();
    xs.sort_by(|a, b| a.0.cmp(&b.0));
    ys.sort_by(|a, b| a.0.cmp(&b.0));
    for (a, b) in xs.iter().zip(ys.iter()) {
        match a.0.cmp(&b.0) {
            Ordering::Equal => {}
            other => return Ok(other),
        }
        let ord = JsonElementComparer::compare(&a.1, &b.1)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(xs.len().cmp(&ys.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;

    #[test]
    fn kind_ordering() {
        assert_eq!(
            JsonElementComparer::compare(&json!({}), &json!([])).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            JsonElementComparer::compare(&json!(1), &json!(true)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            JsonElementComparer::compare(&json!(true), &json!(false)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            JsonElementComparer::compare(&json!(false), &json!(null)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn comparator_is_antisymmetric_and_reflexive() {
        let a = json!({"x": 1, "y": [1, 2]});
        let b = json!({"y": [1, 2], "x": 1});
        assert_eq!(JsonElementComparer::compare(&a, &b).unwrap(), Ordering::Equal);
        assert!(values_equal(&a, &b).unwrap());

        let c = json!([1, 2, 3]);
        let d = json!([1, 2]);
        assert_eq!(JsonElementComparer::compare(&c, &d).unwrap(), Ordering::Greater);
        assert_eq!(JsonElementComparer::compare(&d, &c).unwrap(), Ordering::Less);
    }

    #[test]
    fn duplicate_names_matched_by_count() {
        let a = json!({"x": 1, "x": 1});
        let b = json!({"x": 1});
        assert!(!values_equal(&a, &b).unwrap());
    }
}
