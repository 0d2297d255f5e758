//! A [JSON Patch (RFC 6902)](https://tools.ietf.org/html/rfc6902) and
//! [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901)
//! implementation for Rust, built on an owned value tree that, unlike
//! `serde_json::Value`, preserves duplicate object member names.
//!
//! On top of patch/pointer, this crate also provides a structural diff
//! engine (`diff` feature) that generates a patch between two documents,
//! a total-order/equality comparator for values, and a small JSONPath
//! evaluator (`jsonpath` feature).
//!
//! # Usage
//!
//! Add this to your *Cargo.toml*:
//! ```toml
//! [dependencies]
//! json-patch = "*"
//! ```
//!
//! # Examples
//!
//! Create and apply a JSON Patch:
//!
//! ```rust
//! use json_patch::{apply_patch, from_value, json};
//!
//! # pub fn main() {
//! let doc = json!([
//!     { "name": "Andrew" },
//!     { "name": "Maxim" }
//! ]);
//!
//! let p = from_value(json!([
//!   { "op": "test", "path": "/0/name", "value": "Andrew" },
//!   { "op": "add", "path": "/0/happy", "value": true }
//! ])).unwrap();
//!
//! let result = apply_patch(&doc, &p).unwrap();
//! assert_eq!(result, json!([
//!   { "name": "Andrew", "happy": true },
//!   { "name": "Maxim" }
//! ]));
//! # }
//! ```
//!
//! Diff two documents and apply the result:
//!
//! ```rust
//! # #[cfg(feature = "diff")]
//! # {
//! use json_patch::{apply_patch, diff, json, values_equal};
//!
//! let source = json!({"title": "Goodbye!"});
//! let target = json!({"title": "Hello!", "tags": ["example"]});
//! let patch = diff(&source, &target);
//! let result = apply_patch(&source, &patch).unwrap();
//! assert!(values_equal(&result, &target).unwrap());
//! # }
//! ```
#![warn(missing_docs)]

mod builder;
mod cmp;
#[macro_use]
mod macros;
mod patch;
mod pointer;
mod value;

#[cfg(feature = "diff")]
mod diff;

#[cfg(feature = "jsonpath")]
pub mod jsonpath;

pub use builder::{Builder, BuilderError, Kind};
pub use cmp::{CompareError, JsonElementComparer, values_equal};
pub use patch::{
    AddOperation, CopyOperation, MoveOperation, Patch, PatchError, PatchErrorKind, PatchOperation,
    RemoveOperation, ReplaceOperation, TestOperation, apply_patch, apply_patch_mut_unchecked, from_value,
};
pub use pointer::{Pointer, PointerError};
pub use value::{Number, Value};

#[cfg(feature = "diff")]
pub use diff::from_diff as diff;
