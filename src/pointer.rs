//! RFC 6901 JSON Pointer: parsing, escaping, and the three edit
//! primitives the [`crate::patch`] apply engine is built from.

use crate::builder::{Builder, BuilderError};

/// A parsed JSON Pointer: a sequence of unescaped tokens.
///
/// An empty token list denotes the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    /// The root pointer (`""`).
    pub fn root() -> Self {
        Pointer { tokens: Vec::new() }
    }

    /// Build a pointer directly from already-unescaped tokens.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Pointer { tokens }
    }

    /// Parse a pointer string per RFC 6901.
    ///
    /// `""` parses to the root. Any other string must start with `/`;
    /// tokens are unescaped by replacing `~1` with `/` and then `~0` with
    /// `~`, in that order (order matters: un-escaping `~0` first would
    /// turn an encoded `~1` into a literal `/` prematurely). A lone `~`
    /// not followed by `0` or `1` is passed through literally rather than
    /// rejected.
    pub fn parse(s: &str) -> Result<Self, PointerError> {
        if s.is_empty() {
            return Ok(Pointer::root());
        }
        if !s.starts_with('/') {
            return Err(PointerError::MustStartWithSlash);
        }
        let tokens = s[1..]
            .split('/')
            .map(|tok| tok.replace("~1", "/").replace("~0", "~"))
            .collect();
        Ok(Pointer { tokens })
    }

    /// The pointer's tokens, in order, unescaped.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this pointer addresses the document root.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Encode a single raw member name as a pointer token: `~` becomes
    /// `~0` and `/` becomes `~1`. Order matters here too: encoding `~`
    /// first would double-encode the tildes introduced by encoding `/`.
    pub fn escape(name: &str) -> String {
        name.replace('~', "~0").replace('/', "~1")
    }

    /// Render this pointer back to its RFC 6901 string form.
    pub fn to_string_repr(&self) -> String {
        let mut out = String::new();
        for tok in &self.tokens {
            out.push('/');
            out.push_str(&Pointer::escape(tok));
        }
        out
    }

    fn parent_tokens(&self) -> Result<(&[String], &str), PointerError> {
        self.tokens
            .split_last()
            .map(|(last, init)| (init, last.as_str()))
            .ok_or(PointerError::NoParent)
    }
}

/// Failure modes for pointer parsing and navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    /// A non-empty pointer string did not start with `/`.
    #[error("pointer must start with '/'")]
    MustStartWithSlash,
    /// The root pointer has no parent to edit relative to.
    #[error("pointer has no parent")]
    NoParent,
    /// Navigation failed: missing name, out-of-range/invalid index, or a
    /// scalar was addressed as a container.
    #[error("pointer does not resolve against the document")]
    NotFound,
}

fn descend<'a>(root: &'a Builder, tokens: &[String]) -> Result<&'a Builder, PointerError> {
    let mut current = root;
    for tok in tokens {
        current = match current {
            Builder::Object(_) => current.get_property(tok).map_err(|_| PointerError::NotFound)?,
            Builder::Array(items) => {
                let idx = canonical_index(tok, items.len()).ok_or(PointerError::NotFound)?;
                current.get_index(idx).map_err(|_| PointerError::NotFound)?
            }
            _ => return Err(PointerError::NotFound),
        };
    }
    Ok(current)
}

fn descend_mut<'a>(
    root: &'a mut Builder,
    tokens: &[String],
) -> Result<&'a mut Builder, PointerError> {
    let mut current = root;
    for tok in tokens {
        current = match current {
            Builder::Object(members) => {
                let pos = members
                    .iter()
                    .position(|(k, _)| k == tok)
                    .ok_or(PointerError::NotFound)?;
                &mut members[pos].1
            }
            Builder::Array(items) => {
                let idx = canonical_index(tok, items.len()).ok_or(PointerError::NotFound)?;
                &mut items[idx]
            }
            _ => return Err(PointerError::NotFound),
        };
    }
    Ok(current)
}

/// Parse `tok` as a canonical array index in `0..len`: no leading zeroes
/// except the literal `"0"`, and `"-"` is never a read index.
fn canonical_index(tok: &str, len: usize) -> Option<usize> {
    if tok == "-" || tok.is_empty() {
        return None;
    }
    if tok.starts_with('0') && tok.len() != 1 {
        return None;
    }
    if !tok.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let idx: usize = tok.parse().ok()?;
    if idx < len {
        Some(idx)
    } else {
        None
    }
}

/// Same as [`canonical_index`] but additionally accepts `idx == len`, for
/// insert-style operations where `len` means append.
fn canonical_insert_index(tok: &str, len: usize) -> Option<usize> {
    if tok.starts_with('0') && tok.len() != 1 {
        return None;
    }
    if tok.is_empty() || !tok.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let idx: usize = tok.parse().ok()?;
    if idx <= len {
        Some(idx)
    } else {
        None
    }
}

/// Read the value addressed by this pointer, or `None` if it does not resolve.
pub fn try_get<'a>(root: &'a Builder, pointer: &Pointer) -> Option<&'a Builder> {
    descend(root, &pointer.tokens).ok()
}

/// RFC 6902 "add" semantics for an already-existing parent: on an array,
/// insert (or append via `-`); on an object, only succeed if `name` is
/// not already present (the caller falls back to [`try_replace`]
/// otherwise, which is what gives "add" its insert-or-replace behavior).
pub fn try_add_if_absent(
    root: &mut Builder,
    pointer: &Pointer,
    value: Builder,
) -> Result<(), PointerError> {
    if pointer.is_root() {
        // An already-initialized root is "present"; defer to replace.
        return Err(PointerError::NotFound);
    }
    let (parent_tokens, last) = pointer.parent_tokens()?;
    let parent = descend_mut(root, parent_tokens)?;
    if parent.is_object() {
        if parent
            .as_object()
            .map_err(builder_err_to_pointer_err)?
            .iter()
            .any(|(k, _)| k == last)
        {
            return Err(PointerError::NotFound);
        }
        parent
            .add_property(last.to_owned(), value)
            .map_err(builder_err_to_pointer_err)
    } else if parent.is_array() {
        if last == "-" {
            return parent.add_array_item(value).map_err(builder_err_to_pointer_err);
        }
        let len = parent.as_array().map_err(builder_err_to_pointer_err)?.len();
        let idx = canonical_insert_index(last, len).ok_or(PointerError::NotFound)?;
        parent
            .insert_array_item(idx, value)
            .map_err(builder_err_to_pointer_err)
    } else {
        Err(PointerError::NotFound)
    }
}

/// Replace the value addressed by this pointer. The root pointer replaces
/// the whole builder. Array writes reject `"-"` (there is nothing to
/// replace past the end); object writes require the name to already exist.
pub fn try_replace(
    root: &mut Builder,
    pointer: &Pointer,
    value: Builder,
) -> Result<Builder, PointerError> {
    if pointer.is_root() {
        return Ok(std::mem::replace(root, value));
    }
    let (parent_tokens, last) = pointer.parent_tokens()?;
    let parent = descend_mut(root, parent_tokens)?;
    if parent.is_object() {
        parent
            .replace_property(last, value)
            .map_err(builder_err_to_pointer_err)
    } else if parent.is_array() {
        let len = parent.as_array().map_err(builder_err_to_pointer_err)?.len();
        let idx = canonical_index(last, len).ok_or(PointerError::NotFound)?;
        parent
            .replace_array_item(idx, value)
            .map_err(builder_err_to_pointer_err)
    } else {
        Err(PointerError::NotFound)
    }
}

/// Remove the value addressed by this pointer. The root pointer removes
/// the whole builder's subtree, replacing it with `null`. Array removal
/// rejects `"-"`.
pub fn try_remove(root: &mut Builder, pointer: &Pointer) -> Result<Builder, PointerError> {
    if pointer.is_root() {
        return Ok(std::mem::replace(root, Builder::Null));
    }
    let (parent_tokens, last) = pointer.parent_tokens()?;
    let parent = descend_mut(root, parent_tokens)?;
    if parent.is_object() {
        parent
            .remove_property(last)
            .map_err(builder_err_to_pointer_err)
    } else if parent.is_array() {
        let len = parent.as_array().map_err(builder_err_to_pointer_err)?.len();
        let idx = canonical_index(last, len).ok_or(PointerError::NotFound)?;
        parent
            .remove_array_item(idx)
            .map_err(builder_err_to_pointer_err)
    } else {
        Err(PointerError::NotFound)
    }
}

fn builder_err_to_pointer_err(_: BuilderError) -> PointerError {
    PointerError::NotFound
}
