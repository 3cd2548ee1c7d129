//! Node path resolution
//!
//! Node paths address a value inside the form data tree: `user.address.city`,
//! `items.0.name` or `items[0].name`. The empty path is the document root.

use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Result, SchemaFormError};

/// Property name used for the document root, which has no containing property
pub const ROOT_PROP: &str = "__$$root";

/// Most `null` slots a single write may append to an array
pub const MAX_ARRAY_PADDING: usize = 1024;

// ============================================================================
// Property Path
// ============================================================================

/// Segment of a node path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property access: .fieldName
    Property(String),
    /// Array index access: [0] or .0
    Index(usize),
}

impl PathSegment {
    /// Key used when the segment lands on an object
    pub fn key(&self) -> String {
        match self {
            PathSegment::Property(name) => name.clone(),
            PathSegment::Index(idx) => idx.to_string(),
        }
    }

    fn from_token(token: &str) -> Self {
        match parse_index(token) {
            Some(idx) => PathSegment::Index(idx),
            None => PathSegment::Property(token.to_string()),
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            PathSegment::Index(_) => Value::Array(Vec::new()),
            PathSegment::Property(_) => Value::Object(Map::new()),
        }
    }
}

/// Canonical decimal only, so keys like "007" stay object keys
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse().ok()
}

/// Parsed node path
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn push_property(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Property(name.to_string()));
        new
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Dotted property path as the validation engine expects it: "items.0.name"
    pub fn to_prop(&self) -> String {
        self.segments
            .iter()
            .map(PathSegment::key)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Parse a node path; dots and brackets may be mixed
    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::from_token(&current));
                        current.clear();
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::from_token(&current));
                        current.clear();
                    }
                    let index_str: String = chars.by_ref().take_while(|&c| c != ']').collect();
                    let index_str = index_str.trim_matches(|c| c == '"' || c == '\'');
                    if !index_str.is_empty() {
                        segments.push(PathSegment::from_token(index_str));
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::from_token(&current));
        }

        Self { segments }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Path Resolver
// ============================================================================

/// True iff the path denotes the document root
pub fn is_root(path: &str) -> bool {
    PropertyPath::parse(path).is_root()
}

/// Property path for the validation engine; root callers use [`ROOT_PROP`]
pub fn to_validation_prop(path: &str) -> String {
    PropertyPath::parse(path).to_prop()
}

/// Value at `path`, `None` when any level is missing
pub fn get_path_val<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    PropertyPath::parse(path)
        .segments()
        .try_fold(tree, |cur, seg| match (cur, seg) {
            (Value::Object(map), seg) => map.get(&seg.key()),
            (Value::Array(items), PathSegment::Index(idx)) => items.get(*idx),
            _ => None,
        })
}

/// Write `value` at `path`, creating intermediate containers on the way.
///
/// `None` removes an object key; inside an array it leaves `null` since arrays
/// cannot hold holes. Writing the root is a no-op. An index more than
/// [`MAX_ARRAY_PADDING`] past the end of its array is a `PathConflict`.
pub fn set_path_val(tree: &mut Value, path: &str, value: Option<Value>) -> Result<()> {
    let parsed = PropertyPath::parse(path);
    let Some((last, parents)) = parsed.segments.split_last() else {
        return Ok(());
    };

    let mut cur = tree;
    for (i, seg) in parents.iter().enumerate() {
        let next = parents.get(i + 1).unwrap_or(last);
        cur = descend(cur, seg, next, &parsed)?;
    }
    assign(cur, last, value, &parsed)
}

fn descend<'a>(
    cur: &'a mut Value,
    seg: &PathSegment,
    next: &PathSegment,
    path: &PropertyPath,
) -> Result<&'a mut Value> {
    let slot = slot_mut(cur, seg, path)?;
    if slot.is_null() {
        *slot = next.empty_container();
    }
    if matches!(slot, Value::Object(_) | Value::Array(_)) {
        Ok(slot)
    } else {
        Err(conflict(path, next, slot))
    }
}

fn slot_mut<'a>(cur: &'a mut Value, seg: &PathSegment, path: &PropertyPath) -> Result<&'a mut Value> {
    if cur.is_null() {
        *cur = seg.empty_container();
    }
    match (cur, seg) {
        (Value::Object(map), seg) => Ok(map.entry(seg.key()).or_insert(Value::Null)),
        (Value::Array(items), PathSegment::Index(idx)) => {
            pad_to(items, *idx, path, seg)?;
            Ok(&mut items[*idx])
        }
        (other, seg) => Err(conflict(path, seg, other)),
    }
}

fn assign(cur: &mut Value, seg: &PathSegment, value: Option<Value>, path: &PropertyPath) -> Result<()> {
    if cur.is_null() {
        *cur = seg.empty_container();
    }
    match (cur, seg, value) {
        (Value::Object(map), seg, Some(value)) => {
            map.insert(seg.key(), value);
        }
        (Value::Object(map), seg, None) => {
            map.remove(&seg.key());
        }
        (Value::Array(items), PathSegment::Index(idx), Some(value)) => {
            pad_to(items, *idx, path, seg)?;
            items[*idx] = value;
        }
        (Value::Array(items), PathSegment::Index(idx), None) => {
            if let Some(slot) = items.get_mut(*idx) {
                *slot = Value::Null;
            }
        }
        (other, seg, _) => return Err(conflict(path, seg, other)),
    }
    Ok(())
}

/// Grow `items` with `null` so `idx` is addressable. Writes may pad at most
/// [`MAX_ARRAY_PADDING`] slots past the current end.
fn pad_to(items: &mut Vec<Value>, idx: usize, path: &PropertyPath, seg: &PathSegment) -> Result<()> {
    if idx < items.len() {
        return Ok(());
    }
    match idx.checked_add(1) {
        Some(len) if len - items.len() <= MAX_ARRAY_PADDING => {
            items.resize(len, Value::Null);
            Ok(())
        }
        _ => Err(SchemaFormError::PathConflict {
            path: path.to_string(),
            segment: seg.key(),
            found: "short array",
        }),
    }
}

fn conflict(path: &PropertyPath, seg: &PathSegment, found: &Value) -> SchemaFormError {
    SchemaFormError::PathConflict {
        path: path.to_string(),
        segment: seg.key(),
        found: kind_name(found),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================
