//! Query string serialization
//!
//! Flattens pagination, search filters and ad hoc key/value pairs into an
//! `application/x-www-form-urlencoded` query string.
//!
//! Rules applied while flattening:
//!
//! - undefined entries (`None` in a [`QueryMap`]) and `Null` values are omitted
//! - lists repeat their key once per element, in order
//! - a [`SortDirective`] becomes a single `key=field order` pair
//! - a nested [`QueryMap`] is merged into the top level using its own keys;
//!   the key it was stored under is discarded
//!
//! The last rule means a `sort` entry inside an unrelated nested map ends up
//! as a top-level `sort` parameter. Callers relying on namespaced keys must
//! not nest maps.

use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SdkError::query(format!("invalid sort order '{other}'"))),
        }
    }
}

/// A `(field, direction)` pair controlling list ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDirective {
    /// Field to sort by, e.g. `created_at`
    pub field: String,
    /// Direction
    pub order: SortOrder,
}

impl SortDirective {
    /// Sort by `field` in the given direction
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Ascending sort by `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Descending sort by `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.order)
    }
}

/// A value that can appear in a query string
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// String scalar
    String(String),
    /// Integer scalar
    Integer(i64),
    /// Floating point scalar
    Float(f64),
    /// Boolean scalar, rendered as `true`/`false`
    Bool(bool),
    /// Explicit null; always omitted
    Null,
    /// Repeated values under one key
    List(Vec<QueryValue>),
    /// Sort directive, rendered as `field order`
    Sort(SortDirective),
    /// Nested map, merged into the top level
    Map(QueryMap),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<SortDirective> for QueryValue {
    fn from(value: SortDirective) -> Self {
        Self::Sort(value)
    }
}

impl From<QueryMap> for QueryValue {
    fn from(value: QueryMap) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl QueryValue {
    /// Convert a JSON value, recognizing `{"field", "order"}` objects as sort directives
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if n.is_f64() {
                    n.as_f64().map_or(Self::Null, Self::Float)
                } else {
                    // u64 beyond i64::MAX
                    Self::String(n.to_string())
                }
            }
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Value::Object(object) => {
                if let Some(sort) = sort_directive_shape(&object) {
                    return Self::Sort(sort);
                }
                let mut map = QueryMap::new();
                for (key, value) in object {
                    map.insert(key, Self::from_json(value));
                }
                Self::Map(map)
            }
        }
    }
}

fn sort_directive_shape(object: &serde_json::Map<String, Value>) -> Option<SortDirective> {
    if object.len() != 2 {
        return None;
    }
    let field = object.get("field")?.as_str()?;
    let order = object.get("order")?.as_str()?.parse().ok()?;
    Some(SortDirective::new(field, order))
}

/// Insertion-ordered map of query entries
///
/// An entry whose value is `None` is "undefined" and is never serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMap {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a defined value, replacing any previous value under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        self.put(key.into(), Some(value.into()))
    }

    /// Insert an optional value; `None` marks the key as undefined
    pub fn set<V: Into<QueryValue>>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        self.put(key.into(), value.map(Into::into))
    }

    /// Mark `key` as undefined
    pub fn undefined(&mut self, key: impl Into<String>) -> &mut Self {
        self.put(key.into(), None)
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style optional insert
    #[must_use]
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.set(key, value);
        self
    }

    fn put(&mut self, key: String, value: Option<QueryValue>) -> &mut Self {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Look up a defined value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Number of entries, undefined ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&QueryValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Build a map from any serializable struct or map
    ///
    /// Field order is preserved. `None` fields become `Null` and are omitted
    /// when serialized. A value that does not serialize to an object (or
    /// `null`) has no key to live under and is rejected.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, SdkError> {
        let json = serde_json::to_value(value).map_err(SdkError::Serialize)?;
        match QueryValue::from_json(json) {
            QueryValue::Map(map) => Ok(map),
            QueryValue::Null => Ok(Self::new()),
            _ => Err(SdkError::query("key is not defined")),
        }
    }

    /// Serialize to a query string without the leading `?`
    pub fn to_query_string(&self) -> Result<String, SdkError> {
        let mut pairs = Vec::new();
        flatten_map(self, &mut pairs)?;
        Ok(encode(&pairs))
    }
}

/// Pagination parameters shared by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Return only `total_count`
    pub count_only: Option<bool>,
    /// Ordered sort directives
    pub sort: Vec<SortDirective>,
}

impl Pagination {
    /// Create empty pagination
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page number
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set page size
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Request only the count
    #[must_use]
    pub fn with_count_only(mut self, count_only: bool) -> Self {
        self.count_only = Some(count_only);
        self
    }

    /// Append a sort directive
    #[must_use]
    pub fn with_sort(mut self, directive: SortDirective) -> Self {
        self.sort.push(directive);
        self
    }
}

impl From<&Pagination> for QueryMap {
    fn from(pagination: &Pagination) -> Self {
        let mut map = Self::new();
        map.set("page", pagination.page)
            .set("limit", pagination.limit)
            .set("count_only", pagination.count_only);
        if !pagination.sort.is_empty() {
            map.insert("sort", pagination.sort.clone());
        }
        map
    }
}

/// Full query for one request: search filters, pagination and extra pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// Resource-specific search filters
    pub search: Option<QueryMap>,
    /// Pagination and sorting
    pub pagination: Option<Pagination>,
    /// Ad hoc key/value pairs
    pub extra: Option<QueryMap>,
}

impl QuerySpec {
    /// Create an empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search filters
    #[must_use]
    pub fn with_search(mut self, search: QueryMap) -> Self {
        self.search = Some(search);
        self
    }

    /// Set search filters from a serializable struct
    pub fn with_search_params<T: Serialize + ?Sized>(self, search: &T) -> Result<Self, SdkError> {
        Ok(self.with_search(QueryMap::from_serialize(search)?))
    }

    /// Set pagination
    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Set extra pairs
    #[must_use]
    pub fn with_extra(mut self, extra: QueryMap) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Collapse into a single map; parts are flattened in search, pagination, extra order
    #[must_use]
    pub fn to_query_map(&self) -> QueryMap {
        let mut map = QueryMap::new();
        map.set("search", self.search.clone())
            .set("pagination", self.pagination.as_ref().map(QueryMap::from))
            .set("extra", self.extra.clone());
        map
    }

    /// Serialize to a query string without the leading `?`
    pub fn to_query_string(&self) -> Result<String, SdkError> {
        self.to_query_map().to_query_string()
    }
}

impl From<QueryMap> for QuerySpec {
    fn from(extra: QueryMap) -> Self {
        Self::new().with_extra(extra)
    }
}

impl From<Pagination> for QuerySpec {
    fn from(pagination: Pagination) -> Self {
        Self::new().with_pagination(pagination)
    }
}

/// Serialize an arbitrary query value
///
/// The root must be a map (or `Null`); any other root has no key context and
/// fails with a "key is not defined" error, which signals a programming error
/// in the caller.
pub fn serialize_query(value: &QueryValue) -> Result<String, SdkError> {
    let mut pairs = Vec::new();
    flatten_into(None, value, &mut pairs)?;
    Ok(encode(&pairs))
}

fn flatten_map(map: &QueryMap, out: &mut Vec<(String, String)>) -> Result<(), SdkError> {
    for (key, value) in map.iter() {
        if let Some(value) = value {
            flatten_into(Some(key), value, out)?;
        }
    }
    Ok(())
}

fn flatten_into(
    key: Option<&str>,
    value: &QueryValue,
    out: &mut Vec<(String, String)>,
) -> Result<(), SdkError> {
    let scalar = match value {
        QueryValue::Null => return Ok(()),
        QueryValue::Map(map) => return flatten_map(map, out),
        QueryValue::List(items) => {
            let key = require_key(key)?;
            for item in items {
                flatten_into(Some(key), item, out)?;
            }
            return Ok(());
        }
        QueryValue::String(s) => s.clone(),
        QueryValue::Integer(i) => i.to_string(),
        QueryValue::Float(f) => f.to_string(),
        QueryValue::Bool(b) => b.to_string(),
        QueryValue::Sort(directive) => directive.to_string(),
    };
    out.push((require_key(key)?.to_string(), scalar));
    Ok(())
}

fn require_key(key: Option<&str>) -> Result<&str, SdkError> {
    key.ok_or_else(|| SdkError::query("key is not defined"))
}

fn encode(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
