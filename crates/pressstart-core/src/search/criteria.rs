//! Caller-supplied search filters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// A filter value.
///
/// Anything that is not a bool, integer or string is kept as `Unsupported`
/// so unrecognized keys can carry it harmlessly; a recognized key holding
/// one fails when the search is planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Unsupported(serde_json::Value),
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchValue::Bool(b) => write!(f, "{b}"),
            SearchValue::Int(n) => write!(f, "{n}"),
            SearchValue::Text(s) => write!(f, "{s:?}"),
            SearchValue::Unsupported(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for SearchValue {
    fn from(value: bool) -> Self {
        SearchValue::Bool(value)
    }
}

impl From<i64> for SearchValue {
    fn from(value: i64) -> Self {
        SearchValue::Int(value)
    }
}

impl From<i32> for SearchValue {
    fn from(value: i32) -> Self {
        SearchValue::Int(i64::from(value))
    }
}

impl From<&str> for SearchValue {
    fn from(value: &str) -> Self {
        SearchValue::Text(value.to_string())
    }
}

impl From<String> for SearchValue {
    fn from(value: String) -> Self {
        SearchValue::Text(value)
    }
}

/// An ordered set of `key -> value` filters.
///
/// A key mapped to `None` is treated exactly like a missing key. Key order is
/// kept for display only; plans always follow the entity's declared order.
///
/// ```rust
/// use pressstart_core::search::SearchCriteria;
///
/// let criteria = SearchCriteria::new()
///     .with("firstName", "al")
///     .with_null("lastName");
///
/// assert!(criteria.get("firstName").is_some());
/// assert!(criteria.get("lastName").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    entries: Vec<(String, Option<SearchValue>)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any earlier value for the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SearchValue>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    /// Sets `key` to an explicit null.
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.insert(key, None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<SearchValue>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The value for `key` if present and non-null.
    pub fn get(&self, key: &str) -> Option<&SearchValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds criteria from a JSON object such as `{"storeId": 2, "name": "Zelda"}`.
    ///
    /// `null` members become absent keys. Arrays, objects and non-integer
    /// numbers are kept as [`SearchValue::Unsupported`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::invalid_format("criteria", "expected a JSON object"))?;

        let mut criteria = SearchCriteria::new();
        for (key, value) in object {
            let value = match value {
                serde_json::Value::Null => None,
                serde_json::Value::Bool(b) => Some(SearchValue::Bool(*b)),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(n) => Some(SearchValue::Int(n)),
                    None => Some(SearchValue::Unsupported(value.clone())),
                },
                serde_json::Value::String(s) => Some(SearchValue::Text(s.clone())),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    Some(SearchValue::Unsupported(value.clone()))
                }
            };
            criteria.insert(key.clone(), value);
        }

        Ok(criteria)
    }
}

impl<K, V> FromIterator<(K, V)> for SearchCriteria
where
    K: Into<String>,
    V: Into<SearchValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SearchCriteria::new(), |criteria, (k, v)| criteria.with(k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_replaces_existing_key() {
        let criteria = SearchCriteria::new().with("storeId", 1).with("storeId", 4);
        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria.get("storeId"), Some(&SearchValue::Int(4)));
    }

    #[test]
    fn test_null_is_absent() {
        let criteria = SearchCriteria::new().with("id", 3).with_null("id");
        assert_eq!(criteria.get("id"), None);
        assert_eq!(criteria.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let criteria = SearchCriteria::from_json(&json!({
            "storeId": 2,
            "name": "Zelda",
            "signed": false,
            "itemType": null
        }))
        .unwrap();

        assert_eq!(criteria.get("storeId"), Some(&SearchValue::Int(2)));
        assert_eq!(criteria.get("name"), Some(&SearchValue::Text("Zelda".into())));
        assert_eq!(criteria.get("signed"), Some(&SearchValue::Bool(false)));
        assert_eq!(criteria.get("itemType"), None);
    }

    #[test]
    fn test_from_json_keeps_unsupported_values() {
        let criteria = SearchCriteria::from_json(&json!({
            "storeId": 2,
            "tags": ["retro"],
            "price": 9.99,
            "meta": {"a": 1}
        }))
        .unwrap();

        assert_eq!(criteria.len(), 4);
        assert_eq!(criteria.get("tags"), Some(&SearchValue::Unsupported(json!(["retro"]))));
        assert_eq!(criteria.get("price"), Some(&SearchValue::Unsupported(json!(9.99))));
        assert_eq!(criteria.get("price").map(ToString::to_string), Some("9.99".to_string()));

        assert!(SearchCriteria::from_json(&json!("Zelda")).is_err());
    }

    #[test]
    fn test_empty_string_is_a_value() {
        let criteria = SearchCriteria::new().with("name", "");
        assert_eq!(criteria.get("name"), Some(&SearchValue::Text(String::new())));
    }

    #[test]
    fn test_collect() {
        let criteria: SearchCriteria = vec![("email", "a"), ("firstName", "b")].into_iter().collect();
        assert_eq!(criteria.keys().collect::<Vec<_>>(), vec!["email", "firstName"]);
    }
}
