use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete value a dimension key can take.
///
/// Closed and totally ordered so that dimension vectors can be compared,
/// hashed and sorted without relying on any loosely-typed equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Text(s) => write!(f, "{}", s),
            DimensionValue::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for DimensionValue {
    fn from(s: &str) -> Self {
        DimensionValue::Text(s.to_owned())
    }
}

impl From<String> for DimensionValue {
    fn from(s: String) -> Self {
        DimensionValue::Text(s)
    }
}

impl From<i64> for DimensionValue {
    fn from(i: i64) -> Self {
        DimensionValue::Integer(i)
    }
}

impl From<i32> for DimensionValue {
    fn from(i: i32) -> Self {
        DimensionValue::Integer(i64::from(i))
    }
}

/// A dimension vector: one value per dimension key, e.g.
/// `{country: "US", device: "*"}`.
///
/// Keys are kept sorted, so the derived `Eq`/`Hash`/`Ord` double as the
/// canonical signature of the combination. A `Dimension` is never edited in
/// place; [`Dimension::with_value`] returns a new vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimension(BTreeMap<String, DimensionValue>);

impl Dimension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&DimensionValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DimensionValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if every entry of `filter` is present here with an equal value.
    pub fn contains_all(&self, filter: &Dimension) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.0.get(key) == Some(value))
    }

    /// Copy of this vector with `key` set to `value`.
    pub fn with_value(&self, key: &str, value: DimensionValue) -> Dimension {
        let mut next = self.0.clone();
        next.insert(key.to_owned(), value);
        Dimension(next)
    }

    /// Copy restricted to the given keys. Keys absent here are skipped.
    pub fn subset<'a, I>(&self, keys: I) -> Dimension
    where
        I: IntoIterator<Item = &'a String>,
    {
        Dimension(
            keys.into_iter()
                .filter_map(|k| self.0.get(k).map(|v| (k.clone(), v.clone())))
                .collect(),
        )
    }

    /// Human-readable `key=value;key=value` form, in key order.
    pub fn signature(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

impl<K, V> FromIterator<(K, V)> for Dimension
where
    K: Into<String>,
    V: Into<DimensionValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Dimension(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(pairs: &[(&str, &str)]) -> Dimension {
        pairs.iter().copied().collect()
    }

    #[test]
    fn signature_is_key_ordered() {
        let a = dim(&[("device", "mobile"), ("country", "US")]);
        let b = dim(&[("country", "US"), ("device", "mobile")]);
        assert_eq!(a.signature(), "country=US;device=mobile");
        assert_eq!(a, b);
    }

    #[test]
    fn with_value_leaves_original_untouched() {
        let base = dim(&[("country", "*"), ("device", "*")]);
        let next = base.with_value("country", "US".into());
        assert_eq!(base.get("country"), Some(&DimensionValue::from("*")));
        assert_eq!(next.get("country"), Some(&DimensionValue::from("US")));
        assert_eq!(next.get("device"), Some(&DimensionValue::from("*")));
    }

    #[test]
    fn contains_all_requires_matching_values() {
        let point = dim(&[("country", "US"), ("device", "web")]);
        assert!(point.contains_all(&dim(&[("country", "US")])));
        assert!(!point.contains_all(&dim(&[("country", "UK")])));
        assert!(!point.contains_all(&dim(&[("browser", "edge")])));
        assert!(point.contains_all(&Dimension::new()));
    }

    #[test]
    fn text_and_integer_values_differ() {
        let text: DimensionValue = "2020".into();
        let int: DimensionValue = 2020.into();
        assert_ne!(text, int);
        assert_eq!(text.to_string(), int.to_string());
    }

    #[test]
    fn deserializes_mixed_values() {
        let d: Dimension = serde_json::from_str(r#"{"country":"US","year":2020}"#).unwrap();
        assert_eq!(d.get("country"), Some(&DimensionValue::Text("US".into())));
        assert_eq!(d.get("year"), Some(&DimensionValue::Integer(2020)));
    }

    #[test]
    fn subset_skips_missing_keys() {
        let d = dim(&[("country", "US"), ("device", "web")]);
        let keys = vec!["country".to_string(), "browser".to_string()];
        assert_eq!(d.subset(&keys), dim(&[("country", "US")]));
    }
}
