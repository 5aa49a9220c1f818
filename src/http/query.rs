//! Query string parameters
//!
//! Multi-valued view of `?a=1&b=2&a=3`. Values keep their order within a
//! key; keys themselves are unordered.

use std::collections::HashMap;

/// Parsed query parameters of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Parse a raw query string (without the leading `?`)
    pub fn parse(query: Option<&str>) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        if let Some(query) = query {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                values
                    .entry(key.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
        }
        Self { values }
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values for `key`, in the order they appeared
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_values() {
        let params = QueryParams::parse(Some("a=1&b=two&a=3"));
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get_all("a"), ["1".to_string(), "3".to_string()]);
        assert_eq!(params.get("b"), Some("two"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_values_keep_order_within_key() {
        let params = QueryParams::parse(Some("id=3&x=0&id=1&id=2"));
        assert_eq!(params.get_all("id"), ["3", "1", "2"].map(String::from));
        let mut keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["id", "x"]);
    }

    #[test]
    fn test_parse_decodes_percent_and_plus() {
        let params = QueryParams::parse(Some("name=hello+world&q=%E4%BD%A0"));
        assert_eq!(params.get("name"), Some("hello world"));
        assert_eq!(params.get("q"), Some("你"));
    }

    #[test]
    fn test_missing_query() {
        let params = QueryParams::parse(None);
        assert!(params.is_empty());
        assert_eq!(params.get("a"), None);
        assert!(params.get_all("a").is_empty());
        assert!(!params.contains("a"));
    }

    #[test]
    fn test_key_without_value() {
        let params = QueryParams::parse(Some("flag&x="));
        assert!(params.contains("flag"));
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.get("x"), Some(""));
    }
}
