use log::trace;
use serde_json::Value;
use std::fmt;

/// A dotted descriptor such as `file.url.full` or `0.url`.
///
/// How a segment is used depends on the container it is applied to:
/// arrays take it as an index, objects as a key. `"0"` against an object
/// looks up the key `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPath {
    segments: Vec<String>,
}

impl UrlPath {
    pub fn new(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walks `root` segment by segment. `None` as soon as a segment cannot
    /// be applied to the current value.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;

        for segment in &self.segments {
            current = match current {
                Value::Array(items) => {
                    let index = segment.parse::<usize>().ok()?;
                    items.get(index)?
                }
                Value::Object(map) => map.get(segment.as_str())?,
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    trace!("Path segment '{}' applied to a scalar", segment);
                    return None;
                }
            };
        }

        Some(current)
    }

    /// Like [`resolve`](Self::resolve) but only accepts a string at the end.
    pub fn resolve_str<'a>(&self, root: &'a Value) -> Option<&'a str> {
        self.resolve(root).and_then(Value::as_str)
    }
}

impl fmt::Display for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn index_then_key() {
        let value = json!([{ "url": "http://x" }]);
        assert_eq!(UrlPath::new("0.url").resolve_str(&value), Some("http://x"));
    }

    #[test]
    fn nested_keys() {
        let value = json!({ "file": { "url": { "full": "http://y" } } });
        assert_eq!(
            UrlPath::new("file.url.full").resolve_str(&value),
            Some("http://y")
        );
    }

    #[test]
    fn index_out_of_bounds() {
        let value = json!(["a", "b"]);
        assert_eq!(UrlPath::new("5").resolve(&value), None);
    }

    #[test]
    fn numeric_segment_on_object_is_a_key() {
        let value = json!({ "0": { "url": "http://z" } });
        assert_eq!(UrlPath::new("0.url").resolve_str(&value), Some("http://z"));
    }

    #[test]
    fn text_segment_on_array_fails() {
        let value = json!([{ "url": "http://x" }]);
        assert_eq!(UrlPath::new("url").resolve(&value), None);
        assert_eq!(UrlPath::new("-1").resolve(&value), None);
    }

    #[test]
    fn segments_past_a_scalar_fail() {
        let value = json!({ "url": "http://x" });
        assert_eq!(UrlPath::new("url.full").resolve(&value), None);

        let value = json!({ "url": null });
        assert_eq!(UrlPath::new("url.full").resolve(&value), None);
    }

    #[test]
    fn non_string_terminal() {
        let value = json!({ "url": { "full": 42 } });
        let path = UrlPath::new("url.full");
        assert_eq!(path.resolve(&value), Some(&json!(42)));
        assert_eq!(path.resolve_str(&value), None);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(UrlPath::new("file.url.full").to_string(), "file.url.full");
    }
}
