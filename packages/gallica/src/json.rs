//! Typed access into untyped JSON trees.
//!
//! The manifest is decoded into a `serde_json::Value` first because the shape
//! of several fields depends on sibling values. [`JsonNode`] pairs a value
//! with its path so every failed access reports where it happened.

use serde_json::{Map, Value};

use crate::error::{GallicaError, Result};

/// A borrowed JSON value together with its path from the document root.
#[derive(Debug, Clone)]
pub struct JsonNode<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> JsonNode<'a> {
    /// Wrap the root of a document.
    #[must_use]
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: "$".to_string(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a required member of an object.
    ///
    /// # Examples
    /// ```
    /// use gallica_client::json::JsonNode;
    ///
    /// let value = serde_json::json!({"label": "EI-13 (1314)"});
    /// let root = JsonNode::root(&value);
    /// assert_eq!(root.field("label").unwrap().as_str().unwrap(), "EI-13 (1314)");
    /// assert!(root.field("missing").is_err());
    /// ```
    pub fn field(&self, key: &str) -> Result<JsonNode<'a>> {
        self.opt_field(key)?
            .ok_or_else(|| GallicaError::MissingField {
                path: self.child_path(key),
            })
    }

    /// Get an optional member of an object. `null` counts as absent.
    pub fn opt_field(&self, key: &str) -> Result<Option<JsonNode<'a>>> {
        let object = self.as_object()?;
        Ok(object
            .get(key)
            .filter(|v| !v.is_null())
            .map(|value| JsonNode {
                value,
                path: self.child_path(key),
            }))
    }

    pub fn as_str(&self) -> Result<&'a str> {
        self.value.as_str().ok_or_else(|| self.unexpected("string"))
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.value.as_f64().ok_or_else(|| self.unexpected("number"))
    }

    pub fn as_object(&self) -> Result<&'a Map<String, Value>> {
        self.value.as_object().ok_or_else(|| self.unexpected("object"))
    }

    pub fn as_array(&self) -> Result<&'a Vec<Value>> {
        self.value.as_array().ok_or_else(|| self.unexpected("array"))
    }

    /// Iterate over the elements of an array, in document order.
    pub fn elements(&self) -> Result<impl Iterator<Item = JsonNode<'a>> + '_> {
        let array = self.as_array()?;
        Ok(array.iter().enumerate().map(move |(i, value)| JsonNode {
            value,
            path: format!("{}[{i}]", self.path),
        }))
    }

    /// Iterate over the members of an object, in document order.
    pub fn members(&self) -> Result<impl Iterator<Item = (&'a str, JsonNode<'a>)> + '_> {
        let object = self.as_object()?;
        Ok(object.iter().map(move |(key, value)| {
            (
                key.as_str(),
                JsonNode {
                    value,
                    path: self.child_path(key),
                },
            )
        }))
    }

    /// Get a required string member that must not be empty.
    pub fn non_empty_str(&self, key: &str) -> Result<&'a str> {
        let node = self.field(key)?;
        let text = node.as_str()?;
        if text.is_empty() {
            return Err(GallicaError::InvalidValue {
                path: node.path,
                message: "must not be empty".to_string(),
            });
        }
        Ok(text)
    }

    fn child_path(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    fn unexpected(&self, expected: &'static str) -> GallicaError {
        GallicaError::UnexpectedShape {
            path: self.path.clone(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_field_paths_in_errors() {
        let value = json!({"sequences": [{"canvases": [{"height": "tall"}]}]});
        let root = JsonNode::root(&value);
        let canvas = root
            .field("sequences")
            .unwrap()
            .elements()
            .unwrap()
            .next()
            .unwrap()
            .field("canvases")
            .unwrap()
            .elements()
            .unwrap()
            .next()
            .unwrap();

        let err = canvas.field("height").unwrap().as_f64().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(
            err.to_string(),
            "Unexpected value at $.sequences[0].canvases[0].height: expected number"
        );

        let err = canvas.field("width").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required field: $.sequences[0].canvases[0].width"
        );
    }

    #[test]
    fn test_opt_field_null_is_absent() {
        let value = json!({"description": null, "label": "x"});
        let root = JsonNode::root(&value);
        assert!(root.opt_field("description").unwrap().is_none());
        assert!(root.opt_field("label").unwrap().is_some());
        assert!(root.opt_field("nope").unwrap().is_none());
    }

    #[test]
    fn test_field_on_non_object() {
        let value = json!(["a"]);
        let err = JsonNode::root(&value).field("a").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected value at $: expected object");
    }

    #[test]
    fn test_members_keep_document_order() {
        let value: Value = serde_json::from_str(r#"{"z": "1", "a": "2", "m": "3"}"#).unwrap();
        let root = JsonNode::root(&value);
        let keys: Vec<_> = root.members().unwrap().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_empty_str() {
        let value = json!({"@id": "", "label": "x"});
        let root = JsonNode::root(&value);
        let err = root.non_empty_str("@id").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value at $.@id: must not be empty");
        assert_eq!(root.non_empty_str("label").unwrap(), "x");
    }
}
