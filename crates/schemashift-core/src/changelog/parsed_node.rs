//! Format-neutral changelog tree.
//!
//! Changelog parsers (XML, YAML, JSON) produce a tree of [`ParsedNode`]s;
//! preconditions and change sets load themselves from it and serialize back
//! into it. JSON-shaped documents convert directly through [`ParsedNode::from_json`].

use crate::error::LoadError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One node of a parsed changelog.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    namespace: Option<String>,
    name: String,
    value: Option<Value>,
    children: Vec<ParsedNode>,
}

impl ParsedNode {
    /// Create an empty node.
    pub fn new(namespace: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Set the node value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: ParsedNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child holding a single value.
    pub fn with_child_value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_child(ParsedNode::new(None, name).with_value(value))
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: ParsedNode) {
        self.children.push(child);
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element namespace, if the format carries one.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Scalar value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Child nodes in document order.
    pub fn children(&self) -> &[ParsedNode] {
        &self.children
    }

    /// First child with the given name. A `None` namespace matches any namespace.
    pub fn child(&self, namespace: Option<&str>, name: &str) -> Option<&ParsedNode> {
        self.children.iter().find(|child| {
            child.name == name && (namespace.is_none() || child.namespace.as_deref() == namespace)
        })
    }

    /// Value of the named child converted to `T`, or `None` if the child or
    /// its value is absent.
    pub fn child_value<T: DeserializeOwned>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Option<T>, LoadError> {
        match self.child(namespace, name).and_then(|c| c.value.as_ref()) {
            Some(value) => convert(name, value).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`child_value`](Self::child_value) but absence is an error.
    pub fn required_child_value<T: DeserializeOwned>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<T, LoadError> {
        self.child_value(namespace, name)?
            .ok_or_else(|| LoadError::MissingValue(format!("{}.{}", self.name, name)))
    }

    /// The node's own value converted to `T`.
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<Option<T>, LoadError> {
        match &self.value {
            Some(value) => convert(&self.name, value).map(Some),
            None => Ok(None),
        }
    }

    /// Build a tree from a JSON-shaped document.
    ///
    /// Object keys become children. Arrays of single-key objects (the YAML
    /// list style) are flattened into the parent's children, keeping order.
    /// Scalars become node values.
    pub fn from_json(name: impl Into<String>, value: &Value) -> Self {
        let mut node = ParsedNode::new(None, name);
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    node.add_child(ParsedNode::from_json(key.clone(), child));
                }
            }
            Value::Array(items) if items.iter().all(Value::is_object) => {
                for item in items {
                    if let Value::Object(map) = item {
                        for (key, child) in map {
                            node.add_child(ParsedNode::from_json(key.clone(), child));
                        }
                    }
                }
            }
            other => node.value = Some(other.clone()),
        }
        node
    }

    /// Render the node's content as JSON.
    ///
    /// Children with unique names render as an object; repeated names fall
    /// back to a list of single-key objects so order and duplicates survive.
    pub fn to_json(&self) -> Value {
        if self.children.is_empty() {
            return self.value.clone().unwrap_or(Value::Null);
        }

        let mut names: Vec<&str> = self.children.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();

        if names.len() == self.children.len() {
            let map: Map<String, Value> = self
                .children
                .iter()
                .map(|c| (c.name.clone(), c.to_json()))
                .collect();
            Value::Object(map)
        } else {
            Value::Array(
                self.children
                    .iter()
                    .map(|c| {
                        let mut map = Map::new();
                        map.insert(c.name.clone(), c.to_json());
                        Value::Object(map)
                    })
                    .collect(),
            )
        }
    }
}

fn convert<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, LoadError> {
    // attribute values frequently arrive as text regardless of their type
    let retry = match value {
        Value::String(text) => serde_json::from_str(text).ok(),
        Value::Number(_) | Value::Bool(_) => {
            serde_json::from_value(Value::String(value.to_string())).ok()
        }
        _ => None,
    };

    serde_json::from_value(value.clone()).or_else(|e| {
        retry.ok_or_else(|| LoadError::InvalidValue {
            name: name.to_string(),
            message: e.to_string(),
        })
    })
}
