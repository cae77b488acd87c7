//! A typed view over the free-form service sections of an event creation request.
//!
//! Service sections are arbitrarily nested JSON documents. Rather than poking at raw `serde_json::Value`s during
//! extraction, each section is converted once into a [`ServiceNode`] tree, and the extractor pattern-matches on the
//! handful of shapes that matter.
use serde_json::{Map, Value};

pub const MAIN_CATEGORY_KEY: &str = "mainCategoryId";
pub const SUB_CATEGORY_KEY: &str = "subCategoryId";
pub const LEAF_CATEGORY_KEY: &str = "leafCategoryId";
pub const VENDOR_FLAG_KEY: &str = "vendor";

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceNode {
    /// An object whose `vendor` flag is exactly `true`. The coordinator supplies this themselves, so nothing below it
    /// is matched.
    SelfServiced,
    /// An object naming both a main and a sub category. The ids are kept as raw JSON until they are coerced.
    Need { main: Value, sub: Value, leaf: Option<Value>, children: Vec<(String, ServiceNode)> },
    Container(Vec<(String, ServiceNode)>),
    List(Vec<ServiceNode>),
    /// Any scalar. Never produces a need.
    Value,
}

impl ServiceNode {
    /// Returns the child at `key` for object nodes.
    pub fn child(&self, key: &str) -> Option<&ServiceNode> {
        let children = match self {
            ServiceNode::Need { children, .. } | ServiceNode::Container(children) => children,
            _ => return None,
        };
        children.iter().find(|(k, _)| k == key).map(|(_, node)| node)
    }

    pub fn is_self_serviced(&self) -> bool {
        matches!(self, ServiceNode::SelfServiced)
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        if matches!(obj.get(VENDOR_FLAG_KEY), Some(Value::Bool(true))) {
            return ServiceNode::SelfServiced;
        }
        match (obj.get(MAIN_CATEGORY_KEY), obj.get(SUB_CATEGORY_KEY)) {
            (Some(main), Some(sub)) => {
                let leaf = obj.get(LEAF_CATEGORY_KEY).filter(|v| is_truthy(v)).cloned();
                let children = Self::children(obj, true);
                ServiceNode::Need { main: main.clone(), sub: sub.clone(), leaf, children }
            },
            _ => ServiceNode::Container(Self::children(obj, false)),
        }
    }

    fn children(obj: &Map<String, Value>, skip_ids: bool) -> Vec<(String, ServiceNode)> {
        obj.iter()
            .filter(|(k, _)| {
                !(skip_ids && matches!(k.as_str(), MAIN_CATEGORY_KEY | SUB_CATEGORY_KEY | LEAF_CATEGORY_KEY))
            })
            .map(|(k, v)| (k.clone(), ServiceNode::from(v)))
            .collect()
    }
}

impl From<&Value> for ServiceNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(obj) => ServiceNode::from_object(obj),
            Value::Array(items) => ServiceNode::List(items.iter().map(ServiceNode::from).collect()),
            _ => ServiceNode::Value,
        }
    }
}

/// Absent, `null`, `false`, `0` and `""` leaf ids all mean "no leaf category".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
