//! Conversions between [`Document`] and `serde_json::Value`.
use crate::node::{Content, Document, Node, NodeId};
use crate::scalar::Scalar;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

impl From<&Value> for Document {
    fn from(value: &Value) -> Self {
        let mut doc = Document::unrooted();
        doc.root = build(&mut doc, value);
        doc
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::from(&value)
    }
}

impl From<&Document> for Value {
    fn from(doc: &Document) -> Self {
        doc.root().to_serde_value()
    }
}

fn number_scalar(number: &Number) -> Scalar {
    match number.as_i64() {
        Some(i) => i32::try_from(i).map(Scalar::Integer).unwrap_or(Scalar::Long(i)),
        // u64 above i64::MAX and reals
        None => Scalar::from_real(number.as_f64().unwrap_or(f64::NAN)),
    }
}

fn build(doc: &mut Document, value: &Value) -> NodeId {
    match value {
        Value::Null => doc.alloc(Content::Value(Scalar::Null)),
        Value::Bool(b) => doc.alloc(Content::Value(Scalar::Boolean(*b))),
        Value::Number(n) => doc.alloc(Content::Value(number_scalar(n))),
        Value::String(s) => doc.alloc(Content::Value(Scalar::String(s.clone()))),
        Value::Array(items) => {
            let children: Vec<NodeId> = items.iter().map(|item| build(doc, item)).collect();
            let id = doc.alloc(Content::Array(children.clone()));
            for child in children {
                doc.nodes[child.0].parent = Some(id);
            }
            id
        }
        Value::Object(members) => {
            let mut fields = IndexMap::with_capacity(members.len());
            for (name, member) in members {
                let child = build(doc, member);
                doc.nodes[child.0].name = Some(name.clone());
                fields.insert(name.clone(), child);
            }
            let children: Vec<NodeId> = fields.values().copied().collect();
            let id = doc.alloc(Content::Object(fields));
            for child in children {
                doc.nodes[child.0].parent = Some(id);
            }
            id
        }
    }
}

impl Node<'_> {
    pub fn to_serde_value(&self) -> Value {
        match self.scalar() {
            Some(Scalar::String(s)) => Value::String(s.clone()),
            Some(Scalar::Integer(i)) => Value::from(*i),
            Some(Scalar::Long(l)) => Value::from(*l),
            // Widen through the shortest text so 0.1f32 becomes 0.1, not 0.10000000149.
            Some(Scalar::Float(f)) => f
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
            Some(Scalar::Double(d)) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
            Some(Scalar::Boolean(b)) => Value::Bool(*b),
            Some(Scalar::Null) => Value::Null,
            None if self.is_array() => Value::Array(self.children().map(|c| c.to_serde_value()).collect()),
            None => {
                let members: Map<String, Value> = self
                    .fields()
                    .map(|(name, child)| (name.to_string(), child.to_serde_value()))
                    .collect();
                Value::Object(members)
            }
        }
    }
}
