//! Custom field values.
//!
//! amoCRM returns `custom_fields_values` as a list of fields, each holding a
//! `values` list whose items are usually `{"value": ..., "enum_id": ...}`
//! objects. The value itself may be text, a number, a boolean or something
//! nested, so it decodes into [`FieldValue`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Any JSON value a custom field may hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Scalar rendered as text. `None` for null, lists and objects.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null | FieldValue::List(_) | FieldValue::Object(_) => None,
        }
    }

    /// First item of a `values` list, unwrapped from its `{"value": ...}`
    /// object when it has one.
    fn first_item(&self) -> Option<&FieldValue> {
        let first = match self {
            FieldValue::List(items) => items.first()?,
            _ => return None,
        };

        let value = match first {
            FieldValue::Object(map) => map.get("value")?,
            scalar => scalar,
        };

        (!value.is_null()).then_some(value)
    }
}

/// One entry of `custom_fields_values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub values: FieldValue,
}

impl CustomField {
    /// A field addressed by id with a single scalar value.
    pub fn with_value(field_id: u64, value: FieldValue) -> Self {
        let mut item = BTreeMap::new();
        item.insert("value".to_string(), value);
        Self {
            field_id: Some(field_id),
            values: FieldValue::List(vec![FieldValue::Object(item)]),
            ..Default::default()
        }
    }

    /// The field's first value. Later values of multi-value fields are
    /// ignored.
    pub fn first_value(&self) -> Option<&FieldValue> {
        self.values.first_item()
    }
}

/// First value of the field named `field_name`; `None` when the field is
/// missing or has no value.
pub fn find_value<'a>(fields: &'a [CustomField], field_name: &str) -> Option<&'a FieldValue> {
    fields
        .iter()
        .find(|f| f.field_name.as_deref() == Some(field_name))
        .and_then(CustomField::first_value)
}

/// Like [`find_value`], rendered as text.
pub fn find_text(fields: &[CustomField], field_name: &str) -> Option<String> {
    find_value(fields, field_name).and_then(FieldValue::to_text)
}
