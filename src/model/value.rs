// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Field values stored on resource instances

use super::instance::ResourceInstance;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::fmt;
use std::slice;
use std::str::FromStr;

/// Primitive leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Decimal value
    Decimal(Decimal),
    /// Boolean value
    Boolean(bool),
}

impl Primitive {
    /// Name of the primitive type
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::String(_) => "String",
            Primitive::Integer(_) => "Integer",
            Primitive::Decimal(_) => "Decimal",
            Primitive::Boolean(_) => "Boolean",
        }
    }

    /// String content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer content, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Primitive::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Decimal content, if this is a decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Primitive::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Primitive::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Render back to JSON
    pub fn to_json(&self) -> JsonValue {
        match self {
            Primitive::String(s) => JsonValue::String(s.clone()),
            Primitive::Integer(i) => JsonValue::from(*i),
            // Decimals go through their text form so `0.25` stays `0.25`
            Primitive::Decimal(d) => serde_json::Number::from_str(&d.to_string())
                .map(JsonValue::Number)
                .unwrap_or_else(|_| JsonValue::String(d.to_string())),
            Primitive::Boolean(b) => JsonValue::Bool(*b),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::String(s) => f.write_str(s),
            Primitive::Integer(i) => write!(f, "{i}"),
            Primitive::Decimal(d) => write!(f, "{d}"),
            Primitive::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Raw reference value, kept exactly as it appeared in the document
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceValue {
    raw: JsonValue,
}

impl ReferenceValue {
    /// Wrap a raw value
    pub fn new(raw: JsonValue) -> Self {
        Self { raw }
    }

    /// Reference consisting of a bare identifier
    pub fn identifier_only(identifier: impl Into<String>) -> Self {
        Self::new(JsonValue::String(identifier.into()))
    }

    /// The raw value
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    /// Join key of the reference
    ///
    /// A bare string is its own key. Objects yield their `identifier` (either
    /// a string or an identifier object with a `value`), falling back to the
    /// literal `reference`.
    pub fn identifier(&self) -> Option<&str> {
        match &self.raw {
            JsonValue::String(s) => Some(s.as_str()),
            JsonValue::Object(map) => {
                let from_identifier = match map.get("identifier") {
                    Some(JsonValue::String(s)) => Some(s.as_str()),
                    Some(JsonValue::Object(identifier)) => {
                        identifier.get("value").and_then(JsonValue::as_str)
                    }
                    _ => None,
                };
                from_identifier.or_else(|| map.get("reference").and_then(JsonValue::as_str))
            }
            _ => None,
        }
    }

    /// Referenced resource type, when the reference names one
    pub fn target_type(&self) -> Option<&str> {
        match &self.raw {
            JsonValue::Object(map) => map.get("type").and_then(JsonValue::as_str).or_else(|| {
                map.get("reference")
                    .and_then(JsonValue::as_str)
                    .and_then(|reference| reference.split_once('/'))
                    .map(|(resource_type, _)| resource_type)
            }),
            _ => None,
        }
    }
}

/// Value of one populated field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit JSON `null` in the source document
    Null,
    /// Scalar primitive (also used for enumerated codes)
    Primitive(Primitive),
    /// Ordered primitives
    Primitives(Vec<Primitive>),
    /// Scalar nested instance
    Resource(Box<ResourceInstance>),
    /// Ordered nested instances
    Resources(Vec<ResourceInstance>),
    /// Scalar reference
    Reference(ReferenceValue),
    /// Ordered references
    References(Vec<ReferenceValue>),
}

impl FieldValue {
    /// Whether the value is null or an empty sequence
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements; scalars count as one
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Null => 0,
            FieldValue::Primitive(_) | FieldValue::Resource(_) | FieldValue::Reference(_) => 1,
            FieldValue::Primitives(items) => items.len(),
            FieldValue::Resources(items) => items.len(),
            FieldValue::References(items) => items.len(),
        }
    }

    /// Whether this is an explicit null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Primitive elements, a scalar being a one-element slice
    pub fn primitives(&self) -> &[Primitive] {
        match self {
            FieldValue::Primitive(value) => slice::from_ref(value),
            FieldValue::Primitives(items) => items,
            _ => &[],
        }
    }

    /// Nested instances, a scalar being a one-element slice
    pub fn resources(&self) -> &[ResourceInstance] {
        match self {
            FieldValue::Resource(value) => slice::from_ref(&**value),
            FieldValue::Resources(items) => items,
            _ => &[],
        }
    }

    /// Mutable access to nested instances
    pub fn resources_mut(&mut self) -> &mut [ResourceInstance] {
        match self {
            FieldValue::Resource(value) => slice::from_mut(&mut **value),
            FieldValue::Resources(items) => items,
            _ => &mut [],
        }
    }

    /// References, a scalar being a one-element slice
    pub fn references(&self) -> &[ReferenceValue] {
        match self {
            FieldValue::Reference(value) => slice::from_ref(value),
            FieldValue::References(items) => items,
            _ => &[],
        }
    }

    /// Render back to JSON
    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Null => JsonValue::Null,
            FieldValue::Primitive(value) => value.to_json(),
            FieldValue::Primitives(items) => items.iter().map(Primitive::to_json).collect(),
            FieldValue::Resource(value) => value.to_json(),
            FieldValue::Resources(items) => items.iter().map(ResourceInstance::to_json).collect(),
            FieldValue::Reference(value) => value.raw().clone(),
            FieldValue::References(items) => items.iter().map(|r| r.raw().clone()).collect(),
        }
    }
}

impl From<Primitive> for FieldValue {
    fn from(value: Primitive) -> Self {
        FieldValue::Primitive(value)
    }
}

impl From<ResourceInstance> for FieldValue {
    fn from(value: ResourceInstance) -> Self {
        FieldValue::Resource(Box::new(value))
    }
}

impl From<ReferenceValue> for FieldValue {
    fn from(value: ReferenceValue) -> Self {
        FieldValue::Reference(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_identifier_forms() {
        assert_eq!(
            ReferenceValue::identifier_only("X").identifier(),
            Some("X")
        );
        assert_eq!(
            ReferenceValue::new(json!({"type": "Patient", "identifier": "p-1"})).identifier(),
            Some("p-1")
        );
        assert_eq!(
            ReferenceValue::new(json!({"identifier": {"system": "urn:x", "value": "mrn-7"}}))
                .identifier(),
            Some("mrn-7")
        );
        assert_eq!(
            ReferenceValue::new(json!({"reference": "Patient/123"})).identifier(),
            Some("Patient/123")
        );
        assert_eq!(ReferenceValue::new(json!(42)).identifier(), None);
    }

    #[test]
    fn test_reference_target_type() {
        assert_eq!(
            ReferenceValue::new(json!({"reference": "Encounter/9"})).target_type(),
            Some("Encounter")
        );
        assert_eq!(
            ReferenceValue::new(json!({"type": "Practitioner", "identifier": "x"})).target_type(),
            Some("Practitioner")
        );
        assert_eq!(ReferenceValue::identifier_only("x").target_type(), None);
    }

    #[test]
    fn test_field_value_slices() {
        let scalar = FieldValue::Primitive(Primitive::String("right".into()));
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar.primitives()[0].as_str(), Some("right"));
        assert!(scalar.resources().is_empty());

        let empty = FieldValue::Resources(Vec::new());
        assert!(empty.is_empty());
        assert!(!empty.is_null());
        assert!(FieldValue::Null.is_empty());
    }

    #[test]
    fn test_decimal_renders_exactly() {
        let value = Primitive::Decimal(Decimal::from_str("0.25").unwrap());
        assert_eq!(value.to_json(), json!(0.25));
        assert_eq!(value.to_string(), "0.25");
    }
}
