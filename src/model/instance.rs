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

//! Hydrated resource instances

use super::value::{FieldValue, Primitive, ReferenceValue};
use crate::schema::ResourceType;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// In-memory value of one resource type
///
/// Fields absent from the map are unset. An explicit JSON `null` is kept as
/// [`FieldValue::Null`] and an explicit `[]` as an empty sequence, so the
/// three states stay distinguishable. Accessors for sequences return an empty
/// slice for unset fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    type_name: Arc<str>,
    object_id: Option<String>,
    fields: IndexMap<Arc<str>, FieldValue>,
}

impl ResourceInstance {
    /// Create an instance with no fields set
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            object_id: None,
            fields: IndexMap::new(),
        }
    }

    /// Default constructor: an empty instance carrying the type's discriminator
    pub fn empty_of(schema: &ResourceType) -> Self {
        let mut instance = Self::new(Arc::clone(schema.name_arc()));
        if let Some(tag) = schema.discriminator() {
            instance.set(
                Arc::clone(&tag.key),
                Primitive::String(tag.value.to_string()).into(),
            );
        }
        instance
    }

    /// Builder-style object id assignment
    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    /// Builder-style field assignment
    pub fn with_field(mut self, name: impl Into<Arc<str>>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Process-local join key, if assigned
    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    /// Replace (or clear) the object id
    pub fn set_object_id(&mut self, object_id: Option<String>) {
        self.object_id = object_id;
    }

    /// Raw field lookup
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Mutable field lookup
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    /// Assign a field, returning the previous value
    pub fn set(&mut self, name: impl Into<Arc<str>>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// Unset a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.shift_remove(name)
    }

    /// Whether the field is present at all (including explicit null)
    pub fn is_set(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Whether the field holds at least one value
    pub fn is_populated(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|value| !value.is_empty())
    }

    /// Populated fields in assignment order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (&**name, value))
    }

    /// Number of set fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Primitive elements of a field; empty when unset
    pub fn primitives(&self, name: &str) -> &[Primitive] {
        self.get(name).map(FieldValue::primitives).unwrap_or(&[])
    }

    /// First string element of a field
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.primitives(name).first().and_then(Primitive::as_str)
    }

    /// First integer element of a field
    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.primitives(name).first().and_then(Primitive::as_integer)
    }

    /// First decimal element of a field
    pub fn get_decimal(&self, name: &str) -> Option<Decimal> {
        self.primitives(name).first().and_then(Primitive::as_decimal)
    }

    /// First boolean element of a field
    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        self.primitives(name).first().and_then(Primitive::as_boolean)
    }

    /// Nested instances of a field; empty when unset
    pub fn resources(&self, name: &str) -> &[ResourceInstance] {
        self.get(name).map(FieldValue::resources).unwrap_or(&[])
    }

    /// First nested instance of a field
    pub fn resource(&self, name: &str) -> Option<&ResourceInstance> {
        self.resources(name).first()
    }

    /// References of a field; empty when unset
    pub fn references(&self, name: &str) -> &[ReferenceValue] {
        self.get(name).map(FieldValue::references).unwrap_or(&[])
    }

    /// First reference of a field
    pub fn reference(&self, name: &str) -> Option<&ReferenceValue> {
        self.references(name).first()
    }

    /// Direct children, in field order then element order
    pub fn children(&self) -> impl Iterator<Item = &ResourceInstance> {
        self.fields.values().flat_map(FieldValue::resources)
    }

    /// This instance and every nested instance, depth-first pre-order
    pub fn iter_tree(&self) -> TreeIter<'_> {
        TreeIter { stack: vec![self] }
    }

    /// Render back to JSON: set fields plus `object_id`
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::with_capacity(self.fields.len() + 1);
        for (name, value) in &self.fields {
            map.insert(name.to_string(), value.to_json());
        }
        if let Some(object_id) = &self.object_id {
            map.insert("object_id".to_string(), JsonValue::String(object_id.clone()));
        }
        JsonValue::Object(map)
    }
}

/// Pre-order iterator over an instance tree
pub struct TreeIter<'a> {
    stack: Vec<&'a ResourceInstance>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a ResourceInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let children: Vec<_> = current.children().collect();
        self.stack.extend(children.into_iter().rev());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use serde_json::json;

    fn dispense(id: &str, eye: &str) -> ResourceInstance {
        ResourceInstance::new("VisionPrescription_Dispense")
            .with_object_id(id)
            .with_field("eye", Primitive::String(eye.into()))
    }

    #[test]
    fn test_empty_of_writes_discriminator() {
        let schema = ResourceType::new("VisionPrescription")
            .with_discriminator()
            .field(FieldSchema::string("status"));
        let instance = ResourceInstance::empty_of(&schema);
        assert_eq!(instance.type_name(), "VisionPrescription");
        assert_eq!(instance.get_str("resourceType"), Some("VisionPrescription"));
        assert!(!instance.is_set("status"));
        assert!(instance.object_id().is_none());
    }

    #[test]
    fn test_unset_vs_null_vs_empty() {
        let instance = ResourceInstance::new("GraphDefinition")
            .with_field("publisher", FieldValue::Null)
            .with_field("link", FieldValue::Resources(Vec::new()));

        assert!(instance.is_set("publisher"));
        assert!(!instance.is_populated("publisher"));
        assert!(instance.is_set("link"));
        assert!(instance.resources("link").is_empty());
        assert!(!instance.is_set("contact"));
        assert!(instance.resources("contact").is_empty());
    }

    #[test]
    fn test_iter_tree_is_pre_order() {
        let root = ResourceInstance::new("VisionPrescription")
            .with_object_id("root")
            .with_field(
                "dispense",
                FieldValue::Resources(vec![dispense("d1", "right"), dispense("d2", "left")]),
            );

        let ids: Vec<_> = root.iter_tree().filter_map(|i| i.object_id()).collect();
        assert_eq!(ids, ["root", "d1", "d2"]);
    }

    #[test]
    fn test_to_json_renders_fields_and_id() {
        let instance = dispense("d1", "RIGHT");
        assert_eq!(
            instance.to_json(),
            json!({"eye": "RIGHT", "object_id": "d1"})
        );
    }

    #[test]
    fn test_direct_reassignment() {
        let mut instance = dispense("d1", "right");
        let previous = instance.set("eye", Primitive::String("left".into()).into());
        assert_eq!(previous, Some(FieldValue::Primitive(Primitive::String("right".into()))));
        assert_eq!(instance.get_str("eye"), Some("left"));
        instance.remove("eye");
        assert!(!instance.is_set("eye"));
    }
}
