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

//! Document hydration
//!
//! The [`ResourceBinder`] walks a raw JSON tree against the schemas of a
//! [`TypeRegistry`] and builds [`ResourceInstance`] values. Dispatch is driven
//! entirely by field metadata: embedded fields name their target type, which
//! is resolved through the registry, never guessed from the value.
//!
//! Object ids are handed out by a [`HydrationSession`]. Every call to
//! [`ResourceBinder::hydrate`] opens a fresh session; documents that must not
//! share generated ids should go through one session.

pub mod path;

pub use path::FieldPath;

use crate::config::BinderConfig;
use crate::error::{ResourceError, Result};
use crate::model::type_coercion::describe;
use crate::model::{FieldValue, Primitive, ReferenceValue, ResourceInstance, TypeCoercion};
use crate::registry::TypeRegistry;
use crate::schema::{Cardinality, DISCRIMINATOR_KEY, FieldKind, FieldSchema, ResourceType};
use crate::validation::EnumValidator;
use rustc_hash::FxHashSet;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Generic hydration engine over a frozen registry
///
/// The binder holds no mutable state and can be shared between threads;
/// each thread hydrates its own documents.
#[derive(Debug, Clone)]
pub struct ResourceBinder {
    registry: Arc<TypeRegistry>,
    config: BinderConfig,
}

impl ResourceBinder {
    /// Create a binder with the default configuration
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, BinderConfig::default())
    }

    /// Create a binder with a custom configuration
    pub fn with_config(registry: Arc<TypeRegistry>, config: BinderConfig) -> Self {
        Self { registry, config }
    }

    /// Registry the binder resolves types through
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Shared handle to the registry
    pub fn registry_arc(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Open a session whose generated object ids are unique across its documents
    pub fn session(&self) -> HydrationSession<'_> {
        HydrationSession {
            binder: self,
            next_id: 0,
            generated: 0,
            used: FxHashSet::default(),
        }
    }

    /// Hydrate `raw` as an instance of `target_type`
    pub fn hydrate(&self, target_type: &str, raw: &JsonValue) -> Result<ResourceInstance> {
        self.session().hydrate(target_type, raw)
    }

    /// Hydrate a document whose root carries a `resourceType` discriminator
    pub fn hydrate_document(&self, raw: &JsonValue) -> Result<ResourceInstance> {
        self.session().hydrate_document(raw)
    }

    /// Hydrate several documents in one session
    ///
    /// Returns one result per document in input order. A failing document
    /// does not stop or alter the hydration of the others.
    pub fn hydrate_batch<'a, I>(&self, documents: I) -> Vec<Result<ResourceInstance>>
    where
        I: IntoIterator<Item = &'a JsonValue>,
    {
        let mut session = self.session();
        documents
            .into_iter()
            .enumerate()
            .map(|(index, document)| {
                session.hydrate_document(document).inspect_err(|err| {
                    log::warn!("Document {} of batch rejected: {}", index, err);
                })
            })
            .collect()
    }
}

/// One hydration pass; owns the object id counter
///
/// Every id seen by the session, supplied or generated, is remembered so
/// generated ids never repeat one already in use.
#[derive(Debug)]
pub struct HydrationSession<'b> {
    binder: &'b ResourceBinder,
    next_id: u64,
    generated: u64,
    used: FxHashSet<String>,
}

impl<'b> HydrationSession<'b> {
    /// Hydrate `raw` as an instance of `target_type`
    pub fn hydrate(&mut self, target_type: &str, raw: &JsonValue) -> Result<ResourceInstance> {
        let binder = self.binder;
        let schema = binder.registry.resolve(target_type)?;
        self.hydrate_root(schema, raw)
    }

    /// Hydrate a document, picking the type from its `resourceType` key
    pub fn hydrate_document(&mut self, raw: &JsonValue) -> Result<ResourceInstance> {
        let binder = self.binder;
        let tag = raw
            .get(DISCRIMINATOR_KEY)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ResourceError::missing_discriminator(DISCRIMINATOR_KEY))?;
        let schema = binder.registry.resolve_discriminator(tag)?;
        self.hydrate_root(schema, raw)
    }

    /// Number of object ids generated so far
    pub fn assigned(&self) -> u64 {
        self.generated
    }

    /// Whether `object_id` was supplied or generated earlier in this session
    pub fn is_used(&self, object_id: &str) -> bool {
        self.used.contains(object_id)
    }

    fn hydrate_root(&mut self, schema: &ResourceType, raw: &JsonValue) -> Result<ResourceInstance> {
        let mut path = FieldPath::root(Arc::clone(schema.name_arc()));
        let instance = self.bind_object(schema, raw, &mut path, 0)?;
        log::debug!(
            "Hydrated {} document ({} ids generated in session)",
            schema.name(),
            self.generated
        );
        Ok(instance)
    }

    fn bind_object(
        &mut self,
        schema: &ResourceType,
        raw: &JsonValue,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<ResourceInstance> {
        let binder = self.binder;
        let config = &binder.config;
        if depth > config.max_depth {
            return Err(ResourceError::depth_exceeded(
                path.to_string(),
                config.max_depth,
            ));
        }

        let object = raw
            .as_object()
            .ok_or_else(|| ResourceError::coercion(path.to_string(), schema.name(), describe(raw)))?;

        let mut instance = binder.registry.instantiate(schema.name())?;

        // Ids are assigned before fields so generated ids follow pre-order
        match object
            .get(config.object_id_key.as_str())
            .and_then(JsonValue::as_str)
        {
            Some(object_id) => {
                if !self.used.insert(object_id.to_string()) {
                    log::warn!(
                        "Object id '{}' at '{}' is already in use in this session",
                        object_id,
                        path
                    );
                }
                instance.set_object_id(Some(object_id.to_string()));
            }
            None if config.assign_object_ids => {
                let object_id = self.next_object_id(schema.name());
                instance.set_object_id(Some(object_id));
            }
            None => {}
        }

        for field in schema.field_schemas() {
            let Some(value) = object.get(field.name()) else {
                continue;
            };
            path.push_field(field.name_arc());
            let bound = self.bind_field(field, value, path, depth);
            path.pop();
            instance.set(Arc::clone(field.name_arc()), bound?);
        }

        self.check_choices(schema, &instance)?;
        if config.validate_enums {
            EnumValidator::check(schema, &instance)?;
        }

        log::trace!(
            "Bound {} at '{}' with {} field(s)",
            schema.name(),
            path,
            instance.field_count()
        );
        Ok(instance)
    }

    fn bind_field(
        &mut self,
        field: &FieldSchema,
        raw: &JsonValue,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<FieldValue> {
        match (raw, field.cardinality()) {
            (JsonValue::Null, _) => Ok(FieldValue::Null),
            (JsonValue::Array(_), Cardinality::Scalar) => Err(ResourceError::coercion(
                path.to_string(),
                format!("single {}", expected_name(field)),
                describe(raw),
            )),
            (JsonValue::Array(items), Cardinality::Array) => {
                self.bind_sequence(field, items, path, depth)
            }
            (_, Cardinality::Array) => {
                self.bind_sequence(field, std::slice::from_ref(raw), path, depth)
            }
            (_, Cardinality::Scalar) => self.bind_scalar(field, raw, path, depth),
        }
    }

    fn bind_scalar(
        &mut self,
        field: &FieldSchema,
        raw: &JsonValue,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<FieldValue> {
        match field.kind() {
            FieldKind::Primitive(_) | FieldKind::Enum(_) => {
                Ok(FieldValue::Primitive(bind_leaf(field.kind(), raw, path)?))
            }
            FieldKind::Embedded { target } => {
                let binder = self.binder;
                let schema = binder.registry.resolve(target)?;
                let nested = self.bind_object(schema, raw, path, depth + 1)?;
                Ok(FieldValue::Resource(Box::new(nested)))
            }
            FieldKind::Reference { .. } => Ok(FieldValue::Reference(ReferenceValue::new(raw.clone()))),
        }
    }

    fn bind_sequence(
        &mut self,
        field: &FieldSchema,
        items: &[JsonValue],
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<FieldValue> {
        match field.kind() {
            FieldKind::Primitive(_) | FieldKind::Enum(_) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    path.push_index(index);
                    let value = bind_leaf(field.kind(), item, path);
                    path.pop();
                    values.push(value?);
                }
                Ok(FieldValue::Primitives(values))
            }
            FieldKind::Embedded { target } => {
                let binder = self.binder;
                let schema = binder.registry.resolve(target)?;
                let mut nested = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    path.push_index(index);
                    let instance = self.bind_object(schema, item, path, depth + 1);
                    path.pop();
                    nested.push(instance?);
                }
                Ok(FieldValue::Resources(nested))
            }
            FieldKind::Reference { .. } => Ok(FieldValue::References(
                items.iter().cloned().map(ReferenceValue::new).collect(),
            )),
        }
    }

    fn check_choices(&self, schema: &ResourceType, instance: &ResourceInstance) -> Result<()> {
        for (group, alternatives) in schema.choice_groups() {
            let populated: Vec<&str> = alternatives
                .iter()
                .filter(|name| instance.is_populated(name))
                .map(|name| &**name)
                .collect();
            if populated.len() < 2 {
                continue;
            }
            if self.binder.config.strict_choices {
                return Err(ResourceError::choice_conflict(
                    schema.name(),
                    group,
                    populated.iter().map(|name| name.to_string()).collect(),
                ));
            }
            log::debug!(
                "{} populates several alternatives of choice group '{}': {}",
                schema.name(),
                group,
                populated.join(", ")
            );
        }
        Ok(())
    }

    fn next_object_id(&mut self, type_name: &str) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{}/{}", type_name, self.next_id);
            if self.used.insert(candidate.clone()) {
                self.generated += 1;
                return candidate;
            }
        }
    }
}

fn bind_leaf(kind: &FieldKind, raw: &JsonValue, path: &FieldPath) -> Result<Primitive> {
    let coerced = match kind {
        FieldKind::Primitive(primitive) => TypeCoercion::coerce(raw, *primitive),
        // Codes are kept verbatim; the vocabulary check happens after construction
        _ => TypeCoercion::coerce_to_string(raw),
    };
    coerced.map_err(|err| ResourceError::coercion(path.to_string(), err.target_type(), err.found()))
}

fn expected_name(field: &FieldSchema) -> &str {
    match field.kind() {
        FieldKind::Primitive(primitive) => primitive.type_name(),
        FieldKind::Enum(_) => "code",
        FieldKind::Embedded { target } | FieldKind::Reference { target, .. } => &**target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn registry() -> Arc<TypeRegistry> {
        let mut builder = TypeRegistry::builder();
        builder
            .register(ResourceType::new("Quantity").fields([
                FieldSchema::decimal("value"),
                FieldSchema::string("unit"),
            ]))
            .unwrap()
            .register(ResourceType::new("VisionPrescription_Dispense").fields([
                FieldSchema::code("eye", ["right", "left"]),
                FieldSchema::decimal("sphere"),
                FieldSchema::integer("axis"),
                FieldSchema::embedded("duration", "Quantity"),
                FieldSchema::string("note").array(),
            ]))
            .unwrap()
            .register(ResourceType::new("VisionPrescription").with_discriminator().fields([
                FieldSchema::string("dateWritten"),
                FieldSchema::reference("patient"),
                FieldSchema::embedded("dispense", "VisionPrescription_Dispense").array(),
                FieldSchema::string("reasonString").choice_of("reason"),
                FieldSchema::reference("reasonReference").choice_of("reason"),
            ]))
            .unwrap();
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_hydrate_nested_document() {
        let binder = ResourceBinder::new(registry());
        let raw = json!({
            "resourceType": "VisionPrescription",
            "dateWritten": "2014-06-15",
            "patient": {"reference": "Patient/example"},
            "dispense": [
                {"eye": "RIGHT", "sphere": -2.00, "axis": "180", "duration": {"value": 3, "unit": "month"}},
                {"eye": "left", "sphere": "-1.25"}
            ]
        });

        let instance = binder.hydrate("VisionPrescription", &raw).unwrap();
        assert_eq!(instance.get_str("dateWritten"), Some("2014-06-15"));
        assert_eq!(instance.get_str("resourceType"), Some("VisionPrescription"));
        assert_eq!(instance.reference("patient").unwrap().identifier(), Some("Patient/example"));

        let dispense = instance.resources("dispense");
        assert_eq!(dispense.len(), 2);
        assert_eq!(dispense[0].get_str("eye"), Some("RIGHT"));
        assert_eq!(dispense[0].get_integer("axis"), Some(180));
        assert_eq!(
            dispense[0].resource("duration").unwrap().get_decimal("value"),
            Some(Decimal::from(3))
        );
        assert_eq!(dispense[1].get_decimal("sphere"), Some(Decimal::from_str("-1.25").unwrap()));
    }

    #[test]
    fn test_generated_ids_are_pre_order() {
        let binder = ResourceBinder::new(registry());
        let raw = json!({
            "dispense": [
                {"duration": {"value": 1}},
                {"object_id": "supplied"}
            ]
        });
        let instance = binder.hydrate("VisionPrescription", &raw).unwrap();
        let ids: Vec<_> = instance.iter_tree().filter_map(ResourceInstance::object_id).collect();
        assert_eq!(
            ids,
            [
                "VisionPrescription/1",
                "VisionPrescription_Dispense/2",
                "Quantity/3",
                "supplied"
            ]
        );
    }

    #[test]
    fn test_session_ids_span_documents() {
        let binder = ResourceBinder::new(registry());
        let mut session = binder.session();
        let first = session.hydrate("Quantity", &json!({"value": 1})).unwrap();
        let second = session.hydrate("Quantity", &json!({"value": 2})).unwrap();
        assert_eq!(first.object_id(), Some("Quantity/1"));
        assert_eq!(second.object_id(), Some("Quantity/2"));
        assert_eq!(session.assigned(), 2);
    }

    #[test]
    fn test_generated_ids_skip_supplied_ones() {
        let binder = ResourceBinder::new(registry());
        let mut session = binder.session();
        let supplied = session
            .hydrate("Quantity", &json!({"object_id": "Quantity/2"}))
            .unwrap();
        let first = session.hydrate("Quantity", &json!({})).unwrap();
        let second = session.hydrate("Quantity", &json!({})).unwrap();

        assert_eq!(supplied.object_id(), Some("Quantity/2"));
        assert_eq!(first.object_id(), Some("Quantity/1"));
        assert_eq!(second.object_id(), Some("Quantity/3"));
        assert_eq!(session.assigned(), 2);
        assert!(session.is_used("Quantity/2"));
        assert!(!session.is_used("Quantity/4"));
    }

    #[test]
    fn test_coercion_error_carries_path() {
        let binder = ResourceBinder::new(registry());
        let raw = json!({"dispense": [{"eye": "left"}, {"axis": 0.5}]});
        let err = binder.hydrate("VisionPrescription", &raw).unwrap_err();
        assert_eq!(
            err,
            ResourceError::coercion("VisionPrescription.dispense[1].axis", "Integer", "'0.5'")
        );
        assert_eq!(err.field(), Some("axis"));
    }

    #[test]
    fn test_scalar_field_rejects_array() {
        let binder = ResourceBinder::new(registry());
        let err = binder
            .hydrate("VisionPrescription", &json!({"dateWritten": ["a", "b"]}))
            .unwrap_err();
        assert!(matches!(err, ResourceError::Coercion { ref expected, .. } if expected == "single String"));
    }

    #[test]
    fn test_array_field_wraps_scalar() {
        let binder = ResourceBinder::new(registry());
        let instance = binder
            .hydrate("VisionPrescription_Dispense", &json!({"note": "one"}))
            .unwrap();
        assert_eq!(
            instance.get("note"),
            Some(&FieldValue::Primitives(vec![Primitive::String("one".into())]))
        );
    }

    #[test]
    fn test_depth_limit() {
        let binder = ResourceBinder::with_config(registry(), BinderConfig::with_max_depth(1));
        let raw = json!({"dispense": [{"duration": {"value": 1}}]});
        let err = binder.hydrate("VisionPrescription", &raw).unwrap_err();
        assert_eq!(
            err,
            ResourceError::depth_exceeded("VisionPrescription.dispense[0].duration", 1)
        );
    }

    #[test]
    fn test_choice_groups() {
        let raw = json!({"reasonString": "dry eyes", "reasonReference": "Condition/1"});

        let permissive = ResourceBinder::new(registry());
        let instance = permissive.hydrate("VisionPrescription", &raw).unwrap();
        assert!(instance.is_populated("reasonString"));
        assert!(instance.is_populated("reasonReference"));

        let strict = ResourceBinder::with_config(registry(), BinderConfig::strict());
        let err = strict.hydrate("VisionPrescription", &raw).unwrap_err();
        assert_eq!(
            err,
            ResourceError::choice_conflict(
                "VisionPrescription",
                "reason",
                vec!["reasonString".into(), "reasonReference".into()]
            )
        );
    }

    #[test]
    fn test_enum_check_can_be_deferred() {
        let raw = json!({"eye": "sideways"});
        let binder = ResourceBinder::with_config(registry(), BinderConfig::permissive());
        let instance = binder.hydrate("VisionPrescription_Dispense", &raw).unwrap();
        assert_eq!(instance.get_str("eye"), Some("sideways"));

        let err = EnumValidator::new(binder.registry())
            .validate_tree(&instance)
            .unwrap_err();
        assert_eq!(err.field(), Some("eye"));
    }

    #[test]
    fn test_root_must_be_object() {
        let binder = ResourceBinder::new(registry());
        let err = binder.hydrate("Quantity", &json!("5 mg")).unwrap_err();
        assert_eq!(err, ResourceError::coercion("Quantity", "Quantity", "string \"5 mg\""));
    }
}
