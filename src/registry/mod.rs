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

//! Resource type registry
//!
//! Types are registered on a [`TypeRegistryBuilder`] during process start and
//! frozen into a read-only [`TypeRegistry`]. The frozen registry has no
//! interior mutability, so it can be shared across threads behind an `Arc`
//! and read without synchronization. The relationship catalog is derived in
//! the same step.

pub mod catalog;

pub use catalog::{RelationshipCatalog, RelationshipEdge};

use crate::error::{ResourceError, Result};
use crate::model::ResourceInstance;
use crate::schema::{FieldKind, ResourceType};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Produces the initial, empty instance of a type
pub type Constructor = fn(&ResourceType) -> ResourceInstance;

#[derive(Debug, Clone)]
struct RegisteredType {
    schema: ResourceType,
    constructor: Constructor,
}

/// Collects type registrations before the registry is frozen
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: IndexMap<Arc<str>, RegisteredType>,
}

impl TypeRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with the default constructor
    pub fn register(&mut self, schema: ResourceType) -> Result<&mut Self> {
        self.register_with(schema, ResourceInstance::empty_of)
    }

    /// Register a type with a custom constructor
    pub fn register_with(
        &mut self,
        schema: ResourceType,
        constructor: Constructor,
    ) -> Result<&mut Self> {
        let name = Arc::clone(schema.name_arc());
        if self.types.contains_key(&name) {
            return Err(ResourceError::duplicate_type(&*name));
        }
        log::trace!("Registering resource type {} ({} fields)", name, schema.field_count());
        self.types.insert(
            name,
            RegisteredType {
                schema,
                constructor,
            },
        );
        Ok(self)
    }

    /// Register several types with the default constructor
    pub fn register_all<I>(&mut self, schemas: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = ResourceType>,
    {
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(self)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Freeze the registry
    ///
    /// Fails with [`ResourceError::UnresolvedTarget`] when an embedded field
    /// names a type that was never registered. Reference targets are not
    /// checked since references are never dereferenced.
    pub fn build(self) -> Result<TypeRegistry> {
        for registered in self.types.values() {
            for field in registered.schema.field_schemas() {
                if let FieldKind::Embedded { target } = field.kind() {
                    if !self.types.contains_key(target) {
                        return Err(ResourceError::unresolved_target(
                            registered.schema.name(),
                            field.name(),
                            &**target,
                        ));
                    }
                }
            }
        }

        let catalog =
            RelationshipCatalog::from_types(self.types.values().map(|registered| &registered.schema));

        let discriminators = self
            .types
            .values()
            .filter_map(|registered| {
                registered.schema.discriminator().map(|tag| {
                    (
                        Arc::clone(&tag.value),
                        Arc::clone(registered.schema.name_arc()),
                    )
                })
            })
            .collect::<FxHashMap<_, _>>();

        let order: Vec<Arc<str>> = self.types.keys().cloned().collect();
        let types: FxHashMap<Arc<str>, RegisteredType> = self.types.into_iter().collect();

        log::debug!(
            "Built type registry: {} types, {} discriminators, {} relationship edges",
            types.len(),
            discriminators.len(),
            catalog.len()
        );

        Ok(TypeRegistry {
            types,
            order,
            discriminators,
            catalog,
        })
    }
}

/// Read-only mapping from type name to schema, constructor and relationships
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: FxHashMap<Arc<str>, RegisteredType>,
    order: Vec<Arc<str>>,
    discriminators: FxHashMap<Arc<str>, Arc<str>>,
    catalog: RelationshipCatalog,
}

impl TypeRegistry {
    /// Start a new registration
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Resolve a type's schema
    pub fn resolve(&self, type_name: &str) -> Result<&ResourceType> {
        self.get(type_name)
            .ok_or_else(|| ResourceError::unknown_type(type_name))
    }

    /// Look up a type's schema
    pub fn get(&self, type_name: &str) -> Option<&ResourceType> {
        self.types.get(type_name).map(|registered| &registered.schema)
    }

    /// Whether a type is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Build an empty instance through the type's constructor
    pub fn instantiate(&self, type_name: &str) -> Result<ResourceInstance> {
        let registered = self
            .types
            .get(type_name)
            .ok_or_else(|| ResourceError::unknown_type(type_name))?;
        Ok((registered.constructor)(&registered.schema))
    }

    /// Type whose discriminator value equals `tag`
    pub fn resolve_discriminator(&self, tag: &str) -> Result<&ResourceType> {
        self.discriminators
            .get(tag)
            .and_then(|type_name| self.get(type_name))
            .ok_or_else(|| ResourceError::unknown_type(tag))
    }

    /// Relationship catalog derived from the registered schemas
    pub fn catalog(&self) -> &RelationshipCatalog {
        &self.catalog
    }

    /// Edges declared for a type
    pub fn edges_for(&self, type_name: &str) -> &[RelationshipEdge] {
        self.catalog.edges_for(type_name)
    }

    /// Type names in registration order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| &**name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
