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

//! Static relationship declarations per resource type
//!
//! Every embedded or reference field of a type contributes exactly one edge
//! `(parent type, parent key, child type, child field)`. The owning type is
//! the child; the field's target type is the parent. Edges are computed once
//! when the registry is built and then only looked up.

use crate::model::ResourceInstance;
use crate::schema::{FieldKind, ParentKey, ResourceType};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Schema-level relationship between a parent and a child type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipEdge {
    /// Type holding the key the child field points at
    pub parent_type: Arc<str>,
    /// Attribute of the parent the child field value is matched against
    pub parent_key: ParentKey,
    /// Type owning the field
    pub child_type: Arc<str>,
    /// Field carrying the pointer
    pub child_field: Arc<str>,
}

impl RelationshipEdge {
    /// Create an edge declaration
    pub fn new(
        parent_type: impl Into<Arc<str>>,
        parent_key: ParentKey,
        child_type: impl Into<Arc<str>>,
        child_field: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            parent_type: parent_type.into(),
            parent_key,
            child_type: child_type.into(),
            child_field: child_field.into(),
        }
    }
}

impl fmt::Display for RelationshipEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.parent_type, self.parent_key, self.child_type, self.child_field
        )
    }
}

/// Relationship edges keyed by child type
#[derive(Debug, Clone, Default)]
pub struct RelationshipCatalog {
    edges: FxHashMap<Arc<str>, Vec<RelationshipEdge>>,
}

impl RelationshipCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the edges of every given type from its field schemas
    pub fn from_types<'a, I>(types: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceType>,
    {
        let mut catalog = Self::new();
        for schema in types {
            catalog.declare_type(schema);
        }
        catalog
    }

    /// Derive and store the edges of one type, replacing earlier ones
    pub fn declare_type(&mut self, schema: &ResourceType) {
        let edges = schema
            .field_schemas()
            .filter_map(|field| {
                let (parent_type, parent_key) = match field.kind() {
                    FieldKind::Embedded { target } => (Arc::clone(target), ParentKey::ObjectId),
                    FieldKind::Reference { target, key } => (Arc::clone(target), key.clone()),
                    FieldKind::Primitive(_) | FieldKind::Enum(_) => return None,
                };
                Some(RelationshipEdge {
                    parent_type,
                    parent_key,
                    child_type: Arc::clone(schema.name_arc()),
                    child_field: Arc::clone(field.name_arc()),
                })
            })
            .collect();
        self.edges.insert(Arc::clone(schema.name_arc()), edges);
    }

    /// Edges declared for a type, in field declaration order
    pub fn edges_for(&self, type_name: &str) -> &[RelationshipEdge] {
        self.edges.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges whose child field is populated on `instance`
    pub fn activated_edges<'a>(
        &'a self,
        instance: &'a ResourceInstance,
    ) -> impl Iterator<Item = &'a RelationshipEdge> + 'a {
        self.edges_for(instance.type_name())
            .iter()
            .filter(move |edge| instance.is_populated(&edge.child_field))
    }

    /// Total number of edges across all types
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no edges
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
