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

//! Cross-resource graph assembly
//!
//! Hydrated instance trees are flattened into the nodes of a directed graph.
//! For every catalog edge an instance activates, each value of the child
//! field is matched against the parents of the declared type: by `object_id`,
//! or by the declared key field. A match adds a `parent -> child` edge; a
//! miss is kept as a [`DanglingReference`].

use crate::model::{FieldValue, ResourceInstance};
use crate::registry::{RelationshipEdge, TypeRegistry};
use crate::schema::ParentKey;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Label of a resolved graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    /// Catalog edge that produced the link
    pub relationship: &'a RelationshipEdge,
    /// Child field value that matched the parent
    pub value: &'a str,
}

/// Activated edge whose value matched no instance in the working set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingReference<'a> {
    /// Node of the instance holding the unmatched value
    pub child: NodeIndex,
    /// Catalog edge that was activated
    pub relationship: &'a RelationshipEdge,
    /// Unmatched value
    pub value: &'a str,
}

/// Directed graph over a working set of hydrated instances
#[derive(Debug, Clone)]
pub struct ResourceGraph<'a> {
    graph: DiGraph<&'a ResourceInstance, Link<'a>>,
    dangling: Vec<DanglingReference<'a>>,
}

impl<'a> ResourceGraph<'a> {
    /// Underlying petgraph graph
    pub fn graph(&self) -> &DiGraph<&'a ResourceInstance, Link<'a>> {
        &self.graph
    }

    /// Number of instances, nested ones included
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of resolved edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Instance stored at a node
    pub fn instance(&self, node: NodeIndex) -> Option<&'a ResourceInstance> {
        self.graph.node_weight(node).copied()
    }

    /// First node holding an instance of `type_name` with the given object id
    pub fn find(&self, type_name: &str, object_id: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&node| {
            let instance = self.graph[node];
            instance.type_name() == type_name && instance.object_id() == Some(object_id)
        })
    }

    /// Resolved edges as `(parent, child, link)`, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&'a ResourceInstance, &'a ResourceInstance, &Link<'a>)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()],
                self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    /// Children linked from `node`
    pub fn children(&self, node: NodeIndex) -> Vec<&'a ResourceInstance> {
        self.linked(node, Direction::Outgoing)
    }

    /// Parents linked to `node`
    pub fn parents(&self, node: NodeIndex) -> Vec<&'a ResourceInstance> {
        self.linked(node, Direction::Incoming)
    }

    /// Activated edges that found no parent
    pub fn dangling(&self) -> &[DanglingReference<'a>] {
        &self.dangling
    }

    fn linked(&self, node: NodeIndex, direction: Direction) -> Vec<&'a ResourceInstance> {
        // petgraph walks adjacency lists newest first
        let mut edges: Vec<_> = self.graph.edges_directed(node, direction).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| match direction {
                Direction::Outgoing => self.graph[edge.target()],
                Direction::Incoming => self.graph[edge.source()],
            })
            .collect()
    }
}

type ParentIndex<'a> = FxHashMap<(&'a str, &'a str, &'a str), SmallVec<[NodeIndex; 1]>>;

/// Builds [`ResourceGraph`]s from the registry's relationship catalog
#[derive(Debug, Clone, Copy)]
pub struct GraphAssembler<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> GraphAssembler<'r> {
    /// Create an assembler over `registry`
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Assemble the graph of a working set
    ///
    /// Nodes are added in input order, each tree in pre-order. Edges follow
    /// child node order, then catalog order, then value order. Instances
    /// without an `object_id` anchor no edges as parents.
    pub fn assemble<'a>(&self, instances: &'a [ResourceInstance]) -> ResourceGraph<'a>
    where
        'r: 'a,
    {
        let registry: &'a TypeRegistry = self.registry;
        let mut graph = DiGraph::new();
        for root in instances {
            for instance in root.iter_tree() {
                graph.add_node(instance);
            }
        }

        let keys = parent_keys(registry);
        let mut parents: ParentIndex<'a> = FxHashMap::default();
        for node in graph.node_indices() {
            let instance: &'a ResourceInstance = graph[node];
            let Some(object_id) = instance.object_id() else {
                continue;
            };
            let Some(declared) = keys.get(instance.type_name()) else {
                continue;
            };
            for &key in declared {
                let values = match key {
                    ParentKey::ObjectId => SmallVec::from_elem(object_id, 1),
                    ParentKey::Field(name) => key_values(instance, name),
                };
                for value in values {
                    parents
                        .entry((instance.type_name(), key.as_str(), value))
                        .or_default()
                        .push(node);
                }
            }
        }

        let duplicates = parents.values().filter(|matched| matched.len() > 1).count();
        if duplicates > 0 {
            log::warn!(
                "{} parent keys are shared by more than one instance; children will link to each of them",
                duplicates
            );
        }

        let mut dangling = Vec::new();
        for node in graph.node_indices() {
            let instance: &'a ResourceInstance = graph[node];
            for relationship in registry.catalog().activated_edges(instance) {
                for value in child_values(instance, &relationship.child_field) {
                    let lookup = (
                        &*relationship.parent_type,
                        relationship.parent_key.as_str(),
                        value,
                    );
                    match parents.get(&lookup) {
                        Some(matched) => {
                            for &parent in matched {
                                graph.add_edge(parent, node, Link { relationship, value });
                            }
                        }
                        None => dangling.push(DanglingReference {
                            child: node,
                            relationship,
                            value,
                        }),
                    }
                }
            }
        }

        log::debug!(
            "Assembled resource graph: {} nodes, {} edges, {} dangling references",
            graph.node_count(),
            graph.edge_count(),
            dangling.len()
        );

        ResourceGraph { graph, dangling }
    }
}

/// Parent keys requested by any catalog edge, per parent type
fn parent_keys(registry: &TypeRegistry) -> FxHashMap<&str, SmallVec<[&ParentKey; 2]>> {
    let mut keys: FxHashMap<&str, SmallVec<[&ParentKey; 2]>> = FxHashMap::default();
    for type_name in registry.type_names() {
        for edge in registry.edges_for(type_name) {
            let entry = keys.entry(&*edge.parent_type).or_default();
            if !entry.contains(&&edge.parent_key) {
                entry.push(&edge.parent_key);
            }
        }
    }
    keys
}

/// Values a parent exposes under a key field
///
/// String primitives count as is; embedded objects contribute their `value`,
/// which covers identifier-like datatypes.
fn key_values<'a>(instance: &'a ResourceInstance, field: &str) -> SmallVec<[&'a str; 1]> {
    match instance.get(field) {
        Some(FieldValue::Primitive(_) | FieldValue::Primitives(_)) => instance
            .primitives(field)
            .iter()
            .filter_map(|value| value.as_str())
            .collect(),
        Some(FieldValue::Resource(_) | FieldValue::Resources(_)) => instance
            .resources(field)
            .iter()
            .filter_map(|nested| nested.get_str("value"))
            .collect(),
        _ => SmallVec::new(),
    }
}

/// Values a child holds in a relational field
fn child_values<'a>(instance: &'a ResourceInstance, field: &str) -> SmallVec<[&'a str; 1]> {
    match instance.get(field) {
        Some(FieldValue::Resource(_) | FieldValue::Resources(_)) => instance
            .resources(field)
            .iter()
            .filter_map(ResourceInstance::object_id)
            .collect(),
        Some(FieldValue::Reference(_) | FieldValue::References(_)) => instance
            .references(field)
            .iter()
            .filter_map(|reference| reference.identifier())
            .collect(),
        Some(FieldValue::Primitive(_) | FieldValue::Primitives(_)) => instance
            .primitives(field)
            .iter()
            .filter_map(|value| value.as_str())
            .collect(),
        Some(FieldValue::Null) | None => SmallVec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Primitive, ReferenceValue};
    use crate::schema::{FieldSchema, ResourceType};
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        let mut builder = TypeRegistry::builder();
        builder
            .register(ResourceType::new("Parent").field(FieldSchema::string("name")))
            .unwrap()
            .register(ResourceType::new("Child").field(FieldSchema::reference_to(
                "parentRef",
                "Parent",
                ParentKey::ObjectId,
            )))
            .unwrap();
        builder.build().unwrap()
    }

    fn child(parent_ref: &str) -> ResourceInstance {
        ResourceInstance::new("Child")
            .with_object_id("B")
            .with_field("parentRef", ReferenceValue::identifier_only(parent_ref))
    }

    #[test]
    fn test_single_matching_edge() {
        let registry = registry();
        let instances = vec![
            ResourceInstance::new("Parent")
                .with_object_id("X")
                .with_field("name", Primitive::String("a".into())),
            child("X"),
        ];

        let graph = GraphAssembler::new(&registry).assemble(&instances);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.dangling().is_empty());

        let (parent, child, link) = graph.edges().next().unwrap();
        assert_eq!(parent.object_id(), Some("X"));
        assert_eq!(child.object_id(), Some("B"));
        assert_eq!(link.value, "X");
        assert_eq!(&*link.relationship.child_field, "parentRef");

        let parent_node = graph.find("Parent", "X").unwrap();
        assert_eq!(graph.children(parent_node)[0].type_name(), "Child");
    }

    #[test]
    fn test_unmatched_value_is_dangling() {
        let registry = registry();
        let instances = vec![
            ResourceInstance::new("Parent").with_object_id("X"),
            child("Y"),
        ];

        let graph = GraphAssembler::new(&registry).assemble(&instances);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.dangling().len(), 1);
        assert_eq!(graph.dangling()[0].value, "Y");
        assert_eq!(
            graph.instance(graph.dangling()[0].child).unwrap().type_name(),
            "Child"
        );
    }

    #[test]
    fn test_parent_without_object_id_anchors_nothing() {
        let registry = registry();
        let instances = vec![ResourceInstance::new("Parent"), child("X")];

        let graph = GraphAssembler::new(&registry).assemble(&instances);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.dangling().len(), 1);
    }
}
