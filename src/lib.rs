//! FHIR resource hydration in Rust
//!
//! Turns raw, deeply nested FHIR documents into typed in-memory instances,
//! checks their controlled vocabularies and exposes the relationship edges
//! each resource type participates in, ready for cross-resource graph
//! assembly.
//!
//! ```
//! use octofhir_resource_graph::{ResourceBinder, standard_registry};
//! use serde_json::json;
//!
//! let binder = ResourceBinder::new(standard_registry().unwrap());
//! let prescription = binder
//!     .hydrate_document(&json!({
//!         "resourceType": "VisionPrescription",
//!         "patient": {"reference": "Patient/example"},
//!         "dispense": [{"eye": "RIGHT", "sphere": -2.00}]
//!     }))
//!     .unwrap();
//!
//! assert_eq!(prescription.resources("dispense")[0].get_str("eye"), Some("RIGHT"));
//! assert_eq!(binder.registry().edges_for("VisionPrescription").len(), 7);
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod validation;

// Re-export main types
pub use binder::{FieldPath, HydrationSession, ResourceBinder};
pub use config::BinderConfig;
pub use error::{ResourceError, Result};
pub use graph::{DanglingReference, GraphAssembler, Link, ResourceGraph};
pub use model::{FieldValue, Primitive, ReferenceValue, ResourceInstance};
pub use registry::{RelationshipCatalog, RelationshipEdge, TypeRegistry, TypeRegistryBuilder};
pub use resources::{standard_registry, standard_types};
pub use schema::{Cardinality, FieldKind, FieldSchema, ParentKey, PrimitiveType, ResourceType};
pub use validation::EnumValidator;
