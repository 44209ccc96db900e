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

//! Standard resource catalog
//!
//! Schemas for a sample of FHIR STU3 resources together with the datatypes
//! they embed. [`standard_registry`] freezes them into a process-wide
//! registry on first use; [`standard_types`] returns fresh schemas for
//! callers that want to extend the catalog with their own types.

pub mod datatypes;
pub mod enrollment_response;
pub mod graph_definition;
pub mod service_definition;
pub mod vision_prescription;

use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::schema::ResourceType;
use once_cell::sync::Lazy;
use std::sync::Arc;

static STANDARD_REGISTRY: Lazy<Result<Arc<TypeRegistry>>> = Lazy::new(|| {
    let mut builder = TypeRegistry::builder();
    builder.register_all(standard_types())?;
    let registry = builder.build()?;
    log::debug!("Standard resource registry ready with {} types", registry.len());
    Ok(Arc::new(registry))
});

/// Every schema of the standard catalog, datatypes first
pub fn standard_types() -> Vec<ResourceType> {
    let mut types = datatypes::types();
    types.extend(vision_prescription::types());
    types.extend(enrollment_response::types());
    types.extend(graph_definition::types());
    types.extend(service_definition::types());
    types
}

/// Shared registry holding the standard catalog
pub fn standard_registry() -> Result<Arc<TypeRegistry>> {
    STANDARD_REGISTRY.clone()
}
