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

//! Resource type and field schema definitions
//!
//! A [`ResourceType`] is an ordered set of [`FieldSchema`] entries. Each field
//! declares its cardinality and kind; embedded and reference fields name their
//! target type explicitly so the binder resolves them through the registry
//! instead of inspecting values.

pub mod field;
pub mod resource_type;

pub use field::{
    AllowedValues, Cardinality, FieldKind, FieldSchema, ParentKey, PrimitiveType, REFERENCE_KEY,
    REFERENCE_TYPE,
};
pub use resource_type::{DISCRIMINATOR_KEY, Discriminator, ResourceType};
