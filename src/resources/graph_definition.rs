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

//! GraphDefinition
//!
//! A formal computable definition of a graph of resources. Links and targets
//! nest into each other (`link -> target -> link`), so documents of this type
//! are the usual way to exercise the depth guard.

use crate::schema::{FieldSchema, ResourceType};

/// Publication status shared by conformance resources
pub const PUBLICATION_STATUS: [&str; 4] = ["draft", "active", "retired", "unknown"];

/// How a compartment must be linked
pub const COMPARTMENT_RULES: [&str; 4] = ["identical", "matching", "different", "custom"];

/// Root of a resource graph definition
pub fn graph_definition() -> ResourceType {
    ResourceType::new("GraphDefinition")
        .with_discriminator()
        .fields([
            FieldSchema::string("url"),
            FieldSchema::string("version"),
            FieldSchema::string("name"),
            FieldSchema::code("status", PUBLICATION_STATUS),
            FieldSchema::boolean("experimental"),
            FieldSchema::string("date"),
            FieldSchema::string("publisher"),
            FieldSchema::embedded("contact", "ContactDetail").array(),
            FieldSchema::string("description"),
            FieldSchema::embedded("useContext", "UsageContext").array(),
            FieldSchema::embedded("jurisdiction", "CodeableConcept").array(),
            FieldSchema::string("purpose"),
            FieldSchema::string("start"),
            FieldSchema::string("profile"),
            FieldSchema::embedded("link", "GraphDefinition_Link").array(),
        ])
}

/// Link from the source resource to its targets
pub fn link() -> ResourceType {
    ResourceType::new("GraphDefinition_Link").fields([
        FieldSchema::string("path"),
        FieldSchema::string("sliceName"),
        FieldSchema::integer("min"),
        FieldSchema::string("max"),
        FieldSchema::string("description"),
        FieldSchema::embedded("target", "GraphDefinition_Target").array(),
    ])
}

/// Target type of a link, with nested links
pub fn target() -> ResourceType {
    ResourceType::new("GraphDefinition_Target").fields([
        FieldSchema::string("type"),
        FieldSchema::string("profile"),
        FieldSchema::embedded("compartment", "GraphDefinition_Compartment").array(),
        FieldSchema::embedded("link", "GraphDefinition_Link").array(),
    ])
}

/// Compartment consistency rule for a target
pub fn compartment() -> ResourceType {
    ResourceType::new("GraphDefinition_Compartment").fields([
        FieldSchema::string("code"),
        FieldSchema::code("rule", COMPARTMENT_RULES),
        FieldSchema::string("expression"),
        FieldSchema::string("description"),
    ])
}

/// Schemas declared by this module
pub fn types() -> Vec<ResourceType> {
    vec![graph_definition(), link(), target(), compartment()]
}
