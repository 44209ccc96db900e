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

//! ServiceDefinition: a service such as a decision support rule

use super::graph_definition::PUBLICATION_STATUS;
use crate::schema::{FieldSchema, ResourceType};

/// Definition of a service offered by a module
pub fn service_definition() -> ResourceType {
    ResourceType::new("ServiceDefinition")
        .with_discriminator()
        .fields([
            FieldSchema::string("url"),
            FieldSchema::embedded("identifier", "Identifier").array(),
            FieldSchema::string("version"),
            FieldSchema::string("name"),
            FieldSchema::string("title"),
            FieldSchema::code("status", PUBLICATION_STATUS),
            FieldSchema::boolean("experimental"),
            FieldSchema::string("date"),
            FieldSchema::string("publisher"),
            FieldSchema::string("description"),
            FieldSchema::string("purpose"),
            FieldSchema::string("usage"),
            FieldSchema::string("approvalDate"),
            FieldSchema::string("lastReviewDate"),
            FieldSchema::embedded("effectivePeriod", "Period"),
            FieldSchema::embedded("useContext", "UsageContext").array(),
            FieldSchema::embedded("jurisdiction", "CodeableConcept").array(),
            FieldSchema::embedded("topic", "CodeableConcept").array(),
            FieldSchema::embedded("contributor", "Contributor").array(),
            FieldSchema::embedded("contact", "ContactDetail").array(),
            FieldSchema::string("copyright"),
            FieldSchema::embedded("relatedArtifact", "RelatedArtifact").array(),
            FieldSchema::embedded("trigger", "TriggerDefinition").array(),
            FieldSchema::embedded("dataRequirement", "DataRequirement").array(),
            FieldSchema::reference("operationDefinition"),
        ])
}

/// Schemas declared by this module
pub fn types() -> Vec<ResourceType> {
    vec![service_definition()]
}
