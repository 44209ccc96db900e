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

//! Supporting datatypes shared by the standard resources
//!
//! Datatypes carry no discriminator; they only ever appear embedded.

use crate::schema::{FieldSchema, ResourceType};

/// Text note with author information
pub fn annotation() -> ResourceType {
    ResourceType::new("Annotation").fields([
        FieldSchema::reference("authorReference").choice_of("author"),
        FieldSchema::string("authorString").choice_of("author"),
        FieldSchema::string("time"),
        FieldSchema::string("text"),
    ])
}

/// A length of time, measured as a quantity
pub fn duration() -> ResourceType {
    ResourceType::new("Duration").fields(quantity_fields())
}

/// Digital signature along with supporting context
pub fn signature() -> ResourceType {
    ResourceType::new("Signature").fields([
        FieldSchema::embedded("type", "Coding").array(),
        FieldSchema::string("when"),
        FieldSchema::string("whoUri").choice_of("who"),
        FieldSchema::reference("whoReference").choice_of("who"),
        FieldSchema::string("onBehalfOfUri").choice_of("onBehalfOf"),
        FieldSchema::reference("onBehalfOfReference").choice_of("onBehalfOf"),
        FieldSchema::string("contentType"),
        FieldSchema::string("blob"),
    ])
}

/// Concept given as codings plus free text
pub fn codeable_concept() -> ResourceType {
    ResourceType::new("CodeableConcept").fields([
        FieldSchema::embedded("coding", "Coding").array(),
        FieldSchema::string("text"),
    ])
}

/// Single code from a terminology system
pub fn coding() -> ResourceType {
    ResourceType::new("Coding").fields([
        FieldSchema::string("system"),
        FieldSchema::string("version"),
        FieldSchema::string("code"),
        FieldSchema::string("display"),
        FieldSchema::boolean("userSelected"),
    ])
}

/// Business identifier; its `value` is what reference keys match against
pub fn identifier() -> ResourceType {
    ResourceType::new("Identifier").fields([
        FieldSchema::code("use", ["usual", "official", "temp", "secondary"]),
        FieldSchema::embedded("type", "CodeableConcept"),
        FieldSchema::string("system"),
        FieldSchema::string("value"),
        FieldSchema::embedded("period", "Period"),
        FieldSchema::reference("assigner"),
    ])
}

/// Measured amount with a unit
pub fn quantity() -> ResourceType {
    ResourceType::new("Quantity").fields(quantity_fields())
}

fn quantity_fields() -> [FieldSchema; 5] {
    [
        FieldSchema::decimal("value"),
        FieldSchema::code("comparator", ["<", "<=", ">=", ">"]),
        FieldSchema::string("unit"),
        FieldSchema::string("system"),
        FieldSchema::string("code"),
    ]
}

/// Time range bounded by start and end
pub fn period() -> ResourceType {
    ResourceType::new("Period").fields([FieldSchema::string("start"), FieldSchema::string("end")])
}

/// Named contact with its contact points
pub fn contact_detail() -> ResourceType {
    ResourceType::new("ContactDetail").fields([
        FieldSchema::string("name"),
        FieldSchema::embedded("telecom", "ContactPoint").array(),
    ])
}

/// Phone, email or similar channel of a contact
pub fn contact_point() -> ResourceType {
    ResourceType::new("ContactPoint").fields([
        FieldSchema::code(
            "system",
            ["phone", "fax", "email", "pager", "url", "sms", "other"],
        ),
        FieldSchema::string("value"),
        FieldSchema::code("use", ["home", "work", "temp", "old", "mobile"]),
        FieldSchema::integer("rank"),
        FieldSchema::embedded("period", "Period"),
    ])
}

/// Context in which an artifact is intended to be used
pub fn usage_context() -> ResourceType {
    ResourceType::new("UsageContext").fields([
        FieldSchema::embedded("code", "Coding"),
        FieldSchema::embedded("valueCodeableConcept", "CodeableConcept").choice_of("value"),
        FieldSchema::embedded("valueQuantity", "Quantity").choice_of("value"),
    ])
}

/// Documentation or citation attached to a knowledge artifact
pub fn related_artifact() -> ResourceType {
    ResourceType::new("RelatedArtifact").fields([
        FieldSchema::code(
            "type",
            [
                "documentation",
                "justification",
                "citation",
                "predecessor",
                "successor",
                "derived-from",
                "depends-on",
                "composed-of",
            ],
        ),
        FieldSchema::string("display"),
        FieldSchema::string("citation"),
        FieldSchema::string("url"),
        FieldSchema::reference("resource"),
    ])
}

/// Event that triggers a module
pub fn trigger_definition() -> ResourceType {
    ResourceType::new("TriggerDefinition").fields([
        FieldSchema::code(
            "type",
            [
                "named-event",
                "periodic",
                "data-added",
                "data-modified",
                "data-removed",
                "data-accessed",
                "data-access-ended",
            ],
        ),
        FieldSchema::string("eventName"),
        FieldSchema::reference("eventTimingReference").choice_of("eventTiming"),
        FieldSchema::string("eventTimingDate").choice_of("eventTiming"),
        FieldSchema::string("eventTimingDateTime").choice_of("eventTiming"),
        FieldSchema::embedded("eventData", "DataRequirement"),
    ])
}

/// Data a module needs, by type and profile
pub fn data_requirement() -> ResourceType {
    ResourceType::new("DataRequirement").fields([
        FieldSchema::string("type"),
        FieldSchema::string("profile").array(),
        FieldSchema::string("mustSupport").array(),
    ])
}

/// Person or organization that contributed to a definition
pub fn contributor() -> ResourceType {
    ResourceType::new("Contributor").fields([
        FieldSchema::code("type", ["author", "editor", "reviewer", "endorser"]),
        FieldSchema::string("name"),
        FieldSchema::embedded("contact", "ContactDetail").array(),
    ])
}

/// Reference datatype, the parent side of every plain reference field
pub fn reference() -> ResourceType {
    ResourceType::new("Reference").fields([
        FieldSchema::string("reference"),
        FieldSchema::embedded("identifier", "Identifier"),
        FieldSchema::string("display"),
    ])
}

/// All supporting datatypes
pub fn types() -> Vec<ResourceType> {
    vec![
        annotation(),
        duration(),
        signature(),
        codeable_concept(),
        coding(),
        identifier(),
        quantity(),
        period(),
        contact_detail(),
        contact_point(),
        usage_context(),
        related_artifact(),
        trigger_definition(),
        data_requirement(),
        contributor(),
        reference(),
    ]
}
