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

//! VisionPrescription
//!
//! An authorization for the supply of glasses and/or contact lenses to a
//! patient. Each dispense entry describes one lens.

use crate::schema::{FieldSchema, ResourceType};

/// Eyes a lens can be prescribed for
pub const EYES: [&str; 2] = ["right", "left"];

/// Prism base directions
pub const PRISM_BASES: [&str; 4] = ["up", "down", "in", "out"];

/// Authorization for eyewear or contact lenses
pub fn vision_prescription() -> ResourceType {
    ResourceType::new("VisionPrescription")
        .with_discriminator()
        .fields([
            FieldSchema::embedded("identifier", "Identifier").array(),
            FieldSchema::string("status"),
            FieldSchema::reference("patient"),
            FieldSchema::reference("encounter"),
            FieldSchema::string("dateWritten"),
            FieldSchema::reference("prescriber"),
            FieldSchema::embedded("reasonCodeableConcept", "CodeableConcept").choice_of("reason"),
            FieldSchema::reference("reasonReference").choice_of("reason"),
            FieldSchema::embedded("dispense", "VisionPrescription_Dispense").array(),
        ])
}

/// Lens specification of one dispense entry
///
/// Lens powers are in dioptres and commonly step by 0.25, so they are
/// declared as decimals; only `axis` (degrees) is integral.
pub fn dispense() -> ResourceType {
    ResourceType::new("VisionPrescription_Dispense").fields([
        FieldSchema::embedded("product", "CodeableConcept"),
        FieldSchema::code("eye", EYES),
        FieldSchema::decimal("sphere"),
        FieldSchema::decimal("cylinder"),
        FieldSchema::integer("axis"),
        FieldSchema::decimal("prism"),
        FieldSchema::code("base", PRISM_BASES),
        FieldSchema::decimal("add"),
        FieldSchema::decimal("power"),
        FieldSchema::decimal("backCurve"),
        FieldSchema::decimal("diameter"),
        FieldSchema::embedded("duration", "Quantity"),
        FieldSchema::string("color"),
        FieldSchema::string("brand"),
        FieldSchema::embedded("note", "Annotation").array(),
    ])
}

/// Schemas declared by this module
pub fn types() -> Vec<ResourceType> {
    vec![vision_prescription(), dispense()]
}
