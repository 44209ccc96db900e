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

//! Shared fixtures for the integration tests

#![allow(dead_code)]

use octofhir_resource_graph::{ResourceBinder, standard_registry};
use serde_json::{Value as JsonValue, json};

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Binder over the standard catalog with default settings
pub fn standard_binder() -> ResourceBinder {
    init_logging();
    ResourceBinder::new(standard_registry().expect("standard registry builds"))
}

pub fn vision_prescription(id: usize) -> JsonValue {
    json!({
        "resourceType": "VisionPrescription",
        "object_id": format!("vp-{id}"),
        "identifier": [{"system": "http://www.happysight.com/prescription", "value": format!("15013-{id}")}],
        "status": "active",
        "dateWritten": "2014-06-15",
        "patient": {"reference": "Patient/example"},
        "prescriber": {"reference": "Practitioner/example"},
        "reasonCodeableConcept": {
            "coding": [{"system": "http://snomed.info/sct", "code": "399118004", "display": "Myopia"}]
        },
        "dispense": [
            {
                "product": {"coding": [{"system": "http://hl7.org/fhir/ex-visionprescriptionproduct", "code": "lens"}]},
                "eye": "right",
                "sphere": -2.00,
                "prism": 0.5,
                "base": "down",
                "add": 2.00
            },
            {
                "product": {"coding": [{"code": "lens"}]},
                "eye": "LEFT",
                "sphere": -1.00,
                "cylinder": -0.50,
                "axis": 180,
                "prism": 0.5,
                "base": "Up",
                "add": 2.00,
                "note": [{"authorString": "Dr. Adams", "text": "Patient prefers thin lenses"}]
            }
        ]
    })
}

/// GraphDefinition whose links nest `depth` levels of `link -> target`
pub fn nested_graph_definition(depth: usize) -> JsonValue {
    let mut link = json!({"path": "Patient.link.other", "min": 0, "max": "*"});
    for level in 0..depth {
        link = json!({
            "path": format!("level{level}"),
            "min": 1,
            "target": [{"type": "Patient", "link": [link]}]
        });
    }
    json!({
        "resourceType": "GraphDefinition",
        "name": "nested",
        "status": "draft",
        "start": "Patient",
        "link": [link]
    })
}
