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

//! EnrollmentResponse: an insurer's reply to an enrollment request

use crate::schema::{FieldSchema, ResourceType};

/// Insurer response to an enrollment request
pub fn enrollment_response() -> ResourceType {
    ResourceType::new("EnrollmentResponse")
        .with_discriminator()
        .fields([
            FieldSchema::embedded("identifier", "Identifier").array(),
            FieldSchema::string("status"),
            FieldSchema::reference("request"),
            FieldSchema::embedded("outcome", "CodeableConcept"),
            FieldSchema::string("disposition"),
            FieldSchema::string("created"),
            FieldSchema::reference("organization"),
            FieldSchema::reference("requestProvider"),
            FieldSchema::reference("requestOrganization"),
        ])
}

/// Schemas declared by this module
pub fn types() -> Vec<ResourceType> {
    vec![enrollment_response()]
}
