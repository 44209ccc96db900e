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

//! Binder configuration options

use serde::{Deserialize, Serialize};

/// Raw key holding a caller-supplied object id
pub const DEFAULT_OBJECT_ID_KEY: &str = "object_id";

/// Configuration for document hydration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Maximum nesting of embedded objects below the root
    pub max_depth: usize,

    /// Whether to generate ids for instances that do not carry one
    pub assign_object_ids: bool,

    /// Raw key whose string value is taken as the instance's object id
    pub object_id_key: String,

    /// Reject instances populating more than one alternative of a choice group
    pub strict_choices: bool,

    /// Run enum validation as soon as each instance is built
    pub validate_enums: bool,
}

impl BinderConfig {
    /// Create a configuration with a custom depth limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Create a configuration that also rejects overlapping choice alternatives
    pub fn strict() -> Self {
        Self {
            strict_choices: true,
            ..Self::default()
        }
    }

    /// Create a configuration that binds without any vocabulary checks
    ///
    /// Useful for inspecting partially-invalid documents before failing them.
    pub fn permissive() -> Self {
        Self {
            strict_choices: false,
            validate_enums: false,
            ..Self::default()
        }
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            assign_object_ids: true,
            object_id_key: DEFAULT_OBJECT_ID_KEY.to_string(),
            strict_choices: false,
            validate_enums: true,
        }
    }
}
