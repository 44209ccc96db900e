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

//! Error types for schema registration, hydration and validation

use thiserror::Error;

/// Result type alias for resource operations
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors raised while registering schemas or hydrating documents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Type name not present in the registry
    #[error("Resource type '{type_name}' is not registered")]
    UnknownType {
        /// Requested type name
        type_name: String,
    },

    /// Primitive value cannot be coerced to the declared element type
    #[error("Cannot coerce {found} to {expected} at '{path}'")]
    Coercion {
        /// Dotted field path of the offending value
        path: String,
        /// Declared element type
        expected: String,
        /// Description of the raw value
        found: String,
    },

    /// Value of an enumerated field outside its permitted set
    #[error("\"{value}\" does not match possible values for {type_name}.{field}: {}", .allowed.join(", "))]
    EnumViolation {
        /// Type owning the field
        type_name: String,
        /// Offending field
        field: String,
        /// Offending value, as found in the document
        value: String,
        /// Permitted values in declaration order
        allowed: Vec<String>,
    },

    /// Document nesting exceeds the configured limit
    #[error("Nesting depth limit of {limit} exceeded at '{path}'")]
    DepthExceeded {
        /// Path at which the limit was hit
        path: String,
        /// Configured limit
        limit: usize,
    },

    /// More than one alternative of a choice group populated
    #[error("Choice group '{group}' on {type_name} has several alternatives populated: {}", .fields.join(", "))]
    ChoiceConflict {
        /// Type owning the group
        type_name: String,
        /// Choice group name, e.g. `value`
        group: String,
        /// Populated alternatives
        fields: Vec<String>,
    },

    /// Root document carries no usable resource-type discriminator
    #[error("Document has no '{key}' discriminator")]
    MissingDiscriminator {
        /// Discriminator key that was looked up
        key: String,
    },

    /// Type registered twice
    #[error("Resource type '{type_name}' is already registered")]
    DuplicateType {
        /// Type name
        type_name: String,
    },

    /// Embedded field points at a type that was never registered
    #[error("Field {type_name}.{field} embeds unregistered type '{target}'")]
    UnresolvedTarget {
        /// Type owning the field
        type_name: String,
        /// Field name
        field: String,
        /// Missing target type
        target: String,
    },
}

impl ResourceError {
    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Create a coercion error
    pub fn coercion(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an enum violation error
    pub fn enum_violation(
        type_name: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: Vec<String>,
    ) -> Self {
        Self::EnumViolation {
            type_name: type_name.into(),
            field: field.into(),
            value: value.into(),
            allowed,
        }
    }

    /// Create a depth exceeded error
    pub fn depth_exceeded(path: impl Into<String>, limit: usize) -> Self {
        Self::DepthExceeded {
            path: path.into(),
            limit,
        }
    }

    /// Create a choice conflict error
    pub fn choice_conflict(
        type_name: impl Into<String>,
        group: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self::ChoiceConflict {
            type_name: type_name.into(),
            group: group.into(),
            fields,
        }
    }

    /// Create a missing discriminator error
    pub fn missing_discriminator(key: impl Into<String>) -> Self {
        Self::MissingDiscriminator { key: key.into() }
    }

    /// Create a duplicate type error
    pub fn duplicate_type(type_name: impl Into<String>) -> Self {
        Self::DuplicateType {
            type_name: type_name.into(),
        }
    }

    /// Create an unresolved target error
    pub fn unresolved_target(
        type_name: impl Into<String>,
        field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnresolvedTarget {
            type_name: type_name.into(),
            field: field.into(),
            target: target.into(),
        }
    }

    /// Field name for errors tied to a single field
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::EnumViolation { field, .. } | Self::UnresolvedTarget { field, .. } => {
                Some(field)
            }
            Self::Coercion { path, .. } => path.rsplit('.').next().map(|last| {
                last.split_once('[').map_or(last, |(name, _)| name)
            }),
            _ => None,
        }
    }
}
