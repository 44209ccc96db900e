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

//! Controlled-vocabulary validation
//!
//! Every populated enum field must hold values that match its allowed set
//! ignoring ASCII case. Scalars are checked as one-element sequences. The
//! stored value is never rewritten; `"RIGHT"` stays `"RIGHT"`.

use crate::error::{ResourceError, Result};
use crate::model::ResourceInstance;
use crate::registry::TypeRegistry;
use crate::schema::ResourceType;

/// Enforces enumerated code sets on hydrated instances
#[derive(Debug, Clone, Copy)]
pub struct EnumValidator<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> EnumValidator<'r> {
    /// Create a validator resolving schemas through `registry`
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Validate one instance, ignoring nested instances
    pub fn validate(&self, instance: &ResourceInstance) -> Result<()> {
        let schema = self.registry.resolve(instance.type_name())?;
        Self::check(schema, instance)
    }

    /// Validate an instance and everything nested in it, stopping at the first violation
    pub fn validate_tree(&self, instance: &ResourceInstance) -> Result<()> {
        instance
            .iter_tree()
            .try_for_each(|node| self.validate(node))
    }

    /// Every violation in an instance tree, in pre-order
    pub fn violations(&self, instance: &ResourceInstance) -> Vec<ResourceError> {
        let mut found = Vec::new();
        for node in instance.iter_tree() {
            match self.registry.resolve(node.type_name()) {
                Ok(schema) => found.extend(Self::field_violations(schema, node)),
                Err(err) => found.push(err),
            }
        }
        found
    }

    /// Check `instance` against an already resolved schema
    pub fn check(schema: &ResourceType, instance: &ResourceInstance) -> Result<()> {
        match Self::field_violations(schema, instance).next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn field_violations<'a>(
        schema: &'a ResourceType,
        instance: &'a ResourceInstance,
    ) -> impl Iterator<Item = ResourceError> + 'a {
        schema.field_schemas().flat_map(move |field| {
            let allowed = field.allowed_values();
            instance
                .primitives(field.name())
                .iter()
                .filter_map(move |value| {
                    let allowed = allowed?;
                    let text = value.to_string();
                    if allowed.contains(&text) {
                        None
                    } else {
                        Some(ResourceError::enum_violation(
                            schema.name(),
                            field.name(),
                            text,
                            allowed.to_vec(),
                        ))
                    }
                })
        })
    }
}
