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

//! Named resource schemas

use super::field::FieldSchema;
use indexmap::IndexMap;
use std::sync::Arc;

/// Raw key carrying the resource-kind tag of a document
pub const DISCRIMINATOR_KEY: &str = "resourceType";

/// Fixed tag written into every instance of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    /// Field the tag is stored under
    pub key: Arc<str>,
    /// Tag value
    pub value: Arc<str>,
}

/// Schema of one resource type: a unique name and its ordered fields
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    name: Arc<str>,
    discriminator: Option<Discriminator>,
    fields: IndexMap<Arc<str>, FieldSchema>,
    /// Choice group -> alternatives, in declaration order
    choice_groups: IndexMap<Arc<str>, Vec<Arc<str>>>,
}

impl ResourceType {
    /// Create an empty schema
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            discriminator: None,
            fields: IndexMap::new(),
            choice_groups: IndexMap::new(),
        }
    }

    /// Tag every instance with `resourceType = <type name>`
    pub fn with_discriminator(self) -> Self {
        let value = Arc::clone(&self.name);
        self.with_discriminator_value(DISCRIMINATOR_KEY, value)
    }

    /// Tag every instance with a custom key and value
    pub fn with_discriminator_value(
        mut self,
        key: impl Into<Arc<str>>,
        value: impl Into<Arc<str>>,
    ) -> Self {
        self.discriminator = Some(Discriminator {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Append a field; a later field with the same name replaces the earlier one
    pub fn field(mut self, field: FieldSchema) -> Self {
        if let Some(group) = field.choice_group() {
            let alternatives = self.choice_groups.entry(Arc::from(group)).or_default();
            if !alternatives.iter().any(|name| **name == *field.name()) {
                alternatives.push(Arc::clone(field.name_arc()));
            }
        }
        self.fields.insert(Arc::clone(field.name_arc()), field);
        self
    }

    /// Append several fields
    pub fn fields<I>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldSchema>,
    {
        fields.into_iter().fold(self, Self::field)
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the type name
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Discriminator, if the type declares one
    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    /// Look up a field schema by name
    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Fields in declaration order
    pub fn field_schemas(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.values()
    }

    /// Number of declared fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Choice groups with their alternatives in declaration order
    pub fn choice_groups(&self) -> impl Iterator<Item = (&str, &[Arc<str>])> {
        self.choice_groups
            .iter()
            .map(|(group, alternatives)| (&**group, alternatives.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation() -> ResourceType {
        ResourceType::new("Annotation").fields([
            FieldSchema::reference("authorReference").choice_of("author"),
            FieldSchema::string("authorString").choice_of("author"),
            FieldSchema::string("time"),
            FieldSchema::string("text"),
        ])
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = annotation();
        let names: Vec<_> = schema.field_schemas().map(|f| f.name()).collect();
        assert_eq!(names, ["authorReference", "authorString", "time", "text"]);
        assert_eq!(schema.field_count(), 4);
        assert!(schema.get_field("text").is_some());
        assert!(schema.get_field("object_id").is_none());
    }

    #[test]
    fn test_choice_groups_collect_alternatives() {
        let schema = annotation();
        let groups: Vec<_> = schema.choice_groups().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "author");
        let alternatives: Vec<&str> = groups[0].1.iter().map(|name| &**name).collect();
        assert_eq!(alternatives, ["authorReference", "authorString"]);
    }

    #[test]
    fn test_discriminator_defaults_to_type_name() {
        let schema = ResourceType::new("EnrollmentResponse").with_discriminator();
        let tag = schema.discriminator().unwrap();
        assert_eq!(&*tag.key, "resourceType");
        assert_eq!(&*tag.value, "EnrollmentResponse");
        assert!(annotation().discriminator().is_none());
    }
}
