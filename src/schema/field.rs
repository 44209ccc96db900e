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

//! Per-field schema metadata

use std::fmt;
use std::sync::Arc;

/// Type name used by plain reference fields
pub const REFERENCE_TYPE: &str = "Reference";

/// Parent key used by plain reference fields
pub const REFERENCE_KEY: &str = "identifier";

/// Whether a field holds one value or an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At most one value
    Scalar,
    /// Ordered sequence of values
    Array,
}

/// Element type of a primitive field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// Arbitrary precision decimal
    Decimal,
    /// Boolean
    Boolean,
}

impl PrimitiveType {
    /// Name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Decimal => "Decimal",
            PrimitiveType::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Attribute of a parent instance that a relationship edge joins on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentKey {
    /// The parent's process-local object id
    ObjectId,
    /// A named attribute of the parent (string primitive or identifier-like object)
    Field(Arc<str>),
}

impl ParentKey {
    /// Create a key joining on a named parent attribute
    pub fn field(name: impl Into<Arc<str>>) -> Self {
        ParentKey::Field(name.into())
    }

    /// Key name as written in relationship declarations
    pub fn as_str(&self) -> &str {
        match self {
            ParentKey::ObjectId => "object_id",
            ParentKey::Field(name) => &**name,
        }
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controlled vocabulary of an enumerated field
///
/// Values keep their declaration order for diagnostics. Membership is an
/// ASCII case-insensitive comparison with no other normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedValues {
    values: Vec<Arc<str>>,
}

impl AllowedValues {
    /// Create a value set from its members
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            values: values
                .into_iter()
                .map(|value| Arc::from(value.as_ref()))
                .collect(),
        }
    }

    /// Check membership ignoring ASCII case
    pub fn contains(&self, candidate: &str) -> bool {
        self.values
            .iter()
            .any(|value| value.eq_ignore_ascii_case(candidate))
    }

    /// Iterate over members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|value| &**value)
    }

    /// Members as owned strings
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Kind of a field and the metadata that kind needs
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Primitive leaf coerced to its element type
    Primitive(PrimitiveType),
    /// Code checked against a controlled vocabulary after construction
    Enum(AllowedValues),
    /// Nested object hydrated recursively as `target`
    Embedded {
        /// Registered type of the nested object
        target: Arc<str>,
    },
    /// Opaque pointer to another resource, stored as found
    Reference {
        /// Type of the referenced parent
        target: Arc<str>,
        /// Parent attribute the stored value is matched against
        key: ParentKey,
    },
}

impl FieldKind {
    /// Short name of the kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Primitive(_) => "primitive",
            FieldKind::Enum(_) => "enum",
            FieldKind::Embedded { .. } => "embedded",
            FieldKind::Reference { .. } => "reference",
        }
    }
}

/// Schema of one field of a resource type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    name: Arc<str>,
    cardinality: Cardinality,
    kind: FieldKind,
    choice_group: Option<Arc<str>>,
}

impl FieldSchema {
    /// Create a scalar field of any kind
    pub fn new(name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Scalar,
            kind,
            choice_group: None,
        }
    }

    /// Scalar string field
    pub fn string(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::String))
    }

    /// Scalar integer field
    pub fn integer(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Integer))
    }

    /// Scalar decimal field
    pub fn decimal(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Decimal))
    }

    /// Scalar boolean field
    pub fn boolean(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Boolean))
    }

    /// Scalar code field restricted to `allowed`
    pub fn code<I, S>(name: impl Into<Arc<str>>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(name, FieldKind::Enum(AllowedValues::new(allowed)))
    }

    /// Scalar nested object of type `target`
    pub fn embedded(name: impl Into<Arc<str>>, target: impl Into<Arc<str>>) -> Self {
        Self::new(
            name,
            FieldKind::Embedded {
                target: target.into(),
            },
        )
    }

    /// Scalar reference joined on the `identifier` of a `Reference` parent
    pub fn reference(name: impl Into<Arc<str>>) -> Self {
        Self::reference_to(name, REFERENCE_TYPE, ParentKey::field(REFERENCE_KEY))
    }

    /// Scalar reference joined on `key` of a `target` parent
    pub fn reference_to(
        name: impl Into<Arc<str>>,
        target: impl Into<Arc<str>>,
        key: ParentKey,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Reference {
                target: target.into(),
                key,
            },
        )
    }

    /// Turn the field into an ordered sequence
    pub fn array(mut self) -> Self {
        self.cardinality = Cardinality::Array;
        self
    }

    /// Mark the field as one alternative of a choice group such as `value[x]`
    pub fn choice_of(mut self, group: impl Into<Arc<str>>) -> Self {
        self.choice_group = Some(group.into());
        self
    }

    /// Field name as it appears in raw documents
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the field name
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Cardinality
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Whether the field is an ordered sequence
    pub fn is_array(&self) -> bool {
        self.cardinality == Cardinality::Array
    }

    /// Kind and kind metadata
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Target type of embedded and reference fields
    pub fn target_type(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Embedded { target } | FieldKind::Reference { target, .. } => {
                Some(&**target)
            }
            _ => None,
        }
    }

    /// Permitted values of enum fields
    pub fn allowed_values(&self) -> Option<&AllowedValues> {
        match &self.kind {
            FieldKind::Enum(allowed) => Some(allowed),
            _ => None,
        }
    }

    /// Choice group this field belongs to, if any
    pub fn choice_group(&self) -> Option<&str> {
        self.choice_group.as_deref()
    }

    /// Whether populating this field activates a relationship edge
    pub fn is_relational(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Embedded { .. } | FieldKind::Reference { .. }
        )
    }
}
