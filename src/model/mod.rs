//! Data model for hydrated resources
//!
//! This module provides the generic instance type produced by the binder,
//! the values stored in its fields and the coercion rules for primitive
//! leaves.

#![warn(missing_docs)]

pub mod instance;
pub mod type_coercion;
pub mod value;

pub use instance::{ResourceInstance, TreeIter};
pub use type_coercion::{CoercionError, CoercionResult, TypeCoercion};
pub use value::{FieldValue, Primitive, ReferenceValue};
