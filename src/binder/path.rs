//! Field paths for hydration diagnostics

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(Arc<str>),
    Index(usize),
}

/// Location inside a document being hydrated, e.g. `GraphDefinition.link[1].min`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    root: Arc<str>,
    segments: SmallVec<[Segment; 8]>,
}

impl FieldPath {
    /// Path pointing at a document root of the given type
    pub fn root(type_name: impl Into<Arc<str>>) -> Self {
        Self {
            root: type_name.into(),
            segments: SmallVec::new(),
        }
    }

    /// Descend into a field
    pub fn push_field(&mut self, name: &Arc<str>) {
        self.segments.push(Segment::Field(Arc::clone(name)));
    }

    /// Descend into a sequence element
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    /// Step back out of the last segment
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Number of segments below the root
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path points at the root
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
