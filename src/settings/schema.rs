//! Declared settings and their defaults

use crate::{Mapping, Value};

/// One declared setting.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub default: Option<Value>,
}

/// The settings a caller expects. Only names and defaults live here;
/// validation and coercion belong to whatever consumes the resolved mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with no default.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), None);
        self
    }

    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
    ) -> Self {
        self.push(name.into(), Some(default.into()));
        self
    }

    /// Redeclaring a name replaces the earlier declaration in place.
    fn push(&mut self, name: String, default: Option<Value>) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.default = default,
            None => self.fields.push(Field { name, default }),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// The lowest precedence tier: every declared default.
    pub fn defaults(&self) -> Mapping {
        self.fields
            .iter()
            .filter_map(|f| f.default.clone().map(|value| (f.name.clone(), value)))
            .collect()
    }
}
