//! Plugin descriptions: a shared-library reference plus free-form params.

use std::collections::BTreeMap;

/// An SDF `<plugin>` element. Parameters are kept as raw strings and pass
/// through the round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plugin {
    pub name: String,
    pub filename: String,
    pub params: BTreeMap<String, String>,
}

impl Plugin {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Plugin {
            name: name.into(),
            filename: filename.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
