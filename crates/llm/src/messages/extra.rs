use std::collections::BTreeMap;

use serde_json::Value;

/// Keys a message or parameter bag carried that no typed field claims.
///
/// Flattened into the owning struct so they survive a decode/encode cycle and
/// can be forwarded to the other shape untouched.
#[derive(Default, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtraFields(BTreeMap<String, Value>);

impl ExtraFields {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }
}

impl FromIterator<(String, Value)> for ExtraFields {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
