use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Read-only view of the caller's state.
///
/// The engine never owns or persists state; goals and traits only query it. Keys that are absent
/// read as `None` and callers pick their own default.
pub trait StateLookup {
    fn scalar(&self, key: &str) -> Option<f64>;

    /// Lookup into a per-goal table such as `volatility[goal]`.
    fn entry(&self, _key: &str, _sub: &str) -> Option<f64> {
        None
    }

    fn scalar_or(&self, key: &str, default: f64) -> f64 {
        self.scalar(key).unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StateValue {
    Scalar(f64),
    Table(BTreeMap<String, f64>),
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<BTreeMap<String, f64>> for StateValue {
    fn from(value: BTreeMap<String, f64>) -> Self {
        Self::Table(value)
    }
}

/// Owned key/value state, mostly useful for tests and drivers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateMap {
    values: BTreeMap<String, StateValue>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Sets `key[sub]`, replacing a scalar stored under `key` with a fresh table.
    pub fn set_entry(&mut self, key: impl Into<String>, sub: impl Into<String>, value: f64) {
        let slot = self
            .values
            .entry(key.into())
            .or_insert_with(|| StateValue::Table(BTreeMap::new()));
        if let StateValue::Scalar(_) = slot {
            *slot = StateValue::Table(BTreeMap::new());
        }
        if let StateValue::Table(table) = slot {
            table.insert(sub.into(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl StateLookup for StateMap {
    fn scalar(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            StateValue::Scalar(v) => Some(*v),
            StateValue::Table(_) => None,
        }
    }

    fn entry(&self, key: &str, sub: &str) -> Option<f64> {
        match self.values.get(key)? {
            StateValue::Table(table) => table.get(sub).copied(),
            StateValue::Scalar(_) => None,
        }
    }
}

impl StateLookup for BTreeMap<String, f64> {
    fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl StateLookup for HashMap<String, f64> {
    fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}
