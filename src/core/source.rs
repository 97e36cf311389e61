//! Numeric reading accessors supplied by the host.

use std::collections::HashMap;

/// Latest numeric value of a named source.
///
/// Implementations return `None` for unknown, unavailable or non-numeric
/// sources and never panic on a missing id.
pub trait NumericSource {
    fn read_numeric(&self, source_id: &str) -> Option<f64>;
}

impl<T: NumericSource + ?Sized> NumericSource for &T {
    fn read_numeric(&self, source_id: &str) -> Option<f64> {
        (**self).read_numeric(source_id)
    }
}

impl NumericSource for HashMap<String, f64> {
    fn read_numeric(&self, source_id: &str) -> Option<f64> {
        self.get(source_id).copied().filter(|value| value.is_finite())
    }
}

/// Adapter turning a closure into a [`NumericSource`].
#[derive(Debug, Clone, Copy)]
pub struct FnSource<F>(F);

/// Wraps `read` so it can be passed wherever a [`NumericSource`] is expected.
pub fn from_fn<F>(read: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<f64>,
{
    FnSource(read)
}

impl<F> NumericSource for FnSource<F>
where
    F: Fn(&str) -> Option<f64>,
{
    fn read_numeric(&self, source_id: &str) -> Option<f64> {
        (self.0)(source_id).filter(|value| value.is_finite())
    }
}

/// Raw host state table keyed by source id.
///
/// States are kept as the host reports them; `"unavailable"`, `"unknown"`
/// and anything that does not parse to a finite number read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTable {
    states: HashMap<String, String>,
}

impl StateTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, source_id: impl Into<String>, state: impl Into<String>) {
        self.states.insert(source_id.into(), state.into());
    }

    pub fn remove(&mut self, source_id: &str) -> Option<String> {
        self.states.remove(source_id)
    }

    #[must_use]
    pub fn state(&self, source_id: &str) -> Option<&str> {
        self.states.get(source_id).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StateTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            states: iter
                .into_iter()
                .map(|(id, state)| (id.into(), state.into()))
                .collect(),
        }
    }
}

impl NumericSource for StateTable {
    fn read_numeric(&self, source_id: &str) -> Option<f64> {
        self.state(source_id).and_then(parse_numeric_state)
    }
}

fn parse_numeric_state(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "unavailable" || trimmed == "unknown" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
