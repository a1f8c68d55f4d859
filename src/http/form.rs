//! Decoded URL-encoded form fields.

use serde::ser::{Serialize, SerializeMap, Serializer};
use url::form_urlencoded;

/// A form field value: a scalar until a name repeats, then a sequence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FormValue {
    /// All values in declaration order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FormValue::Single(v) => vec![v.as_str()],
            FormValue::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

/// Ordered multi-map of field name to value(s).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, FormValue)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` payload.
    ///
    /// The first occurrence of a name is a scalar, the second promotes the
    /// field to a sequence, later ones append.
    pub fn parse(encoded: &[u8]) -> Self {
        let mut form = Form::new();
        for (name, value) in form_urlencoded::parse(encoded) {
            form.append(name.into_owned(), value.into_owned());
        }
        form
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => {
                let promoted = match std::mem::replace(existing, FormValue::Multiple(Vec::new())) {
                    FormValue::Single(first) => vec![first, value],
                    FormValue::Multiple(mut values) => {
                        values.push(value);
                        values
                    }
                };
                *existing = FormValue::Multiple(promoted);
            }
            None => self.fields.push((name, FormValue::Single(value))),
        }
    }

    /// Builder form of [`Form::append`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Set a field to an explicit sequence, replacing any previous value.
    ///
    /// The urlencoded wire form has no marker for "sequence of one", so a
    /// one-element sequence comes back from [`Form::parse`] as a scalar.
    pub fn with_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let value = FormValue::Multiple(values.into_iter().map(Into::into).collect());
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode back to `a=1&b=2&b=3`; sequences become repeated names.
    pub fn to_urlencoded(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.fields {
            for v in value.values() {
                serializer.append_pair(name, v);
            }
        }
        serializer.finish()
    }
}

impl Serialize for Form {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
