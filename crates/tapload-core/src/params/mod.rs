//! Request parameter model.
//!
//! The upstream request parser produces an insertion-ordered collection of
//! named values. A name submitted several times holds a [`ParamValue::List`].

mod upload_file;

pub use upload_file::UploadFile;

use crate::upload::UploadDescriptor;

/// Value of one request parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Text(String),
    File(UploadFile),
    Upload(UploadDescriptor),
    List(Vec<ParamValue>),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadFile> {
        match self {
            ParamValue::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<UploadFile> for ParamValue {
    fn from(f: UploadFile) -> Self {
        ParamValue::File(f)
    }
}

impl From<UploadDescriptor> for ParamValue {
    fn from(d: UploadDescriptor) -> Self {
        ParamValue::Upload(d)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(v: Vec<ParamValue>) -> Self {
        ParamValue::List(v)
    }
}

/// Insertion-ordered request parameters. Names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Add one more submission of `name`. Repeated names collapse into a list
    /// in submission order.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, ParamValue::List(items))) => items.push(value),
            Some((_, slot)) => {
                let previous = std::mem::replace(slot, ParamValue::Null);
                *slot = ParamValue::List(vec![previous, value]);
            }
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &ParamValue) -> bool,
    {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for RequestParams {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, ParamValue)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        let mut params = RequestParams::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_collapses_repeated_names_into_list() {
        let mut p = RequestParams::new();
        p.append("UPLOAD", "a,http://x.org/a");
        p.append("UPLOAD", "b,http://x.org/b");
        p.append("UPLOAD", "c,http://x.org/c");
        assert_eq!(p.len(), 1);
        assert_eq!(
            p.get("UPLOAD"),
            Some(&ParamValue::List(vec![
                "a,http://x.org/a".into(),
                "b,http://x.org/b".into(),
                "c,http://x.org/c".into(),
            ]))
        );
    }

    #[test]
    fn insert_replaces_and_keeps_position() {
        let mut p = RequestParams::new();
        p.insert("LANG", "ADQL");
        p.insert("QUERY", "SELECT 1");
        let old = p.insert("LANG", "PQL");
        assert_eq!(old, Some(ParamValue::from("ADQL")));
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["LANG", "QUERY"]);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut p = RequestParams::new();
        p.insert("foo", "1");
        assert!(p.get("foo").is_some());
        assert!(p.get("FOO").is_none());
    }

    #[test]
    fn remove_and_retain() {
        let mut p = RequestParams::new();
        p.insert("a", "1");
        p.insert("b", ParamValue::Null);
        p.insert("c", "3");
        assert_eq!(p.remove("a"), Some(ParamValue::from("1")));
        p.retain(|_, v| !v.is_null());
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(p.remove("missing"), None);
    }
}
