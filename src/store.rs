use serde::Serialize;
use tracing::debug;

/// One `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    key: String,
    value: String,
}

impl Entry {
    pub(crate) fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A `[name]` header and the entries that follow it, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First value stored under `key` in this section only.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(Entry::value)
    }
}

/// A parsed INI file.
///
/// The section and entry layout is fixed once parsing finishes; only values can be
/// changed afterwards, through [`Store::set`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Store {
    sections: Vec<Section>,
}

impl Store {
    pub(crate) fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section called `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Value of the first entry named `key`, searching sections in file order.
    ///
    /// A key repeated later in the file, in the same section or another one, is
    /// shadowed by its first occurrence. Use [`Section::get`] to look inside a
    /// specific section.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = self.entries().find(|entry| entry.key == key).map(Entry::value);
        if value.is_none() {
            debug!(key, "key not found");
        }
        value
    }

    /// Replace the value of the first entry named `key` and return the new value.
    ///
    /// Returns `None`, leaving the store untouched, when no entry has that key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Option<&str> {
        let Some(entry) = self
            .sections
            .iter_mut()
            .flat_map(|section| section.entries.iter_mut())
            .find(|entry| entry.key == key)
        else {
            debug!(key, "key not found");
            return None;
        };

        entry.value = value.into();
        Some(&entry.value)
    }

    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(section, key, value)` for every entry in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sections.iter().flat_map(|section| {
            section
                .entries
                .iter()
                .map(move |entry| (section.name(), entry.key(), entry.value()))
        })
    }

    /// Consume the store, freeing every section and entry.
    pub fn release(self) {
        debug!(sections = self.sections.len(), entries = self.len(), "releasing store");
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.sections.iter().flat_map(|section| section.entries.iter())
    }
}
