use std::collections::HashMap;
use std::iter::FromIterator;

use crate::names::{validate_name, NameError};
use crate::string::ByteString;
use crate::Value;

/// A named attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: ByteString,
    pub value: Value,
}

impl Entry {
    pub fn new<N: Into<ByteString>, V: Into<Value>>(name: N, value: V) -> Entry {
        Entry {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Entries in stream order, duplicates included.
///
/// Encoding a decoded dictionary reproduces the original bytes. Name lookups
/// ([`Dictionary::get`], [`Dictionary::first_wins`]) see only the first entry
/// with a given name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<Entry>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary::default()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    #[inline(always)]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline(always)]
    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Append an entry, even if the name is already present.
    pub fn push<N: Into<ByteString>, V: Into<Value>>(&mut self, name: N, value: V) {
        self.entries.push(Entry::new(name, value));
    }

    /// Replace the value that lookups of `name` resolve to, or append a new
    /// entry. Returns the previous value.
    pub fn set<N: Into<ByteString>, V: Into<Value>>(
        &mut self,
        name: N,
        value: V,
    ) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.push(Entry { name, value });
                None
            }
        }
    }

    /// Remove every entry called `name`. Returns the value lookups saw.
    pub fn remove<N: AsRef<[u8]>>(&mut self, name: N) -> Option<Value> {
        let name = name.as_ref();
        let mut first = None;
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.name.as_bytes() != name {
                kept.push(entry);
            } else if first.is_none() {
                first = Some(entry.value);
            }
        }
        self.entries = kept;
        first
    }

    /// First-wins lookup.
    pub fn get<N: AsRef<[u8]>>(&self, name: N) -> Option<&Value> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|e| e.name.as_bytes() == name)
            .map(|e| &e.value)
    }

    pub fn get_mut<N: AsRef<[u8]>>(&mut self, name: N) -> Option<&mut Value> {
        let name = name.as_ref();
        self.entries
            .iter_mut()
            .find(|e| e.name.as_bytes() == name)
            .map(|e| &mut e.value)
    }

    /// Builds a name → value map in which the first entry with a given name
    /// wins and later duplicates are ignored.
    pub fn first_wins(&self) -> HashMap<&[u8], &Value> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            map.entry(entry.name.as_bytes()).or_insert(&entry.value);
        }
        map
    }

    /// Indices of entries hidden from lookups by an earlier entry of the same name.
    pub fn shadowed(&self) -> Vec<usize> {
        let mut seen = HashMap::with_capacity(self.entries.len());
        let mut out = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if seen.insert(entry.name.as_bytes(), ()).is_some() {
                out.push(i);
            }
        }
        out
    }

    /// Names that appear more than once, in order of first appearance.
    pub fn duplicates(&self) -> Vec<&ByteString> {
        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        let mut order = Vec::new();
        for entry in &self.entries {
            let count = counts.entry(entry.name.as_bytes()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(&entry.name);
            }
        }
        order
    }

    /// Runs every entry name through [`validate_name`].
    pub fn check_names(&self) -> Vec<(usize, NameError)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| validate_name(&e.name).err().map(|err| (i, err)))
            .collect()
    }
}

impl From<Vec<Entry>> for Dictionary {
    fn from(entries: Vec<Entry>) -> Self {
        Dictionary { entries }
    }
}

impl FromIterator<Entry> for Dictionary {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Dictionary {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<N: Into<ByteString>, V: Into<Value>> FromIterator<(N, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| Entry::new(name, value))
            .collect()
    }
}

impl IntoIterator for Dictionary {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
