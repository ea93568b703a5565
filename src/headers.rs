use crate::{Error, Result};
use std::collections::HashMap;

/// Ordered, case-insensitive set of request headers
///
/// Names keep their original casing for serialisation. Lookups fold ASCII case.
/// Iteration yields the headers in insertion order.
#[derive(Clone, Debug, Default)]
pub struct HeaderSet<'a> {
    entries: Vec<(&'a str, &'a [u8])>,
    index: HashMap<String, usize>,
}

impl<'a> HeaderSet<'a> {
    /// Create an empty header set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing the value of a header with the same case-insensitive name
    ///
    /// The replaced entry keeps its position but takes over the new casing.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, name: &'a str, value: &'a [u8]) -> Option<&'a [u8]> {
        let name = name.trim();
        let key = name.to_ascii_lowercase();

        if let Some(&position) = self.index.get(&key) {
            let previous = std::mem::replace(&mut self.entries[position], (name, value));
            return Some(previous.1);
        }

        self.index.insert(key, self.entries.len());
        self.entries.push((name, value));
        None
    }

    /// Insert a header, rejecting names that are already present (case-insensitively)
    pub fn try_insert(&mut self, name: &'a str, value: &'a [u8]) -> Result<()> {
        if self.contains(name) {
            return Err(Error::InvalidArgument(format!(
                "duplicate header \"{}\"",
                name.trim()
            )));
        }

        self.insert(name, value);
        Ok(())
    }

    /// Look up a header value by its case-insensitive name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a [u8]> {
        self.index
            .get(&name.trim().to_ascii_lowercase())
            .map(|&position| self.entries[position].1)
    }

    /// Check whether a header with the case-insensitive name is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.trim().to_ascii_lowercase())
    }

    /// Header names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Headers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a [u8])> + '_ {
        self.entries.iter().copied()
    }

    /// Number of headers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the headers named in `reference`, in that order and with that casing
    ///
    /// Fails with [`Error::MissingSignedHeader`] on the first reference name without a match.
    pub fn retain_and_order<'r, I>(&self, reference: I) -> Result<Vec<(&'r str, &'a [u8])>>
    where
        I: IntoIterator<Item = &'r str>,
    {
        reference
            .into_iter()
            .map(|name| {
                let value = self
                    .get(name)
                    .ok_or_else(|| Error::MissingSignedHeader(name.to_string()))?;

                Ok((name, value))
            })
            .collect()
    }
}

impl<'a, N, V> FromIterator<(&'a N, &'a V)> for HeaderSet<'a>
where
    N: AsRef<str> + ?Sized + 'a,
    V: AsRef<[u8]> + ?Sized + 'a,
{
    fn from_iter<T: IntoIterator<Item = (&'a N, &'a V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name.as_ref(), value.as_ref());
        }
        set
    }
}
