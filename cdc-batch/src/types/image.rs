use std::collections::BTreeMap;
use std::fmt;

/// Column values of a row at one point in time.
///
/// Values are kept in their textual form, as delivered by the change log. A column missing from
/// the image is distinct from a column holding an empty string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RowImage {
    columns: BTreeMap<String, String>,
}

impl RowImage {
    /// Creates an empty image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `column`, if the image holds it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Sets `column` to `value`, returning the previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.columns.insert(column.into(), value.into())
    }

    /// Returns the number of columns in the image.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the image holds no column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over `(column, value)` pairs ordered by column name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }
}

impl fmt::Debug for RowImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for RowImage
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RowImage
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(columns: [(K, V); N]) -> Self {
        columns.into_iter().collect()
    }
}
