use std::fmt;

/// Kind of a row mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

impl ChangeKind {
    /// Returns the lowercase name of the kind, as used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a batch: rows are only ever batched with rows sharing the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    /// Schema (database) the rows come from.
    pub schema: String,
    /// Table the rows come from.
    pub table: String,
    /// Kind of mutation captured for the rows.
    pub kind: ChangeKind,
}

impl BatchKey {
    /// Creates a new [`BatchKey`].
    pub fn new(schema: impl Into<String>, table: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            kind,
        }
    }

    /// Returns `true` if this key identifies `schema.table` with `kind`.
    ///
    /// Lets the handler compare an incoming micro-batch against the current key without
    /// allocating a new key first.
    pub fn matches(&self, schema: &str, table: &str, kind: ChangeKind) -> bool {
        self.kind == kind && self.table == table && self.schema == schema
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.schema, self.table, self.kind)
    }
}
