//! Row and key types flowing through the handler.
//!
//! A [`ChangeRow`] is one row mutation captured from the change log. Rows are grouped under a
//! [`BatchKey`], the `(schema, table, kind)` triple that decides which rows may be batched
//! together, and are handed to actions as uniform [`RowRun`]s.

mod image;
mod key;
mod row;
mod run;

pub use image::*;
pub use key::*;
pub use row::*;
pub use run::*;
