// The query-result payload handed over by the host: rows plus column typing.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::scalar::{ColumnType, Scalar};

/// One result row: an ordered mapping from column name to cell value.
/// Rows are inputs only; nothing in the pipeline mutates them.
pub type Row = IndexMap<String, Scalar>;

/// A query result as produced by the host's query-execution layer:
/// rows plus parallel `colnames`/`coltypes` arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub colnames: Vec<String>,
    #[serde(default)]
    pub coltypes: Vec<ColumnType>,
    #[serde(default)]
    pub data: Vec<Row>,
}

impl ResultSet {
    /// Zip `colnames`/`coltypes` into a lookup. Extra names without a
    /// matching type entry are simply absent from the mapping.
    pub fn coltype_mapping(&self) -> HashMap<String, ColumnType> {
        self.colnames
            .iter()
            .zip(self.coltypes.iter())
            .map(|(name, ty)| (name.clone(), *ty))
            .collect()
    }
}
