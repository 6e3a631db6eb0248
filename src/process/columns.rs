use serde_json::Value;

use super::utils::cell_text;
use crate::error::Error;

pub const STORE_CODE: &str = "Kode toko";
pub const STORE_NAME: &str = "Nama Toko";
pub const BRANCH: &str = "Cabang";

/// Headers that describe the store rather than a product.
pub const METADATA_COLUMNS: [&str; 3] = [STORE_CODE, STORE_NAME, BRANCH];

/// Column positions resolved from the pivot header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub store_code: usize,
    pub store_name: Option<usize>,
    pub branch: Option<usize>,
    /// `(column index, product name)` in header order.
    pub products: Vec<(usize, String)>,
}

impl ColumnLayout {
    /// Match metadata columns by exact name; the first occurrence wins.
    /// Every other header is a product column.
    pub fn resolve(header: &[Value]) -> Result<Self, Error> {
        let names: Vec<String> = header
            .iter()
            .map(|h| cell_text(Some(h)).into_owned())
            .collect();
        let position = |label: &str| names.iter().position(|n| n == label);

        let store_code = position(STORE_CODE).ok_or(Error::MissingStoreColumn(STORE_CODE))?;
        let products = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !METADATA_COLUMNS.contains(&name.as_str()))
            .map(|(idx, name)| (idx, name.clone()))
            .collect();

        Ok(Self {
            store_code,
            store_name: position(STORE_NAME),
            branch: position(BRANCH),
            products,
        })
    }
}
