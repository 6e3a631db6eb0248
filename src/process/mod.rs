// src/process/mod.rs

pub mod columns;
pub mod utils;

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::schema::{
    CodeSchema, ProductCodes, StockRecord, StockSnapshot, StoreEntry, NOT_AVAILABLE,
};
use columns::ColumnLayout;
use utils::{cell_text, coerce_stock};

/// Result of un-pivoting one CMS table.
#[derive(Debug, Clone, PartialEq)]
pub struct Unpivoted {
    pub snapshot: StockSnapshot,
    pub stores: BTreeSet<StoreEntry>,
    pub product_columns: usize,
    pub skipped_rows: usize,
}

/// Turn the pivot table (one row per store, one column per product) into
/// one record per `(store, product)`.
///
/// Returns `Ok(None)` when the table has no data rows. A store code seen
/// twice keeps its first position and the later row's products.
pub fn unpivot(
    rows: &[Vec<Value>],
    product_map: &HashMap<String, ProductCodes>,
    schema: CodeSchema,
) -> Result<Option<Unpivoted>, Error> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(None);
    };
    if data.is_empty() {
        return Ok(None);
    }

    let layout = ColumnLayout::resolve(header)?;
    debug!(?layout, "resolved pivot columns");

    // codes are the same for every store, look them up once
    let codes: Vec<ProductCodes> = layout
        .products
        .iter()
        .map(|(_, name)| ProductCodes::resolve(product_map.get(name), schema))
        .collect();
    let unmapped = layout
        .products
        .iter()
        .filter(|(_, name)| !product_map.contains_key(name))
        .count();
    if unmapped > 0 {
        warn!(unmapped, "product columns without a code mapping");
    }

    let mut snapshot = StockSnapshot::with_capacity(data.len());
    let mut stores = BTreeSet::new();
    let mut skipped_rows = 0;

    for (offset, row) in data.iter().enumerate() {
        let store_code = cell_text(row.get(layout.store_code));
        if store_code.is_empty() {
            warn!(row = offset + 1, "row has no store code; skipped");
            skipped_rows += 1;
            continue;
        }
        let store_name = match layout.store_name {
            Some(idx) => cell_text(row.get(idx)).into_owned(),
            None => NOT_AVAILABLE.to_string(),
        };

        let products = layout
            .products
            .iter()
            .zip(&codes)
            .map(|((idx, name), code)| StockRecord {
                codes: code.clone(),
                name: name.clone(),
                stock: coerce_stock(row.get(*idx)),
            })
            .collect();

        let store_code = store_code.into_owned();
        stores.insert(StoreEntry {
            code: store_code.clone(),
            name: store_name,
        });
        snapshot.insert(store_code, products);
    }

    info!(
        stores = snapshot.len(),
        products = layout.products.len(),
        skipped = skipped_rows,
        "un-pivot complete"
    );

    Ok(Some(Unpivoted {
        snapshot,
        stores,
        product_columns: layout.products.len(),
        skipped_rows,
    }))
}
