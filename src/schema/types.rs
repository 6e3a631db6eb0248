// src/schema/types.rs

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Code emitted for products the CMS has no mapping for.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shape of `kodeproduk` in the stock snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CodeSchema {
    /// One code per product: `"kodeproduk": "P001"`.
    Scalar,
    /// All codes of a product: `"kodeproduk": ["P001", "P001B"]`.
    #[default]
    Array,
}

/// Product code(s) as they appear in the CMS `productMap` and in the snapshot.
#[derive(Debug, Serialize, PartialEq, Clone, Eq)]
#[serde(untagged)]
pub enum ProductCodes {
    One(String),
    Many(Vec<String>),
}

/// Sheets hand all-digit codes over as numbers; take their text.
fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ProductCodes {
    /// Read a `productMap` value without ever rejecting it. Numbers become
    /// their text; `null`, booleans and objects become an empty code list,
    /// which [`ProductCodes::resolve`] turns into [`NOT_AVAILABLE`].
    pub fn from_value(value: &Value) -> ProductCodes {
        match value {
            Value::String(s) => ProductCodes::One(s.clone()),
            Value::Number(n) => ProductCodes::One(n.to_string()),
            Value::Array(items) => {
                ProductCodes::Many(items.iter().filter_map(code_text).collect())
            }
            Value::Null | Value::Bool(_) | Value::Object(_) => ProductCodes::Many(Vec::new()),
        }
    }

    /// Normalize a (possibly missing) map entry to the configured schema.
    ///
    /// Missing entries fall back to [`NOT_AVAILABLE`]. Under the scalar schema
    /// an array entry contributes its first code.
    pub fn resolve(entry: Option<&ProductCodes>, schema: CodeSchema) -> ProductCodes {
        match (schema, entry) {
            (CodeSchema::Scalar, Some(ProductCodes::One(code))) => ProductCodes::One(code.clone()),
            (CodeSchema::Scalar, Some(ProductCodes::Many(codes))) => ProductCodes::One(
                codes
                    .first()
                    .cloned()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            (CodeSchema::Scalar, None) => ProductCodes::One(NOT_AVAILABLE.to_string()),
            (CodeSchema::Array, Some(ProductCodes::One(code))) => {
                ProductCodes::Many(vec![code.clone()])
            }
            (CodeSchema::Array, Some(ProductCodes::Many(codes))) if !codes.is_empty() => {
                ProductCodes::Many(codes.clone())
            }
            (CodeSchema::Array, _) => ProductCodes::Many(vec![NOT_AVAILABLE.to_string()]),
        }
    }
}

impl<'de> Deserialize<'de> for ProductCodes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| ProductCodes::from_value(&value))
    }
}

/// One product line for one store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct StockRecord {
    #[serde(rename = "kodeproduk")]
    pub codes: ProductCodes,
    #[serde(rename = "namaproduk")]
    pub name: String,
    pub stock: i64,
}

/// Store code → product lines, in first-seen store order.
pub type StockSnapshot = IndexMap<String, Vec<StockRecord>>;

/// A `(code, name)` line of the store directory. Orders by code, then name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct StatusRecord {
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}
