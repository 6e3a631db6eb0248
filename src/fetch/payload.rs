use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Error;
use crate::schema::ProductCodes;

pub const PIVOT_DATA: &str = "pivotData";
pub const PRODUCT_MAP: &str = "productMap";

/// The CMS response: a pivot table plus the product name → code map.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CmsPayload {
    #[serde(rename = "pivotData")]
    pivot_data: Option<Vec<Vec<Value>>>,
    #[serde(rename = "productMap", default)]
    pub product_map: HashMap<String, ProductCodes>,
}

impl CmsPayload {
    pub fn new(pivot_data: Vec<Vec<Value>>, product_map: HashMap<String, ProductCodes>) -> Self {
        Self {
            pivot_data: Some(pivot_data),
            product_map,
        }
    }

    /// Pivot rows including the header row. `null` reads as empty.
    pub fn pivot_rows(&self) -> &[Vec<Value>] {
        self.pivot_data.as_deref().unwrap_or_default()
    }

    /// Rows below the header.
    pub fn data_row_count(&self) -> usize {
        self.pivot_rows().len().saturating_sub(1)
    }
}

/// Parse and validate a CMS response body.
pub fn parse_payload(body: &str) -> Result<CmsPayload, Error> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| Error::Malformed(format!("not JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Malformed("top level is not an object".to_string()))?;

    if obj.get("status").and_then(Value::as_str) == Some("error") {
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        return Err(Error::Remote(message.to_string()));
    }
    for field in [PIVOT_DATA, PRODUCT_MAP] {
        if !obj.contains_key(field) {
            return Err(Error::MissingField(field));
        }
    }

    serde_json::from_value(value).map_err(|e| Error::Malformed(e.to_string()))
}
