pub mod types;
pub mod write;

pub use types::{
    CodeSchema, ProductCodes, StatusRecord, StockRecord, StockSnapshot, StoreEntry, NOT_AVAILABLE,
};
pub use write::{write_outputs, OutputPaths};
