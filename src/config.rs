// src/config.rs

use clap::{error::ErrorKind, ArgAction, Parser};
use dotenv::dotenv;
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::fetch::DEFAULT_TIMEOUT;
use crate::schema::{CodeSchema, OutputPaths};

/// Apps Script web app that serves the "Stok Terkini" pivot and the product map.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbxTNN-7FaYzql3TZza6dvPcQRFfizCsq_JAh3ZYrWL6amYkHUZO_RdomRJBslSBBHFQvg/exec";
pub const DEFAULT_OUT_DIR: &str = "docs";

#[derive(Parser, Debug)]
#[command(
    name = "stockcache",
    version,
    about = "Fetch the CMS stock pivot and write the static stock cache"
)]
pub struct Cli {
    /// CMS endpoint returning `pivotData` and `productMap`
    #[arg(long, env = "STOCKCACHE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,

    /// Directory receiving live_stock.json, update_status.json and listtoko.txt
    #[arg(long, env = "STOCKCACHE_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Do not append the `v=<timestamp>` cache buster
    #[arg(long = "no-cache-bust", action = ArgAction::SetTrue)]
    pub no_cache_bust: bool,

    /// Shape of `kodeproduk` in the snapshot
    #[arg(long, value_enum, env = "STOCKCACHE_CODE_SCHEMA")]
    pub code_schema: Option<CodeSchema>,

    /// Skip writing listtoko.txt
    #[arg(long = "no-store-list", action = ArgAction::SetTrue)]
    pub no_store_list: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// First-generation layout: files in the working directory, scalar
    /// codes, no cache buster, no store list. Explicit flags still win.
    #[arg(long, action = ArgAction::SetTrue)]
    pub legacy: bool,
}

impl Cli {
    /// Load `.env` (if any) and parse the process arguments.
    pub fn load() -> Result<Self, clap::Error> {
        let _ = dotenv();
        Self::try_parse()
    }

    pub fn into_config(self) -> Config {
        let mut config = if self.legacy {
            Config::legacy(self.endpoint)
        } else {
            Config::new(self.endpoint)
        };
        if let Some(dir) = self.out_dir {
            config.out_dir = dir;
        }
        if let Some(schema) = self.code_schema {
            config.code_schema = schema;
        }
        if self.no_cache_bust {
            config.cache_bust = false;
        }
        if self.no_store_list {
            config.write_store_list = false;
        }
        config.timeout = Duration::from_secs(self.timeout_secs);
        config
    }
}

/// `--help` and `--version` surface as clap errors but are not failures.
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Url,
    pub out_dir: PathBuf,
    pub cache_bust: bool,
    pub code_schema: CodeSchema,
    pub write_store_list: bool,
    pub timeout: Duration,
}

impl Config {
    /// Current layout: `docs/`, cache busting, array codes, store list.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            cache_bust: true,
            code_schema: CodeSchema::Array,
            write_store_list: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn legacy(endpoint: Url) -> Self {
        Self {
            out_dir: PathBuf::from("."),
            cache_bust: false,
            code_schema: CodeSchema::Scalar,
            write_store_list: false,
            ..Self::new(endpoint)
        }
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::in_dir(&self.out_dir)
    }
}
