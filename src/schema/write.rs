use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use super::{StatusRecord, StockSnapshot, StoreEntry};

pub const STOCK_FILE: &str = "live_stock.json";
pub const STATUS_FILE: &str = "update_status.json";
pub const STORE_LIST_FILE: &str = "listtoko.txt";
pub const STORE_LIST_HEADER: &str = "kodetoko,namatoko";

/// Where the three artifacts land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub stock: PathBuf,
    pub status: PathBuf,
    pub store_list: PathBuf,
}

impl OutputPaths {
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        Self {
            stock: dir.join(STOCK_FILE),
            status: dir.join(STATUS_FILE),
            store_list: dir.join(STORE_LIST_FILE),
            dir,
        }
    }
}

/// Pretty-print with a trailing newline. Non-ASCII is written as-is.
fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("serializing JSON")?;
    out.push('\n');
    Ok(out)
}

pub fn render_snapshot(snapshot: &StockSnapshot) -> Result<String> {
    render_json(snapshot)
}

pub fn render_status(generated_at: DateTime<Local>) -> Result<String> {
    render_json(&StatusRecord {
        last_updated: generated_at.to_rfc3339_opts(SecondsFormat::Micros, false),
    })
}

/// `kodetoko,namatoko` header, then one `code,name` line per store in set order.
pub fn render_store_list(stores: &BTreeSet<StoreEntry>) -> String {
    let mut out = String::with_capacity(STORE_LIST_HEADER.len() + 1 + stores.len() * 24);
    out.push_str(STORE_LIST_HEADER);
    out.push('\n');
    for store in stores {
        out.push_str(&store.code);
        out.push(',');
        out.push_str(&store.name);
        out.push('\n');
    }
    out
}

/// Write `contents` to `path` through a temp file in the same directory,
/// then rename over the target. The temp file is removed if any step fails.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let result = write_and_rename(&tmp_path, path, contents);
    if result.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!(path = %tmp_path.display(), error = %e, "could not remove temp file");
        }
    }
    result
}

fn write_and_rename(tmp_path: &Path, path: &Path, contents: &str) -> Result<()> {
    let mut tmp = fs::File::create(tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    tmp.sync_all()
        .with_context(|| format!("flushing {}", tmp_path.display()))?;
    drop(tmp);

    fs::rename(tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    info!(dir = %dir.display(), "creating output directory");
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}

/// Render every artifact, then write them all. Returns the paths written,
/// in write order.
///
/// Rendering happens before the first file is touched, so a serialization
/// failure leaves the previous outputs in place.
pub fn write_outputs(
    paths: &OutputPaths,
    snapshot: &StockSnapshot,
    stores: Option<&BTreeSet<StoreEntry>>,
    generated_at: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    let mut rendered = vec![
        (paths.stock.clone(), render_snapshot(snapshot)?),
        (paths.status.clone(), render_status(generated_at)?),
    ];
    if let Some(stores) = stores {
        rendered.push((paths.store_list.clone(), render_store_list(stores)));
    }

    ensure_dir(&paths.dir)?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, contents) in rendered {
        write_atomic(&path, &contents)?;
        info!(path = %path.display(), bytes = contents.len(), "wrote");
        written.push(path);
    }
    Ok(written)
}
