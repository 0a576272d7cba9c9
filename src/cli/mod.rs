//! Command handlers
//!
//! Each handler reads its inputs, calls into the shopping core and writes a
//! JSON document to `out`. Logs go through `tracing`, never to `out`.

mod ingredient;
mod list;

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub use ingredient::{combine, parse};
pub use list::{duplicates, reconcile};

/// `-` on the command line stands for an absent value
pub(crate) fn optional_arg(value: &str) -> Option<&str> {
    match value.trim() {
        "-" | "" => None,
        value => Some(value),
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ReadError {
        path: display.clone(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| AppError::InputError { path: display, source })
}

pub(crate) fn write_json<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value).map_err(AppError::from)?;
    } else {
        serde_json::to_writer(&mut *out, value).map_err(AppError::from)?;
    }
    writeln!(out)?;

    Ok(())
}
