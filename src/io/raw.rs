//! Raw response snapshots and the shop display-name lookup.
//!
//! A saved raw response is the "portable" form of one API call: it can be
//! replayed offline with `dh file` and makes a good regression fixture when
//! the upstream schema drifts again.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::error::AppError;

/// Save a raw API response as pretty-printed JSON.
pub fn write_raw_json(path: &Path, raw: &Value) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::config(format!("Failed to create raw JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, raw)
        .map_err(|e| AppError::config(format!("Failed to write raw JSON: {e}")))?;

    Ok(())
}

/// Load a previously saved raw API response.
pub fn read_raw_json(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open raw JSON '{}': {e}", path.display()))
    })?;

    serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid raw JSON '{}': {e}", path.display())))
}

/// Load a shop display-name lookup from a JSON file.
///
/// Expected form: an object mapping shop id (stringified integer) to name,
/// e.g. `{"101": "Amsterdam Centraal"}`.
pub fn load_shop_names(path: &Path) -> Result<HashMap<i64, String>, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::config(format!("Failed to read shop names '{}': {e}", path.display()))
    })?;
    parse_shop_names(&text)
        .map_err(|e| AppError::config(format!("Invalid shop names '{}': {e}", path.display())))
}

fn parse_shop_names(text: &str) -> Result<HashMap<i64, String>, String> {
    let raw: HashMap<String, String> =
        serde_json::from_str(text).map_err(|e| e.to_string())?;

    let mut names = HashMap::with_capacity(raw.len());
    for (key, name) in raw {
        let id = key
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("shop id key '{key}' is not an integer"))?;
        names.insert(id, name);
    }
    Ok(names)
}
