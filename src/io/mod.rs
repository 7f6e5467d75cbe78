//! File IO: CSV exports, raw response snapshots, shop-name lookup.

pub mod export;
pub mod raw;
