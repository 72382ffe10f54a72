// LedgerSift - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or touch the filesystem directly.

pub mod export;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod numeric;
pub mod pipeline;
pub mod targets;
