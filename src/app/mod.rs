// LedgerSift - app/mod.rs
//
// Application layer: orchestrates core logic and platform I/O for a
// single invocation.

pub mod job;
pub mod settings;
