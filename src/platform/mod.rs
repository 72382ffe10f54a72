// LedgerSift - platform/mod.rs
//
// Platform abstraction layer: filesystem access and configuration.
// Dependencies: standard library, directories crate, core value types.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
