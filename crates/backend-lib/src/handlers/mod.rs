// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP endpoint bodies.

pub mod devices;
pub mod index;
pub mod relay;
pub mod signin;
