//! Bureausim front desk library.
//!
//! A development backend speaking the Bureausim REST contract. Exposed as a
//! library so client integration tests can run it in-process.

pub mod config;
pub mod desk;
pub mod fixtures;
pub mod store;
