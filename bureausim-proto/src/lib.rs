//! Shared protocol definitions for the Bureausim REST contract.
//!
//! Every type in this crate is serialized as camelCase JSON, matching the
//! front-desk backend. Both the client and the development desk depend on
//! it so the two sides cannot drift apart.

pub mod department;
pub mod envelope;
pub mod leaderboard;
pub mod payload;
pub mod score;
pub mod task;
