//! `bureausim`: terminal bureaucracy simulator library.
//!
//! The binary wires these together: [`config`] resolves settings, [`net`]
//! runs backend calls through [`api`], [`app`] drives the [`session`] and
//! [`tasks`], and [`ui`] draws it all.

pub mod api;
pub mod app;
pub mod config;
pub mod net;
pub mod session;
pub mod tasks;
pub mod ui;
