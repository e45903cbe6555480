//! Bookstore application library
//!
//! The books module and the bootstrap routines shared by the `bookstore`
//! binary and the CLI.

pub mod app;
pub mod modules;
