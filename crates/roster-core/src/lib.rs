//! Core types, rules and the store trait for the Roster enrollment backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! ownership checks and the request/approve state machine live here, written
//! against [`store::ClassroomStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod class;
pub mod enrollment;
pub mod error;
pub mod id;
pub mod identity;
pub mod registry;
pub mod store;
pub mod workflow;

pub use error::{Error, ErrorKind, Result};
