//! Domain primitives shared by every Sweep REF crate.
//!
//! Nothing in here performs I/O: the database and HTTP layers build on these
//! types and helpers so they can be unit-tested in isolation.

pub mod error;
pub mod hashing;
pub mod identity;
pub mod msk;
pub mod secrets;
pub mod slug;
pub mod summary;
pub mod types;
