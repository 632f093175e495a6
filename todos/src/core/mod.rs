//! Deterministic, pure logic over the to-do collection.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! collections and return deterministic outputs suitable for tests.

pub mod ids;
pub mod invariants;
