//! Shared test utilities for memo integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Clocks are deterministic so timestamp ordering in a
//! harness never depends on wall-clock resolution.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
