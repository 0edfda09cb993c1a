//! Small helpers shared by the rotator crates.

pub mod env;
