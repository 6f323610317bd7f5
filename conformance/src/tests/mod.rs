//! Fixture corpus shared by the validators.

pub mod fixtures;
