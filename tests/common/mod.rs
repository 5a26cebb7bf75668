//! Shared test fixtures for the unit and proptest targets.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;
