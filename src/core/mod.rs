//! Core functionality of the engine

pub mod batch;
