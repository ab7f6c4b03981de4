//! MatCalc-rs library — application logic for the matrix multiplication benchmark.

pub mod app;
pub mod config;
pub mod errors;
