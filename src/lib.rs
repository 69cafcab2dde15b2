//! Mock pulse-optimisation backend: a formula engine that fakes a training
//! run for a handful of graph and MLP models, served over a small HTTP API.

pub mod api;
pub mod config;
pub mod core;
pub mod error;
