// lib.rs - Library exports for the service binary and integration tests

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod math;
pub mod models;
pub mod web;
