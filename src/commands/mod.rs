//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - start: Start the rates server
//! - test: Test configuration validity
//! - config: Configuration display and validation
//! - seed: Apply the shipped pricing seed data

pub mod config;
pub mod seed;
pub mod start;
