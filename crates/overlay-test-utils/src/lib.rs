//! Shared test utilities for the overlay workspace.
//!
//! This crate provides standardised layer fixtures to avoid duplicating
//! directory setup across crate test suites. It is a dev-dependency only and
//! never published.
//!
//! # Modules
//!
//! - [`layers`]: [`TestLayers`] builder for a project with layered public dirs

pub mod layers;

pub use layers::TestLayers;
