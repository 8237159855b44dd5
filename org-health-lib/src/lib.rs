#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for org-health
//!
//! This library consolidates all functionality for the org-health tool, which scores
//! the repositories of a GitHub organization for signs of healthy maintenance.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Repository data retrieval, caching and rate limit handling
//! - [`selection`]: Filtering and ranking of the repositories worth scoring
//! - [`scoring`]: The weighted health score
//! - [`reports`]: Report generation and persistence
//! - [`analysis`]: The fetch, select, score and export pipeline
//! - [`server`]: HTTP front end

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod analysis;
pub mod commands;
pub mod facts;
pub mod reports;
pub mod scoring;
pub mod selection;
pub mod server;

pub use crate::commands::{Host, run};
