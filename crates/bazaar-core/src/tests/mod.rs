//! Test module for bazaar-core
//!
//! This module contains tests for:
//! - Filtering, sorting and pagination of the listing
//! - Recommendation scoring, cold start and similarity
//! - Interaction tracking and profile persistence
//! - Marketplace state, load tickets and theme
//! - Catalog fetching over HTTP
//! - Property checks for listing and scoring invariants

// Test modules use exact float comparisons and test-specific casts
#![allow(clippy::float_cmp, clippy::cast_possible_truncation)]

mod market_tests;
mod profile_tests;
