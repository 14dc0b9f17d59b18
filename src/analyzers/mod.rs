//! Bucketing and percentile reduction.
//!
//! Rows are classified into (sex, weight class, age bracket) buckets, lift
//! values are collected per bucket, and each bucket that meets its minimum
//! sample size is reduced to a fixed set of interpolated percentiles.

pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod reduce;
pub mod types;
