//! Accident-probability prediction pipeline for the NYC grid.
//!
//! For a given timestamp, estimates the probability of a traffic accident at
//! each of many candidate coordinates across the city: per-borough weather is
//! fetched concurrently from Open-Meteo and normalized into canonical metric
//! records, a fixed grid of candidate points is sampled deterministically,
//! temporal/weather/spatial features are assembled in the classifier's
//! contracted column order, and raw scores are calibrated batch-relative into
//! a usable [0, 1] spread.

pub mod config;
pub mod error;
pub mod features;
pub mod geo;
pub mod logger;
pub mod pipeline;
pub mod scoring;
pub mod weather;
