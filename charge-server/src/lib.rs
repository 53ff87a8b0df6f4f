//! EV charging station finder.
//!
//! Fetches charging stations for a region from Open Charge Map, normalizes
//! and enriches them, finds the one nearest to a reference point and
//! filters the rest by city, speed tier and rating.

pub mod config;
pub mod domain;
pub mod ocm;
pub mod pipeline;
pub mod web;
