//! Data models for bills, offers, comparisons and configuration.

pub mod comparison;
pub mod config;
pub mod extraction;
pub mod offer;
