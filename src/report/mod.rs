//! Presentation of finished builds: console listing and plot-ready CSV.

pub mod export_csv;
pub mod text;
