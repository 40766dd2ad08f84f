//! Exoplanet Explorer: fetch confirmed exoplanets from the NASA Exoplanet
//! Archive, filter and classify them, and render an egui dashboard with an
//! optional AI-written summary.
//!
//! The entry points the dashboard needs are
//! [`ArchiveClient::fetch_dataset`](data::archive::ArchiveClient::fetch_dataset),
//! [`filter_dataset`](data::filter::filter_dataset) and
//! [`is_habitable`](data::habitable::is_habitable).

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod jobs;
pub mod state;
pub mod summary;
pub mod ui;
