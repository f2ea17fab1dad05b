//! Browse a remote feed of apps in a searchable terminal grid.
//!
//! The feed is fetched once when the grid is mounted and published through a [`store::FeedStore`], every cell
//! displays the app artwork (loaded in the background) along with its name, release date and copyright.
//!
//! # Features
//!
//! - Three-column grid with keyboard and mouse navigation
//! - Client-side substring search over the fetched apps
//! - Non-interactive `list` command, with optional JSON output

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod component;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod process;
pub mod service;
pub mod store;
pub mod tui;
pub mod utils;
pub mod widgets;
