use clap::ValueEnum;
use serde::Deserialize;

mod feed;

pub use feed::*;

/// How the search query is matched against the feed entries
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Deserialize, ValueEnum, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterMode {
    /// Match against each field of the entry
    #[default]
    Fields,
    /// Match against the debug representation of the whole entry
    Structural,
}
