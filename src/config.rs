//! Command-line configuration.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Significant (M6+) earthquakes from the USGS catalogue, newest first.
pub const DEFAULT_FEED_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&eventtype=earthquake&orderby=time&minmag=6&limit=10";

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// GeoJSON feed to load.  Pass an empty string to run without a feed.
    #[arg(value_name = "URL", conflicts_with = "url_flag")]
    url_arg: Option<String>,

    /// Same as the positional URL.
    #[arg(long = "url", value_name = "URL")]
    url_flag: Option<String>,

    /// Give up on a fetch after this many seconds.
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// UI refresh interval in milliseconds.
    #[arg(
        long = "tick",
        value_name = "MS",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_ms: u64,

    /// Write logs to this file (filtered by RUST_LOG).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn parse_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::parse_from(args)
    }

    /// The feed URL, from `--url`, the positional argument, or the default.
    pub fn url(&self) -> &str {
        self.url_flag
            .as_deref()
            .or(self.url_arg.as_deref())
            .unwrap_or(DEFAULT_FEED_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
