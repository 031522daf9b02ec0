use std::path::PathBuf;

use clap::Parser;

use crate::{storage::DEFAULT_OUTPUT_FILE, tasks::delay::DelayWindow};

#[derive(Parser, Debug)]
#[command(
    name = "site-index-checker",
    about = "Check which domains a search engine has indexed using site: queries",
    version,
    long_about = None
)]
pub struct Args {
    /// Text file with one domain per line
    #[arg(env = "DOMAINS_FILE")]
    pub input: PathBuf,

    /// Where to write the result CSV
    #[arg(short, long, env = "OUTPUT_FILE", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Random pause between queries in seconds, as MIN-MAX
    #[arg(short, long, env = "DELAY_RANGE", default_value = "3-7")]
    pub delay: DelayWindow,

    /// Save every fetched result page to DEBUG_DIR
    #[arg(long, env = "CHECKER_DEBUG")]
    pub debug: bool,
}
