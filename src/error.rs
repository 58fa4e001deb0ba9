use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Startup failures.  The game loop itself only fails on terminal I/O.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}")]
    TooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    #[error("invalid {key}={value:?}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("cannot create log file {}: {source}", .path.display())]
    Log { path: PathBuf, source: io::Error },
}
