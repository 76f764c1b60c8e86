//! Global logger setup.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// The display backend owns the terminal in raw mode, so by default only
/// errors get through. `verbose` raises the level to debug and `RUST_LOG`
/// overrides both; redirect stderr to a file to read the stream without
/// scrambling the frame.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };

    let env = Env::default().default_filter_or(level.to_string());

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = Builder::from_env(env).try_init();
}
