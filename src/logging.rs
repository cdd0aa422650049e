//! Logging setup shared by the binaries.
//!
//! Logs go to stderr so stdout stays free for command output and for the MCP
//! stdio transport. `RUST_LOG` overrides the default level.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(default_level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
