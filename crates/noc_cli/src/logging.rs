use tracing::Level;

use crate::UsageError;

/// Install the stderr fmt subscriber at `level`.
///
/// Safe to call more than once; only the first call in a process installs a subscriber.
pub fn init(level: &str) -> Result<(), UsageError> {
    let level: Level = level
        .trim()
        .parse()
        .map_err(|_| UsageError::new(format!("unknown log level \"{level}\"")))?;
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
    Ok(())
}
