use chrono::Local;
use env_logger::{Builder, Env};

use std::io::Write;

/// Log records are written to stderr as `[Jan  2 15:04:05] INFO: message`.
/// `RUST_LOG` overrides the level selected by `verbose`.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                Local::now().format("%b %e %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
