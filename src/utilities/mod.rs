/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// utilities module
//
// logger set up and rng seeding shared by the binary and the tests
//
////////////////////////////////////////////////////////////////////////////////////

use crate::error::{Result, SimError};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ISO 8601 timestamp and color coded level tag
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

/// Console logger configuration at the given level.
pub fn logging_config(level: LevelFilter) -> Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let root = Root::builder().appender("stdout").build(level);
    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(root)
        .map_err(|e| SimError::invariant(format!("failed to build log config: {}", e)))
}

/// Installs the global logger. Can only succeed once per process.
pub fn init_logging(level: LevelFilter) -> Result<()> {
    let config = logging_config(level)?;
    log4rs::init_config(config)
        .map(|_| ())
        .map_err(|e| SimError::invariant(format!("failed to install logger: {}", e)))
}

// "info", "debug" ... case insensitive
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| SimError::validation(format!("unknown log level {}", level)))
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
