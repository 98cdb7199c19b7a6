use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Installs a terminal logger at `level`. A logger installed earlier stays in
/// place, so examples and tests may call this freely.
pub fn init_logger(level: LevelFilter) {
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::info;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_logger(LevelFilter::Info);
        init_logger(LevelFilter::Debug);
        info!("logger initialised twice");
    }
}
