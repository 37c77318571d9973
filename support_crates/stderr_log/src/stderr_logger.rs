use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct StderrLogger {
    pub initial_log_level: LevelFilter,
}

impl StderrLogger {
    pub const fn new(max_log_level: LevelFilter) -> StderrLogger {
        StderrLogger {
            initial_log_level: max_log_level,
        }
    }

    /// Register as the global logger and filter out everything above the initial level
    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self).map(|_| log::set_max_level(self.initial_log_level))
    }


    fn format(record: &Record) -> String {
        let level_moji = match record.level() {
            Level::Error => "❌",
            Level::Warn => "⚠️",
            Level::Info => "ℹ️",
            Level::Debug => "🛠️",
            Level::Trace => "👣",
        };
        format!("{}  {}: {}\n", level_moji, record.target(), record.args())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // there is nowhere left to report a failing stderr
            let _ = std::io::stderr()
                .lock()
                .write_all(Self::format(record).as_bytes());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_includes_target_and_message() {
        let line = StderrLogger::format(
            &Record::builder()
                .level(Level::Warn)
                .target("adt::tree")
                .args(format_args!("node at {:#x}", 0x40))
                .build(),
        );
        assert_eq!(line, "⚠️  adt::tree: node at 0x40\n");
    }

    #[test]
    fn install_applies_initial_level() {
        static LOGGER: StderrLogger = StderrLogger::new(LevelFilter::Debug);
        LOGGER.install().unwrap();
        assert_eq!(log::max_level(), LevelFilter::Debug);
        assert!(LOGGER.install().is_err());
    }

    #[test]
    fn format_marks_errors() {
        let line = StderrLogger::format(
            &Record::builder()
                .level(Level::Error)
                .target("devicetree_parse")
                .args(format_args!("failed"))
                .build(),
        );
        assert_eq!(line, "❌  devicetree_parse: failed\n");
    }
}
