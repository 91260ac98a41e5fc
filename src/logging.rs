use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

// @module: Console and file logger

/// Lowest verbosity the log file ever runs at, so cycle and metric lines
/// reach it whatever the console level is
pub const FILE_LEVEL: LevelFilter = LevelFilter::Info;

static LOGGER: Lazy<CustomLogger> = Lazy::new(|| CustomLogger::new(LevelFilter::Info));

// @struct: Custom logger implementation
pub struct CustomLogger {
    console_level: RwLock<LevelFilter>,
    file: OnceCell<Mutex<File>>,
}

impl CustomLogger {
    // @creates: New logger with specified console level and no file
    pub fn new(console_level: LevelFilter) -> Self {
        CustomLogger {
            console_level: RwLock::new(console_level),
            file: OnceCell::new(),
        }
    }

    // @initializes: Global logger
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&*LOGGER)?;
        set_level(level);
        Ok(())
    }

    pub fn console_level(&self) -> LevelFilter {
        *self.console_level.read()
    }

    pub fn set_console_level(&self, level: LevelFilter) {
        *self.console_level.write() = level;
    }

    /// Threshold for the file sink: the console level, but never quieter than `FILE_LEVEL`
    pub fn file_level(&self) -> LevelFilter {
        self.console_level().max(FILE_LEVEL)
    }

    /// Open `path` for appending (creating parent directories) and mirror log
    /// lines into it from now on
    ///
    /// Only the first attached file is used.
    pub fn attach_file(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if self.file.set(Mutex::new(file)).is_err() {
            log::warn!("Log file already attached, ignoring {:?}", path);
        }
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

/// Change the console level of the global logger
///
/// The global max level stays at `FILE_LEVEL` or above so the log file keeps
/// receiving info records.
pub fn set_level(level: LevelFilter) {
    LOGGER.set_console_level(level);
    log::set_max_level(LOGGER.file_level());
}

/// Attach the log file of the global logger
pub fn attach_log_file(path: &Path) -> std::io::Result<()> {
    LOGGER.attach_file(path)
}

/// Format one log file line: `<timestamp> - <target> - <LEVEL> - <message>`
pub fn format_file_line(timestamp: &str, record: &Record) -> String {
    format!("{} - {} - {} - {}", timestamp, record.target(), record.level(), record.args())
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = metadata.level();
        level <= self.console_level() || (self.file.get().is_some() && level <= self.file_level())
    }

    fn log(&self, record: &Record) {
        let level = record.level();
        let now = chrono::Local::now();

        if level <= self.console_level() {
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now.format("%H:%M:%S%.3f"),
                Self::get_emoji_for_level(level),
                record.args()
            );
        }

        if let Some(file) = self.file.get() {
            if level <= self.file_level() {
                let line = format_file_line(&now.format("%Y-%m-%d %H:%M:%S,%3f").to_string(), record);
                let _ = writeln!(file.lock(), "{}", line);
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = self.file.get() {
            let _ = file.lock().flush();
        }
    }
}
