/*!
 * Tests for the console and file logger
 */

use anyhow::Result;
use log::{Level, LevelFilter, Log, Record};
use std::fs;
use backtranslate::logging::CustomLogger;
use backtranslate::progress::{CYCLE_COMPLETED_METRIC, MetricRecord};
use crate::common;

fn log_line(logger: &CustomLogger, level: Level, target: &str, message: &str) {
    logger.log(
        &Record::builder()
            .args(format_args!("{}", message))
            .level(level)
            .target(target)
            .build(),
    );
}

#[test]
fn test_logFile_withWarnConsoleLevel_shouldStillContainMetricAndCycleLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("logs").join("backtranslate.log");
    let logger = CustomLogger::new(LevelFilter::Warn);
    logger.attach_file(&path)?;

    let metric = MetricRecord { step: 1, name: CYCLE_COMPLETED_METRIC, value: 1.0 };
    log_line(&logger, Level::Info, "metrics", &metric.to_string());
    log_line(&logger, Level::Info, "backtranslate::progress", "--- Cycle 1 completed. ---");
    log_line(&logger, Level::Debug, "backtranslate::cycle_executor", "Picked doc.txt");
    logger.flush();

    let content = fs::read_to_string(&path)?;
    assert!(
        content.contains(" - metrics - INFO - Metric - Step: 1, Name: cycle_completed, Value: 1"),
        "log file was {:?}",
        content
    );
    assert!(content.contains("--- Cycle 1 completed. ---"));
    assert!(!content.contains("Picked doc.txt"));
    Ok(())
}

#[test]
fn test_logFile_withDebugConsoleLevel_shouldFollowConsoleLevel() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("backtranslate.log");
    let logger = CustomLogger::new(LevelFilter::Debug);
    logger.attach_file(&path)?;

    log_line(&logger, Level::Debug, "backtranslate::cycle_executor", "Picked doc.txt");
    log_line(&logger, Level::Trace, "backtranslate::cycle_executor", "Raw response");
    logger.flush();

    let content = fs::read_to_string(&path)?;
    assert!(content.contains("DEBUG - Picked doc.txt"));
    assert!(!content.contains("Raw response"));
    Ok(())
}
