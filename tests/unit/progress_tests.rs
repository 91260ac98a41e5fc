/*!
 * Tests for the cycle progress recorder
 */

use std::sync::Arc;
use backtranslate::progress::{CYCLE_COMPLETED_METRIC, MemoryMetricSink, ProgressRecorder};

#[test]
fn test_recordCycleCompletion_withFreshRecorder_shouldStartAtOne() {
    let recorder = ProgressRecorder::with_sink(MemoryMetricSink::new());
    assert_eq!(recorder.cycles_completed(), 0);
    assert_eq!(recorder.record_cycle_completion(), 1);
}

#[test]
fn test_recordCycleCompletion_shouldEmitMetricPerCycle() {
    let sink = MemoryMetricSink::new();
    let recorder = ProgressRecorder::with_sink(sink.clone());

    for _ in 0..3 {
        recorder.record_cycle_completion();
    }

    let records = sink.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.name == CYCLE_COMPLETED_METRIC));
    assert_eq!(records.iter().map(|r| r.value).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    assert_eq!(records[2].to_string(), "Metric - Step: 3, Name: cycle_completed, Value: 3");
}

#[test]
fn test_separateRecorders_shouldKeepSeparateCounters() {
    let first = Arc::new(ProgressRecorder::with_sink(MemoryMetricSink::new()));
    let second = ProgressRecorder::with_sink(MemoryMetricSink::new());

    first.record_cycle_completion();
    first.record_cycle_completion();

    assert_eq!(first.cycles_completed(), 2);
    assert_eq!(second.cycles_completed(), 0);
}
