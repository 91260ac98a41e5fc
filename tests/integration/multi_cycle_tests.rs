/*!
 * Integration tests for multi-cycle runs
 */

use anyhow::Result;
use std::sync::Arc;
use backtranslate::app_config::TranslationDirection::{self, EnToFr, FrToEn};
use backtranslate::app_controller::{Controller, StopReason};
use backtranslate::progress::{MemoryMetricSink, ProgressRecorder};
use backtranslate::providers::mock::MockBackend;
use crate::common::TestPools;

fn controller(
    pools: &TestPools,
    cycles: i64,
    initial: TranslationDirection,
    backend: &MockBackend,
    sink: &MemoryMetricSink,
) -> Controller {
    let config = pools.config(cycles, initial);
    Controller::new(&config, Arc::new(backend.clone()))
        .with_recorder(Arc::new(ProgressRecorder::with_sink(sink.clone())))
}

#[tokio::test]
async fn test_run_withEvenCycleCount_shouldAlternateStartingFromInitial() -> Result<()> {
    let pools = TestPools::new()?;
    for i in 0..3 {
        pools.add_input(EnToFr, &format!("doc{}.txt", i), "Hello")?;
    }
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();

    let summary = controller(&pools, 4, EnToFr, &backend, &sink).run().await;

    assert!(matches!(summary.stop_reason, StopReason::Completed));
    assert_eq!(summary.cycles_completed, 4);
    let directions: Vec<TranslationDirection> = summary.reports.iter().map(|r| r.direction).collect();
    assert_eq!(directions, vec![EnToFr, FrToEn, EnToFr, FrToEn]);

    let targets: Vec<String> = backend.requests().into_iter().map(|r| r.target_language).collect();
    assert_eq!(targets, vec!["fr", "en", "fr", "en"]);
    Ok(())
}

#[tokio::test]
async fn test_run_withFrenchInitialDirection_shouldStartFromFrenchPool() -> Result<()> {
    let pools = TestPools::new()?;
    pools.add_input(FrToEn, "doc.txt", "Bonjour")?;
    pools.add_input(EnToFr, "other.txt", "Hello")?;
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();

    let summary = controller(&pools, 2, FrToEn, &backend, &sink).run().await;

    let directions: Vec<TranslationDirection> = summary.reports.iter().map(|r| r.direction).collect();
    assert_eq!(directions, vec![FrToEn, EnToFr]);
    assert_eq!(pools.read_output(FrToEn, "doc.txt")?, "[en] Bonjour");
    Ok(())
}

#[tokio::test]
async fn test_run_withZeroOrNegativeCycles_shouldDoNothing() -> Result<()> {
    for cycles in [0, -5] {
        let pools = TestPools::new()?;
        pools.add_input(EnToFr, "doc.txt", "Hello")?;
        let backend = MockBackend::working();
        let sink = MemoryMetricSink::new();

        let summary = controller(&pools, cycles, EnToFr, &backend, &sink).run().await;

        assert_eq!(summary.cycles_completed, 0);
        assert!(matches!(summary.stop_reason, StopReason::Completed));
        assert_eq!(backend.call_count(), 0);
        assert!(sink.records().is_empty());
        assert_eq!(pools.inputs(EnToFr), vec!["doc.txt".to_string()]);
        assert!(pools.outputs(EnToFr).is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn test_run_withEmptyInputPool_shouldStopEarly() -> Result<()> {
    let pools = TestPools::new()?;
    pools.add_input(EnToFr, "only.txt", "Hello")?;
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();

    // en_to_fr then fr_to_en consume the single file; the third cycle finds input_pool empty
    let summary = controller(&pools, 10, EnToFr, &backend, &sink).run().await;

    assert_eq!(summary.cycles_completed, 2);
    match &summary.stop_reason {
        StopReason::PoolExhausted(dir) => assert_eq!(dir, &pools.layout.input_dir(EnToFr)),
        other => panic!("expected pool exhaustion, got {:?}", other),
    }
    assert_eq!(pools.read_output(FrToEn, "only.txt")?, "[en] [fr] Hello");
    assert!(!summary.is_failure());
    Ok(())
}

#[tokio::test]
async fn test_run_withEmptyPoolOnFirstCycle_shouldRecordNothing() -> Result<()> {
    let pools = TestPools::new()?;
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();

    let summary = controller(&pools, 3, EnToFr, &backend, &sink).run().await;

    assert_eq!(summary.cycles_completed, 0);
    assert!(matches!(summary.stop_reason, StopReason::PoolExhausted(_)));
    assert!(sink.records().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_run_withThreeSuccessfulCycles_shouldRecordOneTwoThree() -> Result<()> {
    let pools = TestPools::new()?;
    pools.add_input(EnToFr, "a.txt", "Hello")?;
    pools.add_input(EnToFr, "b.txt", "World")?;
    let backend = MockBackend::reversing();
    let sink = MemoryMetricSink::new();
    let recorder = Arc::new(ProgressRecorder::with_sink(sink.clone()));

    let summary = Controller::new(&pools.config(3, EnToFr), Arc::new(backend.clone()))
        .with_recorder(Arc::clone(&recorder))
        .run()
        .await;

    assert_eq!(summary.cycles_completed, 3);
    assert_eq!(recorder.cycles_completed(), 3);
    let steps: Vec<u64> = sink.records().iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingBackend_shouldStillCountCycles() -> Result<()> {
    let pools = TestPools::new()?;
    pools.add_input(EnToFr, "doc.txt", "Hello")?;
    let backend = MockBackend::failing();
    let sink = MemoryMetricSink::new();

    let summary = controller(&pools, 2, EnToFr, &backend, &sink).run().await;

    // The diagnostic written to french_pool becomes the next cycle's input
    assert_eq!(summary.cycles_completed, 2);
    assert!(pools.read_output(FrToEn, "doc.txt")?.starts_with("TRANSLATION_ERROR:"));
    assert_eq!(sink.records().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_withCancelledHandle_shouldStopBeforeFirstCycle() -> Result<()> {
    let pools = TestPools::new()?;
    pools.add_input(EnToFr, "doc.txt", "Hello")?;
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();
    let controller = controller(&pools, 5, EnToFr, &backend, &sink);

    controller.cancel_handle().cancel();
    let summary = controller.run().await;

    assert!(matches!(summary.stop_reason, StopReason::Cancelled));
    assert_eq!(summary.cycles_completed, 0);
    assert_eq!(backend.call_count(), 0);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_withUnreadableInput_shouldStopWithFailure() -> Result<()> {
    let pools = TestPools::new()?;
    let path = pools.add_input(EnToFr, "broken.txt", "")?;
    std::fs::write(&path, [0xc3, 0x28])?;
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();

    let summary = controller(&pools, 3, EnToFr, &backend, &sink).run().await;

    assert!(summary.is_failure());
    assert_eq!(summary.cycles_completed, 0);
    assert!(sink.records().is_empty());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_withDanglingSymlinkInPool_shouldProcessRegularFile() -> Result<()> {
    let pools = TestPools::new()?;
    pools.add_input(EnToFr, "good.txt", "Hello")?;
    let input_dir = pools.layout.input_dir(EnToFr);
    std::os::unix::fs::symlink(input_dir.join("missing-target.txt"), input_dir.join("stale.lnk"))?;
    let backend = MockBackend::working();
    let sink = MemoryMetricSink::new();

    let summary = controller(&pools, 1, EnToFr, &backend, &sink).run().await;

    assert!(matches!(summary.stop_reason, StopReason::Completed));
    assert_eq!(summary.cycles_completed, 1);
    assert_eq!(pools.read_output(EnToFr, "good.txt")?, "[fr] Hello");
    Ok(())
}
