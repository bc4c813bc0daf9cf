use std::{fs, sync::atomic::Ordering, thread, time::Duration};

use tempfile::tempdir;
use tmrlog_core::{header_line, read_samples};
use tmrlog_recorder::{DeviceKind, RecorderConfig, RecordingPipeline};

fn sim_config(output_path: std::path::PathBuf) -> RecorderConfig {
    RecorderConfig {
        device: DeviceKind::Simulated,
        output_path,
        max_batches: Some(2),
        stats_interval_secs: 60,
        ..Default::default()
    }
}

#[test]
fn test_integration_simulated_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");

    let config = sim_config(path.clone());
    config.validate().unwrap();
    let (pipeline, metrics) = RecordingPipeline::new(config);
    pipeline.run().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().next().unwrap(), header_line());

    let samples = read_samples(&path).unwrap();
    assert_eq!(samples.len(), 200);
    assert_eq!(metrics.batches_flushed.load(Ordering::Relaxed), 2);

    // Метки времени не убывают внутри файла
    for pair in samples.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn test_integration_ctrlc_style_stop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");

    let mut config = sim_config(path.clone());
    config.max_batches = None;

    let (pipeline, metrics) = RecordingPipeline::new(config);
    let stop = pipeline.stop_flag();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(600));
        stop.store(true, Ordering::Relaxed);
    });

    pipeline.run().unwrap();

    // Пишутся только полные пачки
    let batches = metrics.batches_flushed.load(Ordering::Relaxed);
    assert!(batches >= 1);
    assert_eq!(read_samples(&path).unwrap().len() as u64, batches * 100);
}
