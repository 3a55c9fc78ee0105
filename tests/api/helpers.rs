//! tests/api/helpers.rs
use gocount::configuration::{ClusterSettings, JobSettings, Settings, TelemetrySettings};
use gocount::mappers::DEFAULT_TERM_CODES;
use gocount::telemetry::init_tracing;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let settings = TelemetrySettings {
        log_level: "warn".into(),
        ..Default::default()
    };
    let _ = init_tracing(&settings).expect("Failed to setup tracing");
});

pub fn test_data_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path
}

pub fn annotations_dir() -> PathBuf {
    test_data_dir().join("annotations")
}

pub fn scratch_dir() -> PathBuf {
    let path = std::env::temp_dir()
        .join("gocount-api")
        .join(Uuid::new_v4().to_string());
    fs::create_dir_all(&path).expect("Failed to create test directory");
    path
}

pub fn settings(workers: usize, reduce_tasks: usize, combine: bool) -> Settings {
    LazyLock::force(&TRACING);
    Settings {
        cluster: ClusterSettings {
            workers,
            reduce_tasks,
        },
        job: JobSettings {
            combine,
            term_codes: DEFAULT_TERM_CODES.iter().map(|c| c.to_string()).collect(),
        },
        telemetry: TelemetrySettings::default(),
    }
}

/// Sorted records of every part file in `dir`.
pub fn read_output(dir: &Path) -> Vec<String> {
    let mut records = vec![];
    for entry in fs::read_dir(dir).expect("Failed to list output directory") {
        let path = entry.expect("Failed to read entry").path();
        let is_part = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with("part-r-"));
        if is_part {
            let contents = fs::read_to_string(&path).expect("Failed to read part file");
            records.extend(contents.lines().map(String::from));
        }
    }
    records.sort();
    records
}

pub fn expected_annotation_counts() -> Vec<String> {
    vec![
        "bsub.gaf\tP39148\tGO:0030420\t2".to_string(),
        "bsub.gaf\tP39148\tGO:0045809\t1".to_string(),
        "spne.gaf\tP39148\tGO:0030420\t1".to_string(),
        "spne.gaf\tQ8DN\tGO:0045304\t1".to_string(),
        "spne.gaf\tQ8DN\tGO:0045808\t2".to_string(),
    ]
}
