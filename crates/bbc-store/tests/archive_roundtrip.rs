use bbc_core::{BitMatrix, CodeConfig, DistanceOutcome, PolynomialTerm};
use bbc_store::{
    load_archive, save_archive, stable_hash_string, summarize, ConfigArchive, ParameterCount,
    DISTANCE_ARCHIVE, SEARCH_ARCHIVE,
};

fn record(ordinal: usize, k: usize, hash: &str, distance: Option<DistanceOutcome>) -> CodeConfig {
    let supports: Vec<Vec<usize>> = (0..k).map(|row| vec![row, row + k]).collect();
    let basis = BitMatrix::from_supports(72, &supports).unwrap();
    CodeConfig {
        l: 6,
        m: 6,
        weight: 6,
        ordinal,
        n_phys_qubits: 72,
        n_log_qubits: k,
        lz: basis.clone(),
        lx: basis,
        encoding_rate: k as f64 / 144.0,
        a_poly_sum: "x3 + y1 + y2".into(),
        b_poly_sum: "y3 + x1 + x2".into(),
        code_hash: hash.into(),
        a_terms: vec![PolynomialTerm::x(3), PolynomialTerm::y(1), PolynomialTerm::y(2)],
        b_terms: vec![PolynomialTerm::y(3), PolynomialTerm::x(1), PolynomialTerm::x(2)],
        distance,
    }
}

fn archive() -> ConfigArchive {
    let configs = vec![
        record(3, 12, "aa", Some(DistanceOutcome::Exact { distance: 6 })),
        record(
            9,
            12,
            "aa",
            Some(DistanceOutcome::Failed {
                reason: "solver error: time budget exhausted".into(),
                upper_bound: Some(8),
            }),
        ),
        record(17, 16, "bb", None),
    ];
    ConfigArchive::new(configs, "plan-hash".into(), "distance").unwrap()
}

#[test]
fn bincode_round_trip_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DISTANCE_ARCHIVE);
    let expected = archive();
    save_archive(&path, &expected).unwrap();

    let restored = load_archive(&path).unwrap();
    assert_eq!(restored, expected);
    assert!(!dir.path().join(format!("{DISTANCE_ARCHIVE}.tmp")).exists());
}

#[test]
fn json_round_trip_is_pretty_and_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("codes.json");
    let expected = archive();
    save_archive(&path, &expected).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"schema_version\""));
    assert!(text.contains("\"plan_hash\": \"plan-hash\""));
    assert_eq!(load_archive(&path).unwrap(), expected);
}

#[test]
fn tampered_archive_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SEARCH_ARCHIVE);
    let mut tampered = archive();
    tampered.configs[0].n_log_qubits = 99;
    save_archive(&path, &tampered).unwrap();

    let err = load_archive(&path).unwrap_err();
    assert_eq!(err.code(), "hash-mismatch");
}

#[test]
fn missing_archive_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_archive(&dir.path().join("absent.bin")).unwrap_err();
    assert_eq!(err.code(), "archive-read");
}

#[test]
fn stamping_tracks_the_configs() {
    let mut archive = archive();
    let before = archive.provenance.configs_hash.clone();
    assert_eq!(before, stable_hash_string(&archive.configs).unwrap());

    archive.configs.pop();
    archive.stamp("search").unwrap();
    assert_ne!(archive.provenance.configs_hash, before);
    assert_eq!(archive.provenance.stage, "search");
    archive.verify().unwrap();
}

#[test]
fn stamp_records_an_rfc3339_timestamp() {
    let before = chrono::Utc::now();
    let mut archive = archive();
    archive.stamp("distance").unwrap();

    let stamped = chrono::DateTime::parse_from_rfc3339(&archive.provenance.created_at).unwrap();
    assert!(stamped.timestamp() >= before.timestamp());
    assert!(stamped.timestamp() <= chrono::Utc::now().timestamp());
}

#[test]
fn summary_counts_distances_and_parameters() {
    let summary = summarize(&archive());
    assert_eq!(summary.stage, "distance");
    assert_eq!(summary.records, 3);
    assert_eq!(summary.distinct_codes, 2);
    assert_eq!(summary.distances_exact, 1);
    assert_eq!(summary.distances_failed, 1);
    assert_eq!(summary.distances_pending, 1);
    assert_eq!(summary.best_distance, Some(6));
    assert_eq!(summary.best_rate, Some(16.0 / 144.0));
    assert_eq!(
        summary.parameters,
        vec![
            ParameterCount { n: 72, k: 12, distance: None, count: 1 },
            ParameterCount { n: 72, k: 12, distance: Some(6), count: 1 },
            ParameterCount { n: 72, k: 16, distance: None, count: 1 },
        ]
    );
}
