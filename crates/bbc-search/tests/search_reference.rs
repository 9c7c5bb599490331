use bbc_code::{bicycle_checks, GeneratorSet, Polynomial};
use bbc_search::{net_encoding_rate, search, RangeSpec, Scheduler, SearchPlan};

#[test]
fn reference_run_finds_the_72_qubit_code() {
    let plan = SearchPlan::default();
    let report = search(&plan).expect("reference plan is valid");

    assert!(!report.configs.is_empty());
    assert!(report.skipped_pairs.is_empty());
    assert_eq!(report.counters.failed, 0);
    assert_eq!(report.counters.examined, 5 * 64 * 729);
    assert_eq!(report.counters.accepted, report.configs.len());
    assert!(report.distinct_codes >= 1 && report.distinct_codes <= report.configs.len());

    let threshold = plan.rate_filter().unwrap().threshold();
    for config in &report.configs {
        assert_eq!((config.l, config.m), (6, 6));
        assert_eq!(config.n_phys_qubits, 72);
        assert_eq!(
            config.encoding_rate,
            net_encoding_rate(config.n_log_qubits, config.n_phys_qubits)
        );
        assert!(config.encoding_rate > threshold);
        assert_eq!(config.lx.rows(), config.n_log_qubits);
        assert_eq!(config.lz.cols(), config.n_phys_qubits);
    }

    assert!(report
        .configs
        .iter()
        .any(|config| config.a_poly_sum == "x3 + y1 + y2"
            && config.b_poly_sum == "y3 + x1 + x2"
            && config.n_log_qubits == 12));
}

#[test]
fn accepted_records_regenerate_commuting_checks() {
    let plan = SearchPlan {
        l: RangeSpec::new(3, 5),
        m: RangeSpec::single(3),
        weight: RangeSpec::single(4),
        exponents_a: RangeSpec::new(0, 3),
        exponents_b: RangeSpec::new(0, 3),
        rate_threshold: Some(0.0),
        ..SearchPlan::default()
    };
    let report = search(&plan).unwrap();
    assert!(!report.configs.is_empty());

    for config in &report.configs {
        let generators = GeneratorSet::build(config.l, config.m).unwrap();
        let a = Polynomial::new(config.a_terms.clone());
        let b = Polynomial::new(config.b_terms.clone());
        assert_eq!(a.to_string(), config.a_poly_sum);
        assert_eq!(b.to_string(), config.b_poly_sum);
        let (hx, hz) = bicycle_checks(&generators, &a, &b).unwrap();
        assert!(hx.mul_transpose(&hz).unwrap().is_zero());
        assert!(hz.mul_transpose(&config.lx).unwrap().is_zero());
        assert!(hx.mul_transpose(&config.lz).unwrap().is_zero());
        assert_eq!(
            config.lx.mul_transpose(&config.lz).unwrap().rank(),
            config.n_log_qubits
        );
    }
}

#[test]
fn search_is_reproducible_across_thread_counts() {
    let base = SearchPlan {
        l: RangeSpec::new(2, 5),
        m: RangeSpec::new(2, 4),
        weight: RangeSpec::new(3, 5),
        exponents_a: RangeSpec::new(0, 2),
        exponents_b: RangeSpec::new(0, 2),
        rate_threshold: Some(0.05),
        ..SearchPlan::default()
    };
    let single = SearchPlan {
        scheduler: Scheduler { parallelism: 1 },
        ..base.clone()
    };
    let parallel = SearchPlan {
        scheduler: Scheduler { parallelism: 4 },
        ..base
    };

    let first = search(&single).unwrap();
    let second = search(&parallel).unwrap();
    let third = search(&parallel).unwrap();
    assert!(!first.configs.is_empty());
    assert_eq!(first, second);
    assert_eq!(second, third);
}
