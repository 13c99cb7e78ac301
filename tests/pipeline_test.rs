//! End-to-end tests: catalog + series in, growth records and comparisons out.

use std::path::PathBuf;

use coldchain_growth::app::pipeline::{PipelineInput, run_pipeline};
use coldchain_growth::data::generate_series;
use coldchain_growth::domain::{DuplicatePolicy, SeriesConfig, StatsFile, TemperatureReading};
use coldchain_growth::error::GrowthError;
use coldchain_growth::io::{
    build_stats_file, load_catalog, load_series, read_catalog, write_series_csv, write_stats_json,
};
use coldchain_growth::report::{format_comparisons, format_run_summary};

const CATALOG: &str = "Organism,b,Units,T0,Source\n\
                       Listeria,0.25,sqrt(log CFU/h)/°C,0.0,Author A (2001)\n\
                       Listeria,0.25,sqrt(log CFU/h)/°C,0.0,Author B (2005)\n\
                       Listeria,-0.1,sqrt(log CFU/h)/°C,0.0,Author C (2010)\n\
                       Salmonella,0.03,sqrt(log CFU/h)/°C,5.0,Author D (2012)\n";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("coldchain-growth-{}-{name}", std::process::id()))
}

/// One reading at 1 °C per probe, sampled once per hour.
fn two_probe_series() -> Vec<TemperatureReading> {
    (1..=2)
        .map(|probe| TemperatureReading {
            unit_id: 1,
            probe_id: probe,
            elapsed_minutes: 0,
            temperature_celsius: Some(1.0),
        })
        .collect()
}

fn input(readings: Vec<TemperatureReading>) -> PipelineInput {
    let loaded = read_catalog(CATALOG.as_bytes()).unwrap();
    PipelineInput {
        catalog: loaded.params,
        catalog_errors: Vec::new(),
        readings,
        interval_minutes: 60,
        duplicate_policy: DuplicatePolicy::Max,
        organisms: Vec::new(),
    }
}

#[test]
fn identical_models_give_identical_growth() {
    let run = run_pipeline(input(two_probe_series())).unwrap();

    assert_eq!(run.catalog_rows, 4);
    assert_eq!(run.models.len(), 3);
    assert_eq!(run.blocks, 2);
    assert_eq!(run.missing_readings, 0);

    // (1 * 0.25)^2 * 60 / 60
    let listeria: Vec<_> = run.records.iter().filter(|r| r.organism == "Listeria").collect();
    assert_eq!(listeria.len(), 4);
    for r in &listeria {
        assert!((r.cumulative_growth - 0.0625).abs() < 1e-12);
    }

    let cmp = run
        .comparisons
        .iter()
        .find(|c| c.organism == "Listeria")
        .unwrap()
        .result
        .as_ref()
        .unwrap();
    assert_eq!(cmp.friedman.statistic, 0.0);
    assert_eq!(cmp.friedman.df, 1);
    assert!((cmp.friedman.p_value - 1.0).abs() < 1e-12);
    assert_eq!(cmp.kendall_w, 0.0);
    assert_eq!(cmp.pairwise.len(), 1);
    assert_eq!(cmp.pairwise[0].adjusted_p, 1.0);
    assert_eq!(cmp.pairwise[0].significance_symbol, "ns");
}

#[test]
fn bad_model_is_skipped_and_run_continues() {
    let run = run_pipeline(input(two_probe_series())).unwrap();
    assert_eq!(run.skipped.len(), 1);
    assert!(run.skipped[0].0.contains("Author C 2010"));
    assert!(!run.records.iter().any(|r| r.source_label == "Author C 2010"));
}

#[test]
fn single_model_organism_fails_alone() {
    let run = run_pipeline(input(two_probe_series())).unwrap();
    assert_eq!(run.comparisons.len(), 2);

    let salmonella = run.comparisons.iter().find(|c| c.organism == "Salmonella").unwrap();
    assert!(matches!(salmonella.result, Err(GrowthError::InsufficientData(_))));
    // 1 °C is below T0 = 5 °C.
    assert!(
        run.records
            .iter()
            .filter(|r| r.organism == "Salmonella")
            .all(|r| r.cumulative_growth == 0.0)
    );

    let report = format_comparisons(&run.comparisons);
    assert!(report.contains("Salmonella"));
    assert!(report.contains("insufficient data"));
}

#[test]
fn organism_filter_limits_comparisons() {
    let mut inp = input(two_probe_series());
    inp.organisms = vec!["Listeria".to_string()];
    let run = run_pipeline(inp).unwrap();
    assert_eq!(run.comparisons.len(), 1);
    assert_eq!(run.comparisons[0].organism, "Listeria");
    // Growth is still computed for every model.
    assert!(run.records.iter().any(|r| r.organism == "Salmonella"));
}

#[test]
fn reject_policy_fails_on_duplicate_models() {
    let csv = "Organism,b,Units,T0,Source\n\
               Listeria,0.2,sqrt(log CFU/h),0.0,Author A\n\
               Listeria,0.3,sqrt(log CFU/h),0.0,Author A\n\
               Listeria,0.3,sqrt(log CFU/h),0.0,Author B\n";
    let loaded = read_catalog(csv.as_bytes()).unwrap();
    let mut inp = input(two_probe_series());
    inp.catalog = loaded.params.clone();
    inp.duplicate_policy = DuplicatePolicy::Reject;
    let err = run_pipeline(inp).unwrap_err();
    assert_eq!(err.exit_code(), 2);

    let mut inp = input(two_probe_series());
    inp.catalog = loaded.params;
    let run = run_pipeline(inp).unwrap();
    let a: Vec<_> = run.records.iter().filter(|r| r.source_label == "Author A").collect();
    assert_eq!(a.len(), 2);
    // Growth is summed over duplicate rows; b1 is the maximum.
    assert!((a[0].cumulative_growth - (0.04 + 0.09)).abs() < 1e-12);
    assert_eq!(a[0].coefficient_b1, 0.3);
}

#[test]
fn empty_series_is_an_error() {
    let err = run_pipeline(input(Vec::new())).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn files_round_trip_through_the_pipeline() {
    let catalog_path = temp_path("catalog.csv");
    let series_path = temp_path("series.csv");
    let stats_path = temp_path("stats.json");
    std::fs::write(&catalog_path, CATALOG).unwrap();

    let series = generate_series(&SeriesConfig {
        units: 3,
        probes_per_unit: 2,
        hours: 6.0,
        interval_minutes: 5,
        seed: 7,
        weibull_shape: 1.5,
        weibull_scale: 4.0,
        base_temp: 2.0,
        missing_rate: 0.05,
    })
    .unwrap();
    write_series_csv(&series_path, &series).unwrap();

    let loaded = load_catalog(&catalog_path).unwrap();
    let readings = load_series(&series_path).unwrap();
    assert_eq!(readings.len(), series.len());
    assert_eq!(
        readings.iter().filter(|r| r.temperature().is_none()).count(),
        series.iter().filter(|r| r.temperature().is_none()).count()
    );

    let run = run_pipeline(PipelineInput {
        catalog: loaded.params,
        catalog_errors: Vec::new(),
        readings,
        interval_minutes: 5,
        duplicate_policy: DuplicatePolicy::Max,
        organisms: Vec::new(),
    })
    .unwrap();
    assert_eq!(run.blocks, 6);
    assert!(run.records.iter().all(|r| r.cumulative_growth >= 0.0));
    assert!(format_run_summary(&run).contains("Listeria"));

    let stats = build_stats_file(&run.comparisons, run.interval_minutes, run.models.len(), run.blocks);
    write_stats_json(&stats_path, &stats).unwrap();
    let parsed: StatsFile = serde_json::from_str(&std::fs::read_to_string(&stats_path).unwrap()).unwrap();
    assert_eq!(parsed.organisms.len(), 2);
    assert_eq!(parsed.blocks, 6);
    assert!(parsed.organisms.iter().any(|o| o.error.is_some()));

    for path in [catalog_path, series_path, stats_path] {
        let _ = std::fs::remove_file(path);
    }
}
