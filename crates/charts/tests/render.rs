//! End-to-end renderer tests against real files on disk.

use std::fs;
use std::path::Path;

use gridsim_charts::dashboard::render;
use gridsim_charts::ChartsError;
use tempfile::TempDir;

const SUMMARY: &str = "\
scenario,requests,error_rate_percent,latency_p95_ms,cross_region_reroutes,carbon_exposure_mean_g_per_kwh,carbon_exposure_saved_percent_vs_baseline
baseline,1200,1.2,310,0,412.5,0
carbon-aware,1200,1.1,335,58,287.4,30.3
";

const REQUESTS: &str = "\
request_id,selected_zone_region,latency_ms
r-1,us-east,120
r-2,us-west,180
r-3,us-west,140
";

fn write_inputs(dir: &Path) {
    fs::write(dir.join("summary.csv"), SUMMARY).expect("write summary");
    fs::write(dir.join("requests.csv"), REQUESTS).expect("write requests");
}

#[test]
fn test_render_writes_dashboard_into_input_dir() {
    let dir = TempDir::new().expect("tempdir");
    write_inputs(dir.path());

    let out = render(dir.path(), Path::new("charts.html")).expect("render should succeed");
    assert_eq!(out, dir.path().join("charts.html"));

    let html = fs::read_to_string(&out).expect("dashboard should exist");
    assert!(html.contains("carbon-aware"));
    assert!(html.contains("us-west"));
    assert!(html.contains("GridSim Comparative Dashboard"));
}

#[test]
fn test_render_honors_absolute_out_path() {
    let dir = TempDir::new().expect("tempdir");
    let out_dir = TempDir::new().expect("tempdir");
    write_inputs(dir.path());

    let target = out_dir.path().join("report.html");
    let out = render(dir.path(), &target).expect("render should succeed");
    assert_eq!(out, target);
    assert!(target.exists());
}

#[test]
fn test_missing_summary_fails_with_clear_error() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("requests.csv"), REQUESTS).expect("write requests");

    let err = render(dir.path(), Path::new("charts.html")).unwrap_err();
    match err {
        ChartsError::MissingFile(path) => {
            assert!(path.ends_with("summary.csv"), "unexpected path: {path:?}")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_requests_fails_with_clear_error() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("summary.csv"), SUMMARY).expect("write summary");

    let err = render(dir.path(), Path::new("charts.html")).unwrap_err();
    assert!(matches!(err, ChartsError::MissingFile(_)));
}

#[test]
fn test_summary_missing_required_column_fails() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("summary.csv"), "scenario,requests\nbaseline,10\n")
        .expect("write summary");
    fs::write(dir.path().join("requests.csv"), REQUESTS).expect("write requests");

    let err = render(dir.path(), Path::new("charts.html")).unwrap_err();
    assert!(matches!(err, ChartsError::MissingColumn { .. }));
}
