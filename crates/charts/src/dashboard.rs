//! Static HTML dashboard generation.
//!
//! The document embeds the parsed tables as JSON and renders bar charts
//! with d3 loaded from a CDN; nothing here needs a server.

use std::path::Path;

use serde_json::{json, Value};

use crate::csv::{parse_number, Record};

/// Summary columns coerced to numbers (or null) before embedding.
pub const SUMMARY_NUMERIC_COLUMNS: &[&str] = &[
    "requests",
    "error_rate_percent",
    "latency_p95_ms",
    "cross_region_reroutes",
    "carbon_exposure_mean_g_per_kwh",
    "carbon_exposure_saved_percent_vs_baseline",
];

/// Required summary header set; part of the input contract.
pub const SUMMARY_REQUIRED_COLUMNS: &[&str] = &[
    "scenario",
    "requests",
    "error_rate_percent",
    "latency_p95_ms",
    "cross_region_reroutes",
    "carbon_exposure_mean_g_per_kwh",
    "carbon_exposure_saved_percent_vs_baseline",
];

/// Required per-request header set.
pub const REQUESTS_REQUIRED_COLUMNS: &[&str] = &["selected_zone_region"];

/// Coerce the summary table for embedding: numeric columns become numbers
/// or null, everything else stays a string.
pub fn summary_payload(records: &[Record]) -> Vec<Value> {
    records
        .iter()
        .map(|record| {
            let mut row = serde_json::Map::new();
            for (key, value) in record {
                if SUMMARY_NUMERIC_COLUMNS.contains(&key.as_str()) {
                    row.insert(key.clone(), json!(parse_number(value)));
                } else {
                    row.insert(key.clone(), json!(value));
                }
            }
            Value::Object(row)
        })
        .collect()
}

/// Requests pass through untouched.
pub fn requests_payload(records: &[Record]) -> Vec<Value> {
    records.iter().map(|record| json!(record)).collect()
}

/// Render the full dashboard document.
pub fn build_html(input_dir: &Path, summary: &[Value], requests: &[Value]) -> String {
    let generated = chrono::Utc::now().to_rfc3339();
    let summary_json = serde_json::to_string(summary).unwrap_or_else(|_| "[]".to_string());
    let requests_json = serde_json::to_string(requests).unwrap_or_else(|_| "[]".to_string());
    format!(
        r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>GridSim Experiment Charts</title>
  <script src="https://cdn.jsdelivr.net/npm/d3@7"></script>
  <style>
    body {{ margin: 0; font-family: "Segoe UI", sans-serif; background: #f7f4ee; color: #12202a; }}
    .wrap {{ max-width: 1200px; margin: 0 auto; padding: 20px; }}
    .top {{ display: flex; gap: 12px; flex-wrap: wrap; margin-bottom: 14px; }}
    .badge {{ background: #fff; border: 1px solid #d4dde3; border-radius: 8px; padding: 8px 10px; font-size: 13px; color: #4d5b65; }}
    h1 {{ margin: 0 0 10px; font-size: 24px; }}
    .grid {{ display: grid; grid-template-columns: 1fr; gap: 14px; }}
    .card {{ background: #fff; border: 1px solid #d4dde3; border-radius: 12px; padding: 14px 16px; }}
    .card h3 {{ margin: 2px 0 10px; font-size: 18px; }}
    svg {{ width: 100%; height: 360px; display: block; }}
    table {{ width: 100%; border-collapse: collapse; font-size: 13px; }}
    th, td {{ padding: 6px 7px; border-bottom: 1px solid #e5ecef; text-align: left; }}
    th {{ color: #4d5b65; font-weight: 600; }}
  </style>
</head>
<body>
  <div class="wrap">
    <h1>GridSim Comparative Dashboard</h1>
    <div class="top">
      <div class="badge">Input: <code>{input_dir}</code></div>
      <div class="badge">Generated: {generated}</div>
      <div class="badge">Scenarios: {scenario_count}</div>
      <div class="badge">Requests: {request_count}</div>
    </div>

    <div class="grid">
      <div class="card"><h3>Mean Carbon Exposure (gCO2/kWh)</h3><svg id="carbon"></svg></div>
      <div class="card"><h3>P95 Latency (ms)</h3><svg id="latency"></svg></div>
      <div class="card"><h3>Cross-Region Reroutes</h3><svg id="reroutes"></svg></div>
      <div class="card"><h3>Selected Zone Region Mix</h3><svg id="zones"></svg></div>
    </div>

    <div class="card" style="margin-top:14px;">
      <h3>Scenario Table</h3>
      <table id="summaryTable"></table>
    </div>
  </div>

  <script>
    const summary = {summary_json};
    const requests = {requests_json};

    function drawBar(id, key, color, yLabel) {{
      const svg = d3.select(id);
      svg.selectAll("*").remove();
      const w = svg.node().clientWidth || 500;
      const h = svg.node().clientHeight || 300;
      const m = {{ t: 26, r: 20, b: 110, l: 64 }};
      const iw = w - m.l - m.r;
      const ih = h - m.t - m.b;
      const g = svg.append("g").attr("transform", `translate(${{m.l}},${{m.t}})`);
      const x = d3.scaleBand().domain(summary.map(d => d.scenario)).range([0, iw]).padding(0.2);
      const maxY = d3.max(summary, d => Number(d[key]) || 0) || 1;
      const y = d3.scaleLinear().domain([0, maxY]).nice().range([ih, 0]);
      g.append("g").attr("transform", `translate(0,${{ih}})`).call(d3.axisBottom(x))
        .selectAll("text").attr("transform", "rotate(-22)").style("text-anchor", "end");
      g.append("g").call(d3.axisLeft(y));
      g.append("text").attr("transform", `translate(-48,${{ih / 2}}) rotate(-90)`)
        .style("fill", "#4d5b65").style("font-size", "13px").text(yLabel);
      g.selectAll("rect").data(summary).enter().append("rect")
        .attr("x", d => x(d.scenario)).attr("y", d => y(Number(d[key]) || 0))
        .attr("width", x.bandwidth()).attr("height", d => ih - y(Number(d[key]) || 0))
        .attr("fill", color);
    }}

    function drawZones() {{
      const svg = d3.select("#zones");
      svg.selectAll("*").remove();
      const w = svg.node().clientWidth || 500;
      const h = svg.node().clientHeight || 300;
      const m = {{ t: 24, r: 20, b: 52, l: 64 }};
      const iw = w - m.l - m.r;
      const ih = h - m.t - m.b;
      const g = svg.append("g").attr("transform", `translate(${{m.l}},${{m.t}})`);
      const counts = d3.rollup(
        requests.filter(r => r.selected_zone_region),
        v => v.length,
        d => d.selected_zone_region
      );
      const data = Array.from(counts, ([region, count]) => ({{ region, count }}))
        .sort((a, b) => d3.descending(a.count, b.count));
      const x = d3.scaleBand().domain(data.map(d => d.region)).range([0, iw]).padding(0.25);
      const y = d3.scaleLinear().domain([0, d3.max(data, d => d.count) || 1]).nice().range([ih, 0]);
      g.append("g").attr("transform", `translate(0,${{ih}})`).call(d3.axisBottom(x));
      g.append("g").call(d3.axisLeft(y));
      g.selectAll("rect").data(data).enter().append("rect")
        .attr("x", d => x(d.region)).attr("y", d => y(d.count))
        .attr("width", x.bandwidth()).attr("height", d => ih - y(d.count))
        .attr("fill", "#355070");
    }}

    function renderTable() {{
      const cols = [
        "scenario", "requests", "error_rate_percent", "latency_p95_ms",
        "cross_region_reroutes", "carbon_exposure_mean_g_per_kwh",
        "carbon_exposure_saved_percent_vs_baseline"
      ];
      const t = d3.select("#summaryTable");
      const thead = t.append("thead").append("tr");
      cols.forEach(c => thead.append("th").text(c));
      const tbody = t.append("tbody");
      summary.forEach(row => {{
        const tr = tbody.append("tr");
        cols.forEach(c => tr.append("td").text(row[c] ?? ""));
      }});
    }}

    drawBar("#carbon", "carbon_exposure_mean_g_per_kwh", "#1f7a8c", "gCO2/kWh");
    drawBar("#latency", "latency_p95_ms", "#6d597a", "ms");
    drawBar("#reroutes", "cross_region_reroutes", "#bf4342", "count");
    drawZones();
    renderTable();
  </script>
</body>
</html>
"##,
        input_dir = input_dir.display(),
        generated = generated,
        scenario_count = summary.len(),
        request_count = requests.len(),
        summary_json = summary_json,
        requests_json = requests_json,
    )
}

/// Full pipeline: read and validate both tables under `input_dir`, render
/// the dashboard, and write it to `out` (relative paths resolve against
/// the input dir). Returns the written path.
pub fn render(input_dir: &Path, out: &Path) -> crate::Result<std::path::PathBuf> {
    use crate::csv::{read_records, require_columns};
    use crate::error::ChartsError;

    let summary_path = input_dir.join("summary.csv");
    let requests_path = input_dir.join("requests.csv");

    let summary = read_records(&summary_path)?;
    require_columns(&summary_path, &summary, SUMMARY_REQUIRED_COLUMNS)?;
    let requests = read_records(&requests_path)?;
    require_columns(&requests_path, &requests, REQUESTS_REQUIRED_COLUMNS)?;

    let html = build_html(
        input_dir,
        &summary_payload(&summary),
        &requests_payload(&requests),
    );

    let out_path = if out.is_absolute() {
        out.to_path_buf()
    } else {
        input_dir.join(out)
    };
    std::fs::write(&out_path, html).map_err(|source| ChartsError::Io {
        path: out_path.clone(),
        source,
    })?;
    Ok(out_path)
}
