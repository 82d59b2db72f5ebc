//! Server-rendered chart page.
//!
//! The page is seeded with the instrument and interval pickers; the chart
//! itself fetches `/api/candles` from the browser.

use candleview_core::{Instrument, IntervalOption, RequestDefaults};

pub const PAGE_TITLE: &str = "Stock chart";

const CHART_SCRIPT_URL: &str =
    "https://unpkg.com/@devexperts/dxcharts-lite@2.0.1/dist/dxchart.min.js";

/// Render the dashboard HTML.
///
/// An empty instrument slice still produces a complete page.
pub fn render(
    instruments: &[Instrument],
    intervals: &[IntervalOption],
    defaults: &RequestDefaults,
) -> String {
    let instrument_options: String = instruments
        .iter()
        .map(|instrument| {
            format!(
                r#"<option value="{}"{}>{} ({})</option>"#,
                escape(&instrument.figi),
                selected(instrument.figi == defaults.figi),
                escape(&instrument.ticker),
                escape(&instrument.name),
            )
        })
        .collect();

    let interval_options: String = intervals
        .iter()
        .map(|interval| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(interval.value),
                selected(interval.value == defaults.interval),
                escape(interval.label),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 0; padding: 16px; }}
#controls {{ display: flex; gap: 12px; margin-bottom: 12px; }}
#chart {{ width: 100%; height: 600px; }}
#status {{ color: #666; }}
</style>
<script src="{script}"></script>
</head>
<body>
<h1>{title}</h1>
<div id="controls">
<select id="figi" data-default="{default_figi}">{instrument_options}</select>
<select id="interval" data-default="{default_interval}">{interval_options}</select>
<span id="status"></span>
</div>
<div id="chart"></div>
<script>
const figiSelect = document.getElementById("figi");
const intervalSelect = document.getElementById("interval");
const status = document.getElementById("status");
const chart = DXChart.createChart(document.getElementById("chart"));

async function loadCandles() {{
  const params = new URLSearchParams();
  params.set("figi", figiSelect.value || figiSelect.dataset.default);
  params.set("interval", intervalSelect.value || intervalSelect.dataset.default);
  status.textContent = "Loading...";
  try {{
    const response = await fetch("/api/candles?" + params.toString());
    const body = await response.json();
    if (!response.ok) {{
      status.textContent = body.error || response.statusText;
      return;
    }}
    chart.setData({{ candles: body }});
    status.textContent = body.length === 0 ? "No data" : "";
  }} catch (err) {{
    status.textContent = String(err);
  }}
}}

figiSelect.addEventListener("change", loadCandles);
intervalSelect.addEventListener("change", loadCandles);
loadCandles();
</script>
</body>
</html>
"#,
        title = PAGE_TITLE,
        script = CHART_SCRIPT_URL,
        default_figi = escape(&defaults.figi),
        default_interval = escape(&defaults.interval),
    )
}

fn selected(is_default: bool) -> &'static str {
    if is_default {
        " selected"
    } else {
        ""
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
