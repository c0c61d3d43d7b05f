//! Self-contained HTML dashboard: no scripts, no external assets.

use crate::chart::{escape, render_pie_svg};
use crate::report::{Report, ReportSection};
use crate::util::format_int;

const CSS: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
.metrics{display:flex;gap:2rem;margin:1rem 0}\
.metric{display:flex;flex-direction:column}\
.metric span{font-size:.8rem;color:#666}\
.metric b{font-size:1.6rem}\
details{border:1px solid #ddd;border-radius:6px;padding:.5rem 1rem;margin:.5rem 0}\
summary{cursor:pointer;font-weight:bold}\
table{border-collapse:collapse;margin:.5rem 0}\
th,td{border:1px solid #ddd;padding:.25rem .75rem;text-align:left}\
.ok{color:#2E8B57}";

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(16 * 1024),
        }
    }
    fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }
    fn finish(self) -> String {
        self.buf
    }
}

pub fn render_dashboard(report: &Report) -> String {
    let mut w = Html::new();
    w.push("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    w.push("<title>Safety Walks Dashboard</title><style>");
    w.push(CSS);
    w.push("</style></head><body>");
    w.push("<h1>Safety Walks Dashboard (Non-ESS Units)</h1>");
    w.push(format!(
        "<p>Current period target: {} walks per unit</p>",
        report.current_period_target
    ));

    w.push("<h2>Overall Summary (All Non-ESS Units)</h2>");
    metrics(&mut w, &report.overall, true);
    w.push(render_pie_svg(
        &report.overall.chart.segments(),
        &report.overall.chart_title("Overall Progress"),
        300,
    ));

    w.push("<hr><h2>District Manager Breakdown</h2>");
    for d in &report.districts {
        district(&mut w, d, report.current_period_target);
    }
    w.push("</body></html>");
    w.finish()
}

fn metrics(w: &mut Html, section: &ReportSection, with_compliance: bool) {
    w.push("<div class=\"metrics\">");
    let mut items = vec![
        ("Units", format_int(section.unit_count)),
        ("Target Walks", format_int(section.target_total)),
        ("Actual Walks Completed", format_int(section.actual_total)),
    ];
    if with_compliance {
        items.push(("Compliance %", section.compliance()));
    }
    for (label, value) in items {
        w.push(format!(
            "<div class=\"metric\"><span>{}</span><b>{}</b></div>",
            label,
            escape(&value)
        ));
    }
    w.push("</div>");
}

fn district(w: &mut Html, d: &ReportSection, target: u64) {
    w.push("<details><summary>");
    w.push(escape(&d.heading()));
    w.push("</summary>");
    metrics(w, d, false);
    if d.behind_units.is_empty() {
        w.push("<p class=\"ok\">All units in this district are on or above target!</p>");
    } else {
        w.push("<h3>Units Behind Target</h3><table><thead><tr>");
        w.push(format!(
            "<th>Unit # - Unit Name</th><th>Unit Type</th><th>Walks YTD (&lt;{})</th>",
            target
        ));
        w.push("</tr></thead><tbody>");
        for u in &d.behind_units {
            w.push(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&u.unit_label),
                escape(&u.unit_type),
                u.walks_ytd
            ));
        }
        w.push("</tbody></table>");
    }
    w.push(render_pie_svg(
        &d.chart.segments(),
        &d.chart_title(&d.display_name),
        250,
    ));
    w.push("</details>");
}
