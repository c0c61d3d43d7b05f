// Pie chart inputs and a small SVG renderer for them.
use serde::Serialize;
use std::f64::consts::PI;

const GREEN: &str = "#2E8B57";
const LIGHT_GREEN: &str = "#90EE90";
const RED: &str = "#DC143C";

/// Two-slice breakdown of walks against target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChartSegments {
    /// At or under target: what is done and what is left.
    Progress { completed: u64, remaining: u64 },
    /// Over target: the target itself and the walks beyond it.
    Excess { on_target: u64, excess: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub label: &'static str,
    pub value: u64,
    pub color: &'static str,
}

impl ChartSegments {
    pub fn build(actual_total: u64, target_total: u64) -> Self {
        let completed = actual_total.min(target_total);
        let excess = actual_total.saturating_sub(target_total);
        if excess > 0 {
            ChartSegments::Excess {
                on_target: completed,
                excess,
            }
        } else {
            ChartSegments::Progress {
                completed,
                remaining: target_total.saturating_sub(actual_total),
            }
        }
    }

    pub fn segments(&self) -> [Segment; 2] {
        match *self {
            ChartSegments::Progress {
                completed,
                remaining,
            } => [
                Segment { label: "Completed", value: completed, color: GREEN },
                Segment { label: "Remaining", value: remaining, color: RED },
            ],
            ChartSegments::Excess { on_target, excess } => [
                Segment { label: "On Target", value: on_target, color: GREEN },
                Segment { label: "Excess", value: excess, color: LIGHT_GREEN },
            ],
        }
    }

    /// Chart heading, e.g. `"Smith\n(2/3 walks)"`.
    pub fn title(&self, name: &str, actual_total: u64, target_total: u64) -> String {
        match self {
            ChartSegments::Excess { excess, .. } => format!(
                "{}\n({}/{} walks, +{} excess)",
                name, actual_total, target_total, excess
            ),
            ChartSegments::Progress { .. } => {
                format!("{}\n({}/{} walks)", name, actual_total, target_total)
            }
        }
    }
}

/// Share of the pie taken by `value`, `"N/A"` when the pie is empty.
pub fn segment_share(value: u64, segments: &[Segment]) -> String {
    let total: u64 = segments.iter().map(|s| s.value).sum();
    if total == 0 {
        return "N/A".to_string();
    }
    format!("{:.1}%", value as f64 / total as f64 * 100.0)
}

/// Render a pie as a standalone `<svg>` element. Slices start at 12 o'clock
/// and run counter-clockwise, with a legend underneath.
pub fn render_pie_svg(segments: &[Segment], title: &str, size: u32) -> String {
    let r = size as f64 / 2.0 - 10.0;
    let (cx, cy) = (size as f64 / 2.0, size as f64 / 2.0 + 36.0);
    let height = size + 36 + 22 * segments.len() as u32 + 10;
    let total: u64 = segments.iter().map(|s| s.value).sum();

    let mut out = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
        w = size,
        h = height
    );
    for (i, line) in title.lines().enumerate() {
        out.push_str(&format!(
            r##"<text x="{}" y="{}" text-anchor="middle" font-size="14" font-weight="{}">{}</text>"##,
            cx,
            16 + i * 16,
            if i == 0 { "bold" } else { "normal" },
            escape(line)
        ));
    }

    if total == 0 {
        out.push_str(&format!(
            r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="#eeeeee"/><text x="{cx}" y="{cy}" text-anchor="middle">N/A</text>"##
        ));
    } else {
        let mut angle = PI / 2.0;
        for seg in segments.iter().filter(|s| s.value > 0) {
            let sweep = seg.value as f64 / total as f64 * 2.0 * PI;
            if seg.value == total {
                out.push_str(&format!(
                    r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"##,
                    seg.color
                ));
            } else {
                // SVG y grows downward, so counter-clockwise means subtracting sin.
                let (x1, y1) = (cx + r * angle.cos(), cy - r * angle.sin());
                let end = angle + sweep;
                let (x2, y2) = (cx + r * end.cos(), cy - r * end.sin());
                let large = if sweep > PI { 1 } else { 0 };
                out.push_str(&format!(
                    r##"<path d="M{cx:.2},{cy:.2} L{x1:.2},{y1:.2} A{r:.2},{r:.2} 0 {large},0 {x2:.2},{y2:.2} Z" fill="{}" stroke="#fff" stroke-width="1"/>"##,
                    seg.color
                ));
            }
            let mid = angle + sweep / 2.0;
            out.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="12">{}</text>"##,
                cx + r * 0.6 * mid.cos(),
                cy - r * 0.6 * mid.sin(),
                segment_share(seg.value, segments)
            ));
            angle += sweep;
        }
    }

    for (i, seg) in segments.iter().enumerate() {
        let y = size + 36 + 22 * i as u32 + 6;
        out.push_str(&format!(
            r##"<rect x="10" y="{}" width="14" height="14" fill="{}"/><text x="30" y="{}" font-size="12">{} ({})</text>"##,
            y,
            seg.color,
            y + 12,
            seg.label,
            seg.value
        ));
    }
    out.push_str("</svg>");
    out
}

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
