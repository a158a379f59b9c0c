//! Display formatting for the dashboard cards.
//!
//! These are the render-time coercions: the view model keeps raw values and
//! only this module decides how they read on screen.

use crate::domain::payload::Metric;
use crate::domain::view_model::ViewModel;
use serde_json::Value;
use std::fmt::Write;

pub const PLACEHOLDER: &str = "--";
pub const NO_SNAPSHOT: &str = "No snapshot available";

pub fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| PLACEHOLDER.to_string(), |r| r.to_string())
}

/// Zero confidence renders like a missing one.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) if c != 0.0 => format!("{:.1}%", c * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_contribution(contribution: f64) -> String {
    format!("{contribution:.4}")
}

/// Snapshot cells: numbers with three decimals, everything else as text.
pub fn format_snapshot_value(value: &Metric) -> String {
    match (value.as_number(), value.as_value()) {
        (Some(f), _) => format!("{f:.3}"),
        (None, Value::Number(n)) => n.to_string(),
        (None, other) => format_text(other),
    }
}

/// Trend values are shown as received.
pub fn format_metric(value: &Metric) -> String {
    match value.as_value() {
        Value::Number(n) => n.to_string(),
        other => format_text(other),
    }
}

fn format_text(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render_text(vm: &ViewModel) -> String {
    let mut out = String::new();

    if vm.has_error() {
        let _ = writeln!(out, "! {}", vm.error_message);
        out.push('\n');
    }

    let _ = writeln!(out, "{}", vm.company);
    let _ = writeln!(out, "  Predicted Rating: {}", format_rating(vm.predicted_rating));
    let _ = writeln!(out, "  Confidence: {}", format_confidence(vm.confidence));

    out.push_str("\nScore Trend\n");
    if vm.trend.is_empty() {
        let _ = writeln!(out, "  {PLACEHOLDER}");
    }
    for point in &vm.trend {
        let _ = writeln!(
            out,
            "  {:<12} {:>8}  (confidence {})",
            point.date,
            format_metric(&point.score),
            format_metric(&point.confidence)
        );
    }

    out.push_str("\nFeature Contributions\n");
    if vm.features.is_empty() {
        let _ = writeln!(out, "  {PLACEHOLDER}");
    }
    let width = vm
        .features
        .iter()
        .map(|f| f.feature.chars().count())
        .max()
        .unwrap_or(0);
    for f in &vm.features {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>12}",
            f.feature,
            format_contribution(f.contribution)
        );
    }

    out.push_str("\nFinancial Snapshot\n");
    match &vm.snapshot {
        None => {
            let _ = writeln!(out, "  {NO_SNAPSHOT}");
        }
        Some(snapshot) => {
            for (key, value) in snapshot {
                let _ = writeln!(out, "  {key}: {}", format_snapshot_value(value));
            }
        }
    }

    out
}
