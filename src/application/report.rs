//! Result renderer model: what the report view shows for a prediction.
//!
//! Pure derivation from a `PredictionResult`; the TUI draws it.

use chrono::NaiveDate;

use crate::domain::{PredictionResult, Severity};

/// Fixed notice shown under every report.
pub const MEDICAL_DISCLAIMER: &str = "This AI-assisted analysis is for screening purposes only. Please consult a qualified optometrist for professional diagnosis and treatment recommendations.";

/// One row of the probability distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionBar {
    pub label: String,
    pub probability: f64,
    /// Label equals the predicted class exactly
    pub active: bool,
}

impl DistributionBar {
    /// Percentage text with one decimal, e.g. `82.0%`. Halves round up.
    #[must_use]
    pub fn percent_label(&self) -> String {
        let tenths = (self.probability * 1000.0).round() / 10.0;
        format!("{tenths:.1}%")
    }

    /// Bar fill in `[0, 1]`.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        if self.probability.is_finite() {
            self.probability.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Everything the report view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub classification: String,
    pub severity: Severity,
    /// Confidence gauge value, 0 to 100
    pub gauge_percent: u16,
    /// One bar per class, in the order the server sent them
    pub bars: Vec<DistributionBar>,
    /// Report date, e.g. `October 19, 2026`
    pub date: String,
}

impl Report {
    #[must_use]
    pub fn from_result(result: &PredictionResult, date: NaiveDate) -> Self {
        let bars = result
            .probabilities
            .iter()
            .map(|(label, probability)| DistributionBar {
                label: label.to_string(),
                probability,
                active: label == result.prediction,
            })
            .collect();

        Self {
            classification: result.prediction.clone(),
            severity: result.severity(),
            gauge_percent: gauge_percent(result.confidence),
            bars,
            date: format_report_date(date),
        }
    }

    /// Report dated today (local time).
    #[must_use]
    pub fn today(result: &PredictionResult) -> Self {
        Self::from_result(result, chrono::Local::now().date_naive())
    }
}

/// Confidence as a whole percentage, clamped to the gauge range.
#[must_use]
pub fn gauge_percent(confidence: f64) -> u16 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u16
}

#[must_use]
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARLY_RESPONSE: &str = r#"{"prediction":"Early AMD","confidence":0.82,"probabilities":{"Early AMD":0.82,"Intermediate AMD":0.12,"Late AMD":0.06},"amd_stage":"Early AMD"}"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_early_amd_report() {
        let result: PredictionResult = serde_json::from_str(EARLY_RESPONSE).unwrap();
        let report = Report::from_result(&result, date());

        assert_eq!(report.severity, Severity::Low);
        assert_eq!(report.severity.label(), "Low Risk");
        assert_eq!(report.gauge_percent, 82);
        assert_eq!(report.classification, "Early AMD");

        let labels: Vec<String> = report.bars.iter().map(DistributionBar::percent_label).collect();
        assert_eq!(labels, ["82.0%", "12.0%", "6.0%"]);

        let displayed_total: f64 = labels
            .iter()
            .map(|l| l.trim_end_matches('%').parse::<f64>().unwrap())
            .sum();
        assert!((displayed_total - 100.0).abs() < 1e-9);

        let active: Vec<&str> = report
            .bars
            .iter()
            .filter(|b| b.active)
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(active, ["Early AMD"]);
    }

    #[test]
    fn test_unknown_stage_renders_high_tier() {
        let json = r#"{"prediction":"Drusen","confidence":0.4,"probabilities":{"Drusen":0.4},"amd_stage":"Unrecognised"}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();

        let first = Report::from_result(&result, date());
        let second = Report::from_result(&result, date());
        assert_eq!(first.severity, Severity::High);
        assert_eq!(first.severity.label(), "High Risk");
        assert_eq!(first, second);
    }

    #[test]
    fn test_prediction_missing_from_distribution() {
        let json = r#"{"prediction":"Late AMD","confidence":0.7,"probabilities":{"Early":0.2,"Late":0.7},"amd_stage":"Late AMD"}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();
        let report = Report::from_result(&result, date());

        assert_eq!(report.bars.len(), 2);
        assert!(report.bars.iter().all(|b| !b.active));
    }

    #[test]
    fn test_gauge_percent_bounds() {
        assert_eq!(gauge_percent(0.0), 0);
        assert_eq!(gauge_percent(0.826), 83);
        assert_eq!(gauge_percent(1.0), 100);
        assert_eq!(gauge_percent(1.7), 100);
        assert_eq!(gauge_percent(-0.2), 0);
        assert_eq!(gauge_percent(f64::NAN), 0);
    }

    #[test]
    fn test_percent_label_rounds_halves_up() {
        let bar = |p| DistributionBar { label: "x".to_string(), probability: p, active: false };
        assert_eq!(bar(0.0625).percent_label(), "6.3%");
        assert_eq!(bar(0.1234).percent_label(), "12.3%");
        assert_eq!(bar(1.0).percent_label(), "100.0%");
        assert_eq!(bar(0.0).percent_label(), "0.0%");
    }

    #[test]
    fn test_fill_ratio_bounds() {
        let bar = |p| DistributionBar { label: "x".to_string(), probability: p, active: false };
        assert_eq!(bar(0.5).fill_ratio(), 0.5);
        assert_eq!(bar(1.5).fill_ratio(), 1.0);
        assert_eq!(bar(f64::INFINITY).fill_ratio(), 0.0);
    }

    #[test]
    fn test_report_date_format() {
        assert_eq!(format_report_date(date()), "October 19, 2026");
        assert_eq!(
            format_report_date(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()),
            "March 5, 2026"
        );
    }
}
