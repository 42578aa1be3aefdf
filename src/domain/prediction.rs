//! Prediction result types.
//!
//! Represents the payload returned by the remote `/api/predict` endpoint and
//! the severity tier derived from it.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stage label mapped to the low severity tier.
pub const EARLY_STAGE: &str = "Early AMD";

/// Stage label mapped to the moderate severity tier.
pub const INTERMEDIATE_STAGE: &str = "Intermediate AMD";

/// Severity tier shown alongside a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Early stage
    Low,
    /// Intermediate stage
    Moderate,
    /// Any other stage, including labels the client does not recognise
    High,
}

impl Severity {
    /// Derive the tier from an `amd_stage` label.
    ///
    /// Only the two explicitly known stages map below `High`; every other
    /// value, including unknown or empty labels, falls through to `High`.
    #[must_use]
    pub fn from_stage(stage: &str) -> Self {
        match stage {
            EARLY_STAGE => Self::Low,
            INTERMEDIATE_STAGE => Self::Moderate,
            _ => Self::High,
        }
    }

    /// Badge text for the tier.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    /// Tier color (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (245, 158, 11),     // Amber (#F59E0B)
            Self::Moderate => (249, 115, 22), // Orange (#F97316)
            Self::High => (220, 38, 38),     // Red (#DC2626)
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-class probabilities in the order the server sent them.
///
/// JSON objects are deserialized entry by entry so the distribution renders
/// in insertion order rather than sorted by label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probabilities(Vec<(String, f64)>);

impl Probabilities {
    #[must_use]
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, p)| (label.as_str(), *p))
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, p)| *p)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, p) in &self.0 {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Probabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Probabilities;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping class labels to probabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, f64)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, p)) = access.next_entry::<String, f64>()? {
                    // Duplicate keys: last one wins, first position kept.
                    match entries.iter_mut().find(|(l, _)| *l == label) {
                        Some(existing) => existing.1 = p,
                        None => entries.push((label, p)),
                    }
                }
                Ok(Probabilities(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Successful response of the prediction endpoint.
///
/// The client performs no validation on the numbers: probabilities are not
/// required to sum to 1, and `prediction` is not required to be one of the
/// probability labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class label
    pub prediction: String,

    /// Probability mass of the top class (0.0 to 1.0)
    pub confidence: f64,

    /// Full per-class distribution
    pub probabilities: Probabilities,

    /// Stage label used to pick the severity tier
    pub amd_stage: String,
}

impl PredictionResult {
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_stage(&self.amd_stage)
    }
}
