//! Status classification: a score (or its absence) mapped onto a
//! qualitative label and a display color tag.

use serde::Deserialize;

/// One classification bucket: scores up to `upper_bound` (inclusive)
/// receive this label and color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bucket {
    pub upper_bound: f64,
    pub label: String,
    pub color: String,
}

/// An unbounded label/color pair, used for the terminal grade (worse than
/// every bucket) and the no-data case.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Grade {
    pub label: String,
    pub color: String,
}

/// The ordered classification scale.
///
/// Buckets are kept sorted by ascending upper bound so the first match
/// wins; a score above every bound falls through to the terminal grade,
/// and an absent score classifies as the no-data grade. The scale is
/// configuration data: it deserializes from JSON of the shape
///
/// ```json
/// {
///     "buckets": [ { "upper_bound": 25.0, "label": "Excellent", "color": "success" } ],
///     "terminal": { "label": "Unfit for Consumption", "color": "dark" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ScaleConfig")]
pub struct StatusScale {
    buckets: Vec<Bucket>,
    terminal: Grade,
    no_data: Grade,
}

#[derive(Deserialize)]
struct ScaleConfig {
    buckets: Vec<Bucket>,
    terminal: Grade,
    #[serde(default = "default_no_data")]
    no_data: Grade,
}

fn default_no_data() -> Grade {
    Grade {
        label: "No Data".to_string(),
        color: "secondary".to_string(),
    }
}

impl From<ScaleConfig> for StatusScale {
    fn from(config: ScaleConfig) -> Self {
        StatusScale::new(config.buckets, config.terminal, config.no_data)
    }
}

impl StatusScale {
    /// Build a scale. Buckets are sorted by upper bound on construction,
    /// so classification is well defined regardless of input order.
    pub fn new(mut buckets: Vec<Bucket>, terminal: Grade, no_data: Grade) -> Self {
        buckets.sort_by(|a, b| a.upper_bound.total_cmp(&b.upper_bound));
        Self {
            buckets,
            terminal,
            no_data,
        }
    }

    /// Classify a score into a `(label, color)` pair.
    pub fn classify(&self, score: Option<f64>) -> (&str, &str) {
        let Some(score) = score else {
            return (&self.no_data.label, &self.no_data.color);
        };
        for bucket in &self.buckets {
            if score <= bucket.upper_bound {
                return (&bucket.label, &bucket.color);
            }
        }
        (&self.terminal.label, &self.terminal.color)
    }
}

impl Default for StatusScale {
    fn default() -> Self {
        fn bucket(upper_bound: f64, label: &str, color: &str) -> Bucket {
            Bucket {
                upper_bound,
                label: label.to_string(),
                color: color.to_string(),
            }
        }
        Self::new(
            vec![
                bucket(25.0, "Excellent", "success"),
                bucket(50.0, "Good", "primary"),
                bucket(75.0, "Poor", "warning"),
                bucket(100.0, "Very Poor", "danger"),
            ],
            Grade {
                label: "Unfit for Consumption".to_string(),
                color: "dark".to_string(),
            },
            default_no_data(),
        )
    }
}
