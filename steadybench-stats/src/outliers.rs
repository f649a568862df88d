//! Outlier Classification
//!
//! Tukey fences derived from the quartiles. Labels are informational:
//! no observation is ever removed from the sample.

use crate::sample::Sample;
use serde::Serialize;

/// Fence multiplier for mild outliers
pub const K_MILD: f64 = 1.5;
/// Fence multiplier for severe outliers
pub const K_SEVERE: f64 = 3.0;

/// The four Tukey fences, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fences {
    /// `q1 - 3 * iqr`
    pub low_severe: f64,
    /// `q1 - 1.5 * iqr`
    pub low_mild: f64,
    /// `q3 + 1.5 * iqr`
    pub high_mild: f64,
    /// `q3 + 3 * iqr`
    pub high_severe: f64,
}

impl Fences {
    /// Compute fences from the sample's quartiles
    pub fn new(sample: &Sample) -> Self {
        let (q1, _, q3) = sample.percentiles().quartiles();
        let iqr = q3 - q1;

        Self {
            low_severe: q1 - K_SEVERE * iqr,
            low_mild: q1 - K_MILD * iqr,
            high_mild: q3 + K_MILD * iqr,
            high_severe: q3 + K_SEVERE * iqr,
        }
    }

    /// Fences as `[low_severe, low_mild, high_mild, high_severe]`
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.low_severe,
            self.low_mild,
            self.high_mild,
            self.high_severe,
        ]
    }

    /// Severity class of a single observation
    pub fn classify(&self, x: f64) -> Label {
        if x < self.low_severe {
            Label::LowSevere
        } else if x < self.low_mild {
            Label::LowMild
        } else if x > self.high_severe {
            Label::HighSevere
        } else if x > self.high_mild {
            Label::HighMild
        } else {
            Label::NotAnOutlier
        }
    }
}

/// Severity class of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Below the low-severe fence
    LowSevere,
    /// Between the low-severe and low-mild fences
    LowMild,
    /// Within the mild fences
    NotAnOutlier,
    /// Between the high-mild and high-severe fences
    HighMild,
    /// Above the high-severe fence
    HighSevere,
}

impl Label {
    /// Whether this label marks any kind of outlier
    pub fn is_outlier(self) -> bool {
        !matches!(self, Label::NotAnOutlier)
    }

    /// Whether this label marks a severe outlier
    pub fn is_severe(self) -> bool {
        matches!(self, Label::LowSevere | Label::HighSevere)
    }
}

/// A sample with every observation labelled by Tukey's fences
#[derive(Debug, Clone)]
pub struct LabeledSample<'a> {
    sample: &'a Sample,
    fences: Fences,
    labels: Vec<Label>,
}

impl<'a> LabeledSample<'a> {
    /// Fences used for labelling
    pub fn fences(&self) -> Fences {
        self.fences
    }

    /// Labels, one per observation, in sample order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Observations paired with their labels
    pub fn iter(&self) -> impl Iterator<Item = (f64, Label)> + '_ {
        self.sample
            .as_slice()
            .iter()
            .copied()
            .zip(self.labels.iter().copied())
    }

    /// Count of observations carrying `label`
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Counts as `(low_severe, low_mild, high_mild, high_severe)`
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.count(Label::LowSevere),
            self.count(Label::LowMild),
            self.count(Label::HighMild),
            self.count(Label::HighSevere),
        )
    }

    /// Total number of outliers of any severity
    pub fn outlier_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_outlier()).count()
    }
}

/// Label every observation of `sample` with Tukey's fences
pub fn tukey(sample: &Sample) -> LabeledSample<'_> {
    let fences = Fences::new(sample);
    let labels = sample
        .as_slice()
        .iter()
        .map(|&x| fences.classify(x))
        .collect();

    LabeledSample {
        sample,
        fences,
        labels,
    }
}
