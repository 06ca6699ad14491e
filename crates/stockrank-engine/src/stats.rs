//! Numeric helpers shared by factor extraction and normalization

/// Arithmetic mean, or 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N), or 0 for an empty slice
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let sq_sum: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sq_sum / values.len() as f64).sqrt()
}

/// Observed range of one factor across a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Min and max over `values`, `None` when there are no values
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    /// Min-max rescale into [0, 1]; a zero-width range maps everything to 0.5
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max == self.min {
            return 0.5;
        }
        (value - self.min) / (self.max - self.min)
    }
}
