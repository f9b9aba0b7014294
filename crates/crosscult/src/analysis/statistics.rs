//! Descriptive statistics over numeric columns.

use serde::{Deserialize, Serialize};

use crate::schema::Value;

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Streaming accumulator for count, mean, variance and range.
#[derive(Debug, Clone)]
pub struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl StreamingStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a value using Welford's online algorithm.
    pub fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Add every numeric cell, skipping nulls and non-numeric values.
    pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) {
        for value in values {
            if let Some(x) = value.as_f64() {
                self.add(x);
            }
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Sample variance (n - 1 denominator). `NaN` below two values.
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Freeze the accumulator into [`Moments`]; `None` when nothing was added.
    pub fn finish(&self) -> Option<Moments> {
        if self.count == 0 {
            return None;
        }
        Some(Moments {
            count: self.count,
            mean: self.mean,
            std: self.sample_variance().sqrt(),
            min: self.min,
            max: self.max,
        })
    }
}

impl Default for StreamingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary moments of a numeric sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Number of non-null values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` for a single value.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Moments {
    /// Moments of the numeric cells in `values`.
    pub fn of<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Moments> {
        let mut stats = StreamingStats::new();
        stats.extend(values);
        stats.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments_sample_std() {
        let values: Vec<Value> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .into_iter()
            .map(Value::Float)
            .collect();
        let m = Moments::of(&values).unwrap();

        assert_eq!(m.count, 8);
        assert!((m.mean - 5.0).abs() < 1e-12);
        // Sample variance = 32 / 7
        assert!((m.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(m.min, 2.0);
        assert_eq!(m.max, 9.0);
    }

    #[test]
    fn test_moments_skip_nulls() {
        let values = vec![Value::Null, Value::Float(3.0), Value::from("oops")];
        let m = Moments::of(&values).unwrap();
        assert_eq!(m.count, 1);
        assert!(m.std.is_nan());
    }

    #[test]
    fn test_moments_empty() {
        assert!(Moments::of(&[Value::Null]).is_none());
    }
}
