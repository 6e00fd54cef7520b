//! Scale mapping: axis domain heuristics, linear/band/threshold scales, and tick generation.
//!
//! The scales follow d3's semantics so the rendered charts line up with the
//! dashboard they replace.

use crate::models::{AggregateFn, Dimension, Measure};

/// 9-step ColorBrewer blues (bar chart fill).
pub const BLUES_9: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

/// 7-step ColorBrewer blues (map fill).
pub const BLUES_7: [&str; 7] = [
    "#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594",
];

/// Bar-chart fill breakpoints over the aggregated value.
pub const BAR_THRESHOLDS: [f64; 8] = [-150.0, -100.0, -50.0, 1.0, 50.0, 100.0, 300.0, 500.0];

/// Map fill breakpoints over the per-country intensity total.
pub const MAP_THRESHOLDS: [f64; 6] = [1.0, 5.0, 10.0, 15.0, 20.0, 25.0];

/// Upper bound of the bar chart's value axis.
///
/// A hand-tuned lookup, not derived from the data.
pub fn domain_bound(dimension: Dimension, agg: AggregateFn, measure: Measure) -> f64 {
    let source = dimension == Dimension::Source;
    let topic = dimension == Dimension::Topic;
    match measure {
        Measure::Intensity => match agg {
            AggregateFn::Count => {
                if source {
                    50.0
                } else {
                    500.0
                }
            }
            AggregateFn::Sum => {
                if source {
                    500.0
                } else {
                    5000.0
                }
            }
            AggregateFn::Avg => {
                if source || topic {
                    100.0
                } else {
                    20.0
                }
            }
            AggregateFn::Max => 100.0,
        },
        Measure::Likelihood | Measure::Relevance => match agg {
            AggregateFn::Sum | AggregateFn::Count => 900.0,
            AggregateFn::Avg | AggregateFn::Max => 40.0,
        },
    }
}

/// Continuous `domain -> range` mapping. Values outside the domain extrapolate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Inverse mapping from range back to domain.
    pub fn invert(&self, p: f64) -> f64 {
        LinearScale::new(self.range, self.domain).map(p)
    }

    /// Round tick values covering the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        ticks(lo, hi, count)
    }
}

/// d3's tick algorithm: steps of 1, 2, or 5 times a power of ten.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let mut out = Vec::new();
    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round();
        let mut i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            out.push(i / inc);
            i += 1.0;
        }
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            out.push(i * inc);
            i += 1.0;
        }
    }
    out
}

/// Ordinal keys laid out as equal bands across a pixel extent.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Same padding for inner gaps and outer margins, bands centered in the extent.
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = keys.len() as f64;
        let (r0, r1) = range;
        let extent = r1 - r0;
        let step = extent / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (extent - step * (n - padding)) * 0.5;
        Self {
            keys,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Top edge of a key's band.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Discrete mapping: `domain.len()` breakpoints split the line into `range.len()` buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale<T> {
    domain: Vec<f64>,
    range: Vec<T>,
}

impl<T: Copy> ThresholdScale<T> {
    pub fn new(domain: &[f64], range: &[T]) -> Self {
        debug_assert_eq!(domain.len() + 1, range.len());
        Self {
            domain: domain.to_vec(),
            range: range.to_vec(),
        }
    }

    /// Bucket of `v`: values equal to a breakpoint fall in the upper bucket.
    pub fn map(&self, v: f64) -> T {
        let idx = self.domain.partition_point(|d| *d <= v);
        self.range[idx.min(self.range.len() - 1)]
    }
}

/// Bar-chart color scale.
pub fn bar_color_scale() -> ThresholdScale<&'static str> {
    ThresholdScale::new(&BAR_THRESHOLDS, &BLUES_9)
}

/// Map color scale.
pub fn map_color_scale() -> ThresholdScale<&'static str> {
    ThresholdScale::new(&MAP_THRESHOLDS, &BLUES_7)
}
