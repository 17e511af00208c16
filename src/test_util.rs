// src/test_util.rs

use crate::{Ohlcv, Price};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts that two `f64` values are within an absolute tolerance.
macro_rules! assert_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (a, e, t) = ($actual, $expected, $tolerance);
        assert!(
            (a - e).abs() <= t,
            "assert_near failed: actual={a}, expected={e}, diff={} > {t}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;
pub(crate) use assert_near;

pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }
}

/// Convenience: bar with just a close price (OHLC all equal to close).
pub fn bar(close: f64) -> Bar {
    Bar::new(close, close, close, close)
}

/// Bars built from a close-price column.
pub fn bars(closes: &[f64]) -> Vec<Bar> {
    closes.iter().copied().map(bar).collect()
}

/// Reference O(n·w) rolling aggregate used to cross-check the incremental
/// accumulators.
pub fn naive_rolling(series: &[f64], n: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    (0..series.len())
        .map(|i| {
            if i + 1 < n {
                f64::NAN
            } else {
                f(&series[i + 1 - n..=i])
            }
        })
        .collect()
}

/// Deterministic pseudo-random walk, good enough to exercise drift.
pub fn random_walk(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut price = 100.0;

    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            #[allow(clippy::cast_precision_loss)]
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            price += (unit - 0.5) * 2.0;
            price
        })
        .collect()
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }
    fn high(&self) -> Price {
        self.high
    }
    fn low(&self) -> Price {
        self.low
    }
    fn close(&self) -> Price {
        self.close
    }
}
