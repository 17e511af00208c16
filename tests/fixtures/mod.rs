#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use trend_ta::{DerivedSeries, Ohlcv, Price};

/// OHLCV bar parsed from the gold 30-minute CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub index: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
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

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Reference value at a bar index.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub index: usize,
    pub expected: f64,
}

/// Reference MACD lines at a bar index.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub index: usize,
    pub dif: f64,
    pub dea: f64,
    pub macd: f64,
}

/// Reference Bollinger lines at a bar index.
#[derive(Debug, Deserialize)]
pub struct RefBollValue {
    pub index: usize,
    pub mid: f64,
    pub top: f64,
    pub bottom: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/au-30m.csv";

/// Load reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load single-value reference data (SMA, WMA, STD, EMA).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load MACD reference data (dif, dea, macd).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Load BOLL reference data (mid, top, bottom).
pub fn load_boll_ref(path: &str) -> Vec<RefBollValue> {
    load_records(path, "invalid BOLL reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Asserts `output` is undefined exactly where `reference` has no row and
/// matches it everywhere else.
pub fn assert_series_matches(
    name: &str,
    output: &DerivedSeries,
    reference: &[RefValue],
    tolerance: f64,
) {
    let mut rows = reference.iter().peekable();

    for (i, value) in output.iter().enumerate() {
        match rows.next_if(|row| row.index == i) {
            Some(row) => assert_near(*value, row.expected, tolerance, &format!("{name} at bar {i}")),
            None => assert!(value.is_nan(), "{name} at bar {i}: expected undefined, got {value}"),
        }
    }

    assert!(
        rows.next().is_none(),
        "{name}: reference has rows past the end of the output"
    );
}

/// Generate a reference match test for a single-line indicator.
///
/// Usage: `reference_test!(sma_20, Sma, SmaConfig::close(20), "tests/fixtures/data/sma-20-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use trend_ta::*;

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_values($ref_path);
                let ind = <$ind>::new($config.unwrap());

                let output = ind.compute(&bars);

                assert_eq!(output.len(), bars.len());
                assert_series_matches(stringify!($name), &output, &reference, $tolerance);
            }

            #[test]
            fn extracted_series_matches_bars() {
                let bars = load_reference_ohlcvs();
                let ind = <$ind>::new($config.unwrap());

                let closes = PriceSeries::from_bars(&bars, PriceSource::Close);
                let from_series = ind.compute_series(closes.as_slice());
                let from_bars = ind.compute(&bars);

                for (i, (a, b)) in from_series.iter().zip(from_bars.iter()).enumerate() {
                    assert!(
                        a.to_bits() == b.to_bits(),
                        "{} diverged at bar {i}: series={a}, bars={b}",
                        stringify!($name)
                    );
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
