//! Trend indicators as plain functions over price slices.
//!
//! Each function validates its parameters, runs the matching indicator on
//! the close (or other) column the caller passes in, and returns series
//! aligned with the input. Use the indicator types directly to read prices
//! straight from [`Ohlcv`](crate::Ohlcv) bars or to pick a
//! [`PriceSource`](crate::PriceSource).
//!
//! ```
//! use trend_ta::trend;
//!
//! let closes = [10.0, 10.0, 10.0, 10.0, 10.0];
//! let bands = trend::boll(&closes, 3, 2.0)?;
//!
//! assert_eq!(bands.mid().get(1), None);
//! assert_eq!(bands.top().last(), Some(10.0));
//! assert_eq!(bands.bottom().last(), Some(10.0));
//! # Ok::<(), trend_ta::Error>(())
//! ```

use crate::{
    Boll, BollConfig, BollSeries, DerivedSeries, Ema, EmaConfig, Macd, MacdConfig, MacdSeries,
    Price, Result, Sma, SmaConfig, Std, StdConfig, Wma, WmaConfig,
};

/// Simple moving average over `n` values.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `n` is zero.
pub fn sma(series: &[Price], n: usize) -> Result<DerivedSeries> {
    Ok(Sma::new(SmaConfig::close(n)?).compute_series(series))
}

/// Weighted moving average over `n` values, newest weighted `n`.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `n` is zero.
pub fn wma(series: &[Price], n: usize) -> Result<DerivedSeries> {
    Ok(Wma::new(WmaConfig::close(n)?).compute_series(series))
}

/// Rolling sample standard deviation over `n` values.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `n` is zero.
pub fn std(series: &[Price], n: usize) -> Result<DerivedSeries> {
    Ok(Std::new(StdConfig::close(n)?).compute_series(series))
}

/// Exponential moving average with `α = 2 / (span + 1)`.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `span` is
/// zero.
pub fn ema(series: &[Price], span: usize) -> Result<DerivedSeries> {
    Ok(Ema::new(EmaConfig::close(span)?).compute_series(series))
}

/// MACD with the fast EMA over `close` and the slow EMA over `low`.
///
/// This is the strategy's variant, not the textbook one; pass the close
/// column twice for the standard definition.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if any span
/// is zero or the two columns differ in length.
pub fn macd(
    close: &[Price],
    low: &[Price],
    n_fast: usize,
    n_slow: usize,
    n_signal: usize,
) -> Result<MacdSeries> {
    Macd::new(MacdConfig::close_low(n_fast, n_slow, n_signal)?).compute_series(close, low)
}

/// Bollinger Bands: SMA over `n` values ± `k` sample standard deviations.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `n` is zero
/// or `k` is not a positive finite number.
pub fn boll(close: &[Price], n: usize, k: f64) -> Result<BollSeries> {
    Ok(Boll::new(BollConfig::close(n, k)?).compute_series(close))
}
