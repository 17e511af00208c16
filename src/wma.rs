use std::{fmt::Display, num::NonZero};

use crate::{
    DerivedSeries, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    Result, indicator::require_length, window::rolling_weighted_mean,
};

/// Configuration for the Weighted Moving Average ([`Wma`]) indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct WmaConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for WmaConfig {
    type Builder = WmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        WmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl WmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// WMA on closing price.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if
    /// `length` is zero.
    pub fn close(length: usize) -> Result<Self> {
        Self::builder().length(length).build()
    }
}

impl Display for WmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`WmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
pub struct WmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl WmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }
}

impl IndicatorConfigBuilder<WmaConfig> for WmaConfigBuilder {
    #[inline]
    fn length(mut self, length: usize) -> Self {
        self.length.replace(length);
        self
    }

    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    fn build(self) -> Result<WmaConfig> {
        Ok(WmaConfig {
            length: require_length("length", self.length)?,
            source: self.source,
        })
    }
}

/// Weighted Moving Average (WMA).
///
/// Linearly recency-weighted mean of the last *n* values: the oldest value
/// in the window has weight 1, the newest weight *n*.
///
/// ```text
/// WMA = Σ(wᵢ × xᵢ) / Σwᵢ,   wᵢ = 1..=n
/// ```
///
/// The weighted sum is maintained incrementally: on each advance every
/// weight drops by one, so `Σwx' = Σwx − Σx + n × x_new`.
///
/// # Example
///
/// ```rust
/// use trend_ta::{Wma, WmaConfig};
///
/// let wma = Wma::new(WmaConfig::close(3)?);
/// let out = wma.compute_series(&[1.0, 2.0, 3.0]);
///
/// // (1×1 + 2×2 + 3×3) / 6
/// assert_eq!(out.last(), Some(14.0 / 6.0));
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Wma {
    config: WmaConfig,
}

impl Wma {
    /// Computes the WMA over an already extracted price series.
    #[must_use]
    pub fn compute_series(&self, series: &[Price]) -> DerivedSeries {
        tracing::trace!(indicator = %self, len = series.len(), "computing");

        rolling_weighted_mean(series, self.config.length)
    }
}

impl Indicator for Wma {
    type Config = WmaConfig;
    type Output = DerivedSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> DerivedSeries {
        self.compute_series(&self.config.source.extract_all(bars))
    }
}

impl Display for Wma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WMA({}, {})", self.config.length, self.config.source)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, bars};

    fn wma(length: usize) -> Wma {
        Wma::new(WmaConfig::close(length).unwrap())
    }

    #[test]
    fn undefined_until_window_full() {
        let out = wma(3).compute(&bars(&[1.0, 2.0, 3.0]));
        assert_eq!(out.get(0), None);
        assert_eq!(out.get(1), None);
        assert!(out.is_defined(2));
    }

    #[test]
    fn slides_with_recency_weights() {
        // [2, 3, 4]: (2 + 6 + 12) / 6 = 20 / 6
        let out = wma(3).compute(&bars(&[1.0, 2.0, 3.0, 4.0]));
        assert_approx!(out.last().unwrap(), 20.0 / 6.0);
    }

    #[test]
    fn rising_series_above_simple_mean() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let weighted = wma(5).compute_series(&closes).last().unwrap();
        // (1 + 4 + 9 + 16 + 25) / 15 = 55 / 15
        assert_approx!(weighted, 55.0 / 15.0);
        assert!(weighted > 3.0);
    }

    #[test]
    fn constant_series_is_constant() {
        let out = wma(4).compute_series(&[7.5; 10]);
        assert!(out.values()[3..].iter().all(|&v| v == 7.5));
    }

    #[test]
    fn rejects_zero_length() {
        assert!(WmaConfig::close(0).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(wma(26).to_string(), "WMA(26, Close)");
        assert_eq!(
            WmaConfig::close(26).unwrap().to_string(),
            "WmaConfig(26, Close)"
        );
    }
}
