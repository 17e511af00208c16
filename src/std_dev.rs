use std::{fmt::Display, num::NonZero};

use crate::{
    DerivedSeries, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    Result, indicator::require_length, window::rolling_std_dev,
};

/// Configuration for the rolling standard deviation ([`Std`]) indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StdConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for StdConfig {
    type Builder = StdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        StdConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl StdConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Standard deviation of closing price.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if
    /// `length` is zero.
    pub fn close(length: usize) -> Result<Self> {
        Self::builder().length(length).build()
    }
}

impl Display for StdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`StdConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
pub struct StdConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl StdConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }
}

impl IndicatorConfigBuilder<StdConfig> for StdConfigBuilder {
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

    fn build(self) -> Result<StdConfig> {
        Ok(StdConfig {
            length: require_length("length", self.length)?,
            source: self.source,
        })
    }
}

/// Rolling sample standard deviation.
///
/// Uses the `n − 1` denominator over each trailing window of *n* values.
/// A window of one has no sample deviation, so `Std(1)` is undefined at
/// every position. A window of identical values yields `0.0`.
///
/// Deviations are updated incrementally around the window mean (Welford)
/// for O(1) amortized work per bar. A window of one repeated value is
/// exactly `0.0`, whatever the price level.
#[derive(Clone, Debug)]
pub struct Std {
    config: StdConfig,
}

impl Std {
    /// Computes the rolling deviation over an already extracted price series.
    #[must_use]
    pub fn compute_series(&self, series: &[Price]) -> DerivedSeries {
        tracing::trace!(indicator = %self, len = series.len(), "computing");

        rolling_std_dev(series, self.config.length)
    }
}

impl Indicator for Std {
    type Config = StdConfig;
    type Output = DerivedSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> DerivedSeries {
        self.compute_series(&self.config.source.extract_all(bars))
    }
}

impl Display for Std {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "STD({}, {})", self.config.length, self.config.source)
    }
}
