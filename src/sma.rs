use std::{fmt::Display, num::NonZero};

use crate::{
    DerivedSeries, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    Result, indicator::require_length, window::rolling_mean,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use trend_ta::SmaConfig;
///
/// let config = SmaConfig::close(20)?;
/// assert_eq!(config.length(), 20);
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl SmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// SMA on closing price.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if
    /// `length` is zero.
    pub fn close(length: usize) -> Result<Self> {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if
    /// `length` is zero.
    pub fn hl2(length: usize) -> Result<Self> {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
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

    fn build(self) -> Result<SmaConfig> {
        Ok(SmaConfig {
            length: require_length("length", self.length)?,
            source: self.source,
        })
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* values, where *n* is the
/// configured window length. The first *n − 1* positions of the output are
/// undefined.
///
/// Uses a running sum for O(1) work per bar.
///
/// # Example
///
/// ```rust
/// use trend_ta::{Sma, SmaConfig};
///
/// let sma = Sma::new(SmaConfig::close(3)?);
/// let out = sma.compute_series(&[10.0, 20.0, 30.0, 40.0]);
///
/// assert_eq!(out.get(1), None);
/// assert_eq!(out.get(2), Some(20.0));
/// assert_eq!(out.last(), Some(30.0));
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Sma {
    /// Computes the SMA over an already extracted price series.
    #[must_use]
    pub fn compute_series(&self, series: &[Price]) -> DerivedSeries {
        tracing::trace!(indicator = %self, len = series.len(), "computing");

        rolling_mean(series, self.config.length)
    }
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = DerivedSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> DerivedSeries {
        self.compute_series(&self.config.source.extract_all(bars))
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}
