use crate::{Ohlcv, PriceSource, Result};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    num::NonZero,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (window length, price source, etc). Configs are value types: cheap to
/// clone, compare, and hash. A config only exists in a validated state:
/// builders reject nonsensical parameters with
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter).
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Price source extracted from each bar.
    fn source(&self) -> &PriceSource;
}

/// Builder for a single-window [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the window length. Zero is rejected by
    /// [`build`](IndicatorConfigBuilder::build).
    #[must_use]
    fn length(self, length: usize) -> Self;

    /// Sets the price source.
    #[must_use]
    fn source(self, source: PriceSource) -> Self;

    /// Builds the config.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if the
    /// length is missing or zero, or any indicator-specific parameter is
    /// out of range.
    fn build(self) -> Result<Config>;
}

/// A batch technical indicator.
///
/// Indicators are stateless apart from their config: each call to
/// [`compute`](Indicator::compute) reads the whole bar history and returns
/// output series aligned with it. Positions without enough history hold the
/// undefined sentinel [`NA`](crate::NA).
///
/// # Example
///
/// ```
/// use trend_ta::{Sma, SmaConfig, Indicator, Ohlcv, Price};
///
/// struct Bar(f64);
/// impl Ohlcv for Bar {
///     fn open(&self) -> Price { self.0 }
///     fn high(&self) -> Price { self.0 }
///     fn low(&self) -> Price { self.0 }
///     fn close(&self) -> Price { self.0 }
/// }
///
/// let sma = Sma::new(SmaConfig::close(3)?);
/// let out = sma.compute(&[Bar(10.0), Bar(20.0), Bar(30.0)]);
///
/// assert_eq!(out.get(1), None);
/// assert_eq!(out.get(2), Some(20.0));
/// # Ok::<(), trend_ta::Error>(())
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. A [`DerivedSeries`](crate::DerivedSeries) for
    /// simple indicators, a named bundle of series for composite ones.
    type Output: Send + Sync + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Computes the indicator over `bars`, ordered oldest to newest.
    fn compute(&self, bars: &[impl Ohlcv]) -> Self::Output;
}

/// Validates a window length or span taken from a builder.
pub(crate) fn require_length(name: &'static str, length: Option<usize>) -> Result<NonZero<usize>> {
    let length = length.ok_or_else(|| crate::Error::invalid(name, "is required"))?;

    NonZero::new(length).ok_or_else(|| crate::Error::invalid(name, "must be positive"))
}
