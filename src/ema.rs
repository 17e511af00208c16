use std::{fmt::Display, num::NonZero};

use crate::{
    DerivedSeries, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price,
    PriceSource, Result, indicator::require_length,
};

/// Configuration for the Exponential Moving Average ([`Ema`]) indicator.
///
/// The span sets the smoothing factor `α = 2 / (span + 1)`.
///
/// # Example
///
/// ```
/// use trend_ta::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder};
///
/// let config = EmaConfig::builder().span(12).build()?;
///
/// assert_eq!(config.span(), 12);
/// assert_eq!(config.alpha(), 2.0 / 13.0);
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    span: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl EmaConfig {
    /// Span (number of bars) the smoothing factor is derived from.
    #[inline]
    #[must_use]
    pub fn span(&self) -> usize {
        self.span.get()
    }

    /// Smoothing factor `2 / (span + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        smoothing_factor(self.span)
    }

    /// EMA on closing price.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if
    /// `span` is zero.
    pub fn close(span: usize) -> Result<Self> {
        Self::builder().span(span).build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.span, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Span must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    span: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            span: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the span. Same as [`length`](IndicatorConfigBuilder::length).
    #[inline]
    #[must_use]
    pub fn span(mut self, span: usize) -> Self {
        self.span.replace(span);
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn length(self, length: usize) -> Self {
        self.span(length)
    }

    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    fn build(self) -> Result<EmaConfig> {
        Ok(EmaConfig {
            span: require_length("span", self.span)?,
            source: self.source,
        })
    }
}

#[inline]
fn smoothing_factor(span: NonZero<usize>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let span = span.get() as f64;

    2.0 / (span + 1.0)
}

/// One-pass exponential smoothing state: a single carried scalar.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExponentialSmoother {
    alpha: f64,
    current: Option<Price>,
    /// Undefined inputs seen since the last defined one.
    skipped: i32,
}

impl ExponentialSmoother {
    pub(crate) fn new(span: NonZero<usize>) -> Self {
        Self {
            alpha: smoothing_factor(span),
            current: None,
            skipped: 0,
        }
    }

    /// Folds `price` into the average and returns the new value.
    ///
    /// The first defined price seeds the average; before that the output is
    /// [`NA`](crate::NA). An undefined price after seeding repeats the
    /// carried average, and the carried weight keeps decaying by `1 − α` per
    /// skipped bar, so the next defined price counts for more than after a
    /// single step.
    #[inline]
    pub(crate) fn update(&mut self, price: Price) -> Price {
        let Some(previous) = self.current else {
            if !price.is_nan() {
                self.current = Some(price);
            }
            return price;
        };

        if price.is_nan() {
            self.skipped = self.skipped.saturating_add(1);
            return previous;
        }

        #[allow(clippy::float_cmp)]
        let next = if self.skipped == 0 {
            // α × price + (1 − α) × prev
            self.alpha.mul_add(price - previous, previous)
        } else if price == previous {
            previous
        } else {
            let carried = (1.0 - self.alpha).powi(self.skipped.saturating_add(1));
            carried.mul_add(previous, self.alpha * price) / (carried + self.alpha)
        };
        self.skipped = 0;
        self.current = Some(next);

        next
    }
}

/// Recursive exponential moving average with `α = 2 / (span + 1)`.
///
/// `EMA[0] = series[0]` and `EMA[i] = α × series[i] + (1 − α) × EMA[i − 1]`.
/// There is no warm-up period: every position after the first defined input
/// has a value.
///
/// ```
/// use std::num::NonZero;
/// use trend_ta::exponential_mean;
///
/// let ema = exponential_mean(&[1.0, 2.0, 3.0], NonZero::new(2).unwrap());
/// assert_eq!(ema.get(0), Some(1.0));
/// assert!((ema.get(1).unwrap() - 5.0 / 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn exponential_mean(series: &[Price], span: NonZero<usize>) -> DerivedSeries {
    let mut smoother = ExponentialSmoother::new(span);

    DerivedSeries::from_values(series.iter().map(|&price| smoother.update(price)).collect())
}

/// Exponential Moving Average (EMA).
///
/// A moving average that gives exponentially more weight to recent prices.
/// Uses the standard smoothing factor `α = 2 / (span + 1)`:
///
/// ```text
/// EMA[0] = price[0]
/// EMA[i] = α × price[i] + (1 − α) × EMA[i − 1]
/// ```
///
/// Unlike the windowed statistics, each output depends on the previous
/// output rather than on a fixed count of inputs, so the whole history is
/// folded in one pass through a single carried value.
///
/// # Example
///
/// ```
/// use trend_ta::{Ema, EmaConfig};
///
/// let ema = Ema::new(EmaConfig::close(3)?);
///
/// // α = 0.5: 2, 0.5 × 4 + 0.5 × 2 = 3, 0.5 × 6 + 0.5 × 3 = 4.5
/// let out = ema.compute_series(&[2.0, 4.0, 6.0]);
/// assert_eq!(out.values(), &[2.0, 3.0, 4.5]);
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Ema {
    /// Computes the EMA over an already extracted price series.
    #[must_use]
    pub fn compute_series(&self, series: &[Price]) -> DerivedSeries {
        tracing::trace!(indicator = %self, len = series.len(), "computing");

        exponential_mean(series, self.config.span)
    }
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = DerivedSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> DerivedSeries {
        self.compute_series(&self.config.source.extract_all(bars))
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.span, self.config.source)
    }
}
