use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use crate::{
    DerivedSeries, Error, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price,
    PriceSource, Result,
    indicator::require_length,
    window::{rolling_mean, rolling_std_dev},
};

/// Standard deviation multiplier `k` for Bollinger Bands.
///
/// Wraps a positive, finite `f64`. Defaults to `2.0` (the standard
/// Bollinger Bands setting).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is sound
/// because NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Deviations(f64);

impl Deviations {
    /// Creates a new multiplier.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `value` is zero, negative, infinite
    /// or NaN.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid("k", format_args!("{value} is not finite")));
        }
        if value <= 0.0 {
            return Err(Error::invalid("k", format_args!("{value} is not positive")));
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Deviations {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Deviations {}

impl Hash for Deviations {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for Deviations {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Configuration for the Bollinger Bands ([`Boll`]) indicator.
///
/// # Example
///
/// ```
/// use trend_ta::{BollConfig, IndicatorConfig, IndicatorConfigBuilder};
///
/// // Default: close, k = 2
/// let config = BollConfig::builder().length(26).build()?;
///
/// assert_eq!(config.length(), 26);
/// assert_eq!(config.deviations().value(), 2.0);
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BollConfig {
    length: NonZero<usize>,
    source: PriceSource,
    deviations: Deviations,
}

impl IndicatorConfig for BollConfig {
    type Builder = BollConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BollConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl BollConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Standard deviation multiplier for the top and bottom bands.
    #[inline]
    #[must_use]
    pub fn deviations(&self) -> Deviations {
        self.deviations
    }

    /// BOLL(26, Close, 2σ): the setting the breakout strategy trades on.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_26() -> Self {
        Self {
            length: NonZero::new(26).expect("26 is non-zero"),
            source: PriceSource::Close,
            deviations: Deviations::default(),
        }
    }

    /// Bands on closing price with `k` standard deviations.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `length` is zero or `k` is not a
    /// positive finite number.
    pub fn close(length: usize, k: f64) -> Result<Self> {
        Self::builder().length(length).deviations(k).build()
    }
}

impl Display for BollConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BollConfig({}, {}, {})",
            self.length,
            self.source,
            self.deviations.value()
        )
    }
}

/// Builder for [`BollConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `k` = `2.0`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BollConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    deviations: f64,
}

impl BollConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            deviations: Deviations::default().value(),
        }
    }

    /// Sets the multiplier `k`. Validated by
    /// [`build`](IndicatorConfigBuilder::build).
    #[inline]
    #[must_use]
    pub fn deviations(mut self, k: f64) -> Self {
        self.deviations = k;
        self
    }
}

impl IndicatorConfigBuilder<BollConfig> for BollConfigBuilder {
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

    fn build(self) -> Result<BollConfig> {
        Ok(BollConfig {
            length: require_length("length", self.length)?,
            source: self.source,
            deviations: Deviations::new(self.deviations)?,
        })
    }
}

/// Bollinger Bands at one position: mid, top and bottom lines.
///
/// ```text
/// top    = mid + k × σ
/// mid    = SMA
/// bottom = mid − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollValue {
    mid: Price,
    top: Price,
    bottom: Price,
}

impl BollValue {
    /// Builds a snapshot from already computed lines, e.g. ones received
    /// from another process.
    #[must_use]
    pub fn new(mid: Price, top: Price, bottom: Price) -> Self {
        Self { mid, top, bottom }
    }

    /// Middle line: SMA of the window.
    #[inline]
    #[must_use]
    pub fn mid(&self) -> Price {
        self.mid
    }

    /// Top band: `mid + k × σ`.
    #[inline]
    #[must_use]
    pub fn top(&self) -> Price {
        self.top
    }

    /// Bottom band: `mid − k × σ`.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> Price {
        self.bottom
    }

    /// Band width: `top − bottom`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.top - self.bottom
    }
}

impl Display for BollValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BOLL(top: {}, mid: {}, bottom: {})",
            self.top, self.mid, self.bottom
        )
    }
}

/// Bollinger Bands output: three series aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollSeries {
    mid: DerivedSeries,
    top: DerivedSeries,
    bottom: DerivedSeries,
}

impl BollSeries {
    #[must_use]
    pub fn mid(&self) -> &DerivedSeries {
        &self.mid
    }

    #[must_use]
    pub fn top(&self) -> &DerivedSeries {
        &self.top
    }

    #[must_use]
    pub fn bottom(&self) -> &DerivedSeries {
        &self.bottom
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mid.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mid.is_empty()
    }

    /// Bands at `index`, or `None` while the window is incomplete.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<BollValue> {
        Some(BollValue {
            mid: self.mid.get(index)?,
            top: self.top.get(index)?,
            bottom: self.bottom.get(index)?,
        })
    }

    /// Bands at the most recent position.
    #[must_use]
    pub fn latest(&self) -> Option<BollValue> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }
}

/// Bollinger Bands (BOLL).
///
/// A volatility envelope: a simple moving average (mid) with top and bottom
/// bands offset by `k` sample standard deviations of the same window.
///
/// The mid line and the deviation share the window length, so the first
/// *n − 1* positions of all three lines are undefined. A window of one has
/// no sample deviation: the mid line is defined but the bands are not.
///
/// # Example
///
/// ```
/// use trend_ta::{Boll, BollConfig};
///
/// let boll = Boll::new(BollConfig::close(3, 2.0)?);
/// let out = boll.compute_series(&[10.0, 10.0, 10.0, 10.0, 10.0]);
///
/// assert_eq!(out.get(1), None);
/// let last = out.latest().unwrap();
/// assert_eq!((last.bottom(), last.mid(), last.top()), (10.0, 10.0, 10.0));
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Boll {
    config: BollConfig,
}

impl Boll {
    /// Computes the bands over an already extracted price series.
    #[must_use]
    pub fn compute_series(&self, series: &[Price]) -> BollSeries {
        tracing::trace!(indicator = %self, len = series.len(), "computing");

        let k = self.config.deviations.value();
        let mid = rolling_mean(series, self.config.length);
        let std_dev = rolling_std_dev(series, self.config.length);

        let top = mid.zip_with(&std_dev, |mid, sd| k.mul_add(sd, mid));
        let bottom = mid.zip_with(&std_dev, |mid, sd| (-k).mul_add(sd, mid));

        BollSeries { mid, top, bottom }
    }
}

impl Indicator for Boll {
    type Config = BollConfig;
    type Output = BollSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> BollSeries {
        self.compute_series(&self.config.source.extract_all(bars))
    }
}

impl Display for Boll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BOLL({}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.deviations.value(),
        )
    }
}
