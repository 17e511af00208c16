use std::{fmt::Display, num::NonZero};

use crate::{
    DerivedSeries, Error, Indicator, IndicatorConfig, Ohlcv, Price, PriceSource, Result,
    ema::exponential_mean, indicator::require_length,
};

/// Configuration for the MACD ([`Macd`]) indicator.
///
/// Holds the three EMA spans and the price fields the fast and slow EMAs
/// read. The slow EMA defaults to the **low** price while the fast EMA
/// reads the close: this is the variant the Bollinger breakout strategy was
/// tuned with. Use [`MacdConfig::textbook`] (or set
/// [`slow_source`](MacdConfigBuilder::slow_source) to
/// [`PriceSource::Close`]) for the standard definition with both EMAs on
/// the same field.
///
/// # Example
///
/// ```
/// use trend_ta::{IndicatorConfig, MacdConfig, PriceSource};
///
/// let strategy = MacdConfig::builder().fast(12).slow(26).signal(9).build()?;
/// assert_eq!(strategy.slow_source(), PriceSource::Low);
///
/// let textbook = MacdConfig::textbook(12, 26, 9)?;
/// assert_eq!(textbook.slow_source(), PriceSource::Close);
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
    fast_source: PriceSource,
    slow_source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    /// Source of the fast EMA.
    #[inline]
    fn source(&self) -> &PriceSource {
        &self.fast_source
    }
}

impl MacdConfig {
    /// Fast EMA span.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.get()
    }

    /// Slow EMA span.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow.get()
    }

    /// Signal line (DEA) span.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }

    #[inline]
    #[must_use]
    pub fn fast_source(&self) -> PriceSource {
        self.fast_source
    }

    #[inline]
    #[must_use]
    pub fn slow_source(&self) -> PriceSource {
        self.slow_source
    }

    /// Fast EMA on close, slow EMA on low.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if any span is zero.
    pub fn close_low(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        Self::builder().fast(fast).slow(slow).signal(signal).build()
    }

    /// Both EMAs on close.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if any span is zero.
    pub fn textbook(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        Self::builder()
            .fast(fast)
            .slow(slow)
            .signal(signal)
            .slow_source(PriceSource::Close)
            .build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.fast_source, self.slow_source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast source = [`PriceSource::Close`], slow source =
/// [`PriceSource::Low`]. All three spans must be set before calling
/// [`build`](MacdConfigBuilder::build).
pub struct MacdConfigBuilder {
    fast: Option<usize>,
    slow: Option<usize>,
    signal: Option<usize>,
    fast_source: PriceSource,
    slow_source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: None,
            slow: None,
            signal: None,
            fast_source: PriceSource::Close,
            slow_source: PriceSource::Low,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast(mut self, span: usize) -> Self {
        self.fast.replace(span);
        self
    }

    #[inline]
    #[must_use]
    pub fn slow(mut self, span: usize) -> Self {
        self.slow.replace(span);
        self
    }

    #[inline]
    #[must_use]
    pub fn signal(mut self, span: usize) -> Self {
        self.signal.replace(span);
        self
    }

    #[inline]
    #[must_use]
    pub fn fast_source(mut self, source: PriceSource) -> Self {
        self.fast_source = source;
        self
    }

    #[inline]
    #[must_use]
    pub fn slow_source(mut self, source: PriceSource) -> Self {
        self.slow_source = source;
        self
    }

    /// Builds the config.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if any span is missing or zero.
    pub fn build(self) -> Result<MacdConfig> {
        Ok(MacdConfig {
            fast: require_length("fast", self.fast)?,
            slow: require_length("slow", self.slow)?,
            signal: require_length("signal", self.signal)?,
            fast_source: self.fast_source,
            slow_source: self.slow_source,
        })
    }
}

/// Snapshot of one MACD position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    dif: Price,
    dea: Price,
    macd: Price,
}

impl MacdValue {
    /// Fast EMA minus slow EMA.
    #[inline]
    #[must_use]
    pub fn dif(&self) -> Price {
        self.dif
    }

    /// Signal line: EMA of `dif`.
    #[inline]
    #[must_use]
    pub fn dea(&self) -> Price {
        self.dea
    }

    /// Histogram: `2 × (dif − dea)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD(dif: {}, dea: {}, macd: {})",
            self.dif, self.dea, self.macd
        )
    }
}

/// MACD output: three series aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    dif: DerivedSeries,
    dea: DerivedSeries,
    macd: DerivedSeries,
}

impl MacdSeries {
    /// Fast EMA minus slow EMA.
    #[must_use]
    pub fn dif(&self) -> &DerivedSeries {
        &self.dif
    }

    /// Signal line: EMA of `dif`.
    #[must_use]
    pub fn dea(&self) -> &DerivedSeries {
        &self.dea
    }

    /// Histogram: `2 × (dif − dea)`.
    #[must_use]
    pub fn macd(&self) -> &DerivedSeries {
        &self.macd
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dif.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dif.is_empty()
    }

    /// Values at `index`, or `None` if any line is undefined there.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MacdValue> {
        Some(MacdValue {
            dif: self.dif.get(index)?,
            dea: self.dea.get(index)?,
            macd: self.macd.get(index)?,
        })
    }

    /// Values at the most recent position.
    #[must_use]
    pub fn latest(&self) -> Option<MacdValue> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// dif  = EMA(fast_source, fast) − EMA(slow_source, slow)
/// dea  = EMA(dif, signal)
/// macd = 2 × (dif − dea)
/// ```
///
/// Every line is defined from the first bar on, since EMA has no warm-up.
///
/// # Example
///
/// ```
/// use trend_ta::{Macd, MacdConfig};
///
/// let macd = Macd::new(MacdConfig::textbook(12, 26, 9)?);
/// let closes: Vec<f64> = (1..=60).map(f64::from).collect();
/// let out = macd.compute_series(&closes, &closes)?;
///
/// let last = out.latest().unwrap();
/// assert!(last.dif() > 0.0);
/// assert_eq!(last.macd(), 2.0 * (last.dif() - last.dea()));
/// # Ok::<(), trend_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Macd {
    /// Computes MACD over already extracted fast and slow input series.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the two series differ in length.
    pub fn compute_series(&self, fast_input: &[Price], slow_input: &[Price]) -> Result<MacdSeries> {
        if fast_input.len() != slow_input.len() {
            return Err(Error::invalid(
                "slow_input",
                format_args!(
                    "length {} does not match fast input length {}",
                    slow_input.len(),
                    fast_input.len()
                ),
            ));
        }

        Ok(self.compose(fast_input, slow_input))
    }

    fn compose(&self, fast_input: &[Price], slow_input: &[Price]) -> MacdSeries {
        tracing::trace!(indicator = %self, len = fast_input.len(), "computing");

        let fast = exponential_mean(fast_input, self.config.fast);
        let slow = exponential_mean(slow_input, self.config.slow);

        let dif = fast.zip_with(&slow, |f, s| f - s);
        let dea = exponential_mean(dif.values(), self.config.signal);
        let macd = dif.zip_with(&dea, |dif, dea| 2.0 * (dif - dea));

        MacdSeries { dif, dea, macd }
    }
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> MacdSeries {
        let fast_input = self.config.fast_source.extract_all(bars);
        let slow_input = self.config.slow_source.extract_all(bars);

        self.compose(&fast_input, &slow_input)
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {}/{})",
            self.config.fast,
            self.config.slow,
            self.config.signal,
            self.config.fast_source,
            self.config.slow_source,
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        NA,
        test_util::{Bar, bars, random_walk},
    };

    fn textbook(fast: usize, slow: usize, signal: usize) -> Macd {
        Macd::new(MacdConfig::textbook(fast, slow, signal).unwrap())
    }

    mod composition {
        use super::*;

        #[test]
        fn histogram_is_twice_dif_minus_dea() {
            let closes = random_walk(250, 9);
            let out = textbook(12, 26, 9).compute(&bars(&closes));
            for i in 0..out.len() {
                let v = out.get(i).unwrap();
                assert_eq!(v.macd(), 2.0 * (v.dif() - v.dea()));
            }
        }

        #[test]
        fn dif_is_difference_of_emas() {
            let closes = random_walk(120, 4);
            let out = textbook(12, 26, 9).compute_series(&closes, &closes).unwrap();
            let fast = exponential_mean(&closes, NonZero::new(12).unwrap());
            let slow = exponential_mean(&closes, NonZero::new(26).unwrap());
            for i in 0..closes.len() {
                assert_eq!(out.dif()[i], fast[i] - slow[i]);
            }
        }

        #[test]
        fn first_position_is_zero_on_same_field() {
            let out = textbook(12, 26, 9).compute_series(&[100.0, 101.0], &[100.0, 101.0]);
            let first = out.unwrap().get(0).unwrap();
            assert_eq!(first.dif(), 0.0);
            assert_eq!(first.dea(), 0.0);
            assert_eq!(first.macd(), 0.0);
        }

        #[test]
        fn constant_series_is_flat() {
            let out = textbook(3, 6, 2).compute(&bars(&[10.0; 20]));
            assert!(out.macd().iter().all(|&v| v == 0.0));
        }

        #[test]
        fn small_worked_example() {
            // fast span 1 tracks the close; slow span 3 has α = 0.5; signal span 1 = dif
            let out = textbook(1, 3, 1).compute_series(&[2.0, 4.0, 6.0], &[2.0, 4.0, 6.0]);
            let out = out.unwrap();
            // slow EMA: 2, 3, 4.5 → dif: 0, 1, 1.5
            assert_eq!(out.dif().values(), &[0.0, 1.0, 1.5]);
            assert_eq!(out.dea().values(), &[0.0, 1.0, 1.5]);
            assert_eq!(out.macd().values(), &[0.0, 0.0, 0.0]);
        }
    }

    mod sources {
        use super::*;

        #[test]
        fn default_reads_low_for_slow_ema() {
            let bars = [
                Bar::new(0.0, 12.0, 8.0, 10.0),
                Bar::new(0.0, 14.0, 9.0, 12.0),
            ];
            let macd = Macd::new(MacdConfig::close_low(1, 1, 1).unwrap());
            // spans of one track their inputs: dif = close − low
            let out = macd.compute(&bars);
            assert_eq!(out.dif().values(), &[2.0, 3.0]);
        }

        #[test]
        fn textbook_reads_close_for_both() {
            let bars = [
                Bar::new(0.0, 12.0, 8.0, 10.0),
                Bar::new(0.0, 14.0, 9.0, 12.0),
            ];
            let out = textbook(1, 1, 1).compute(&bars);
            assert_eq!(out.dif().values(), &[0.0, 0.0]);
        }
    }

    mod propagation {
        use super::*;

        #[test]
        fn undefined_input_yields_undefined_output() {
            let out = textbook(2, 3, 2)
                .compute_series(&[NA, 1.0, 2.0], &[NA, 1.0, 2.0])
                .unwrap();
            assert_eq!(out.get(0), None);
            assert!(out.get(1).is_some());
            assert_eq!(out.latest(), out.get(2));
        }

        #[test]
        fn empty_input() {
            let out = textbook(12, 26, 9).compute_series(&[], &[]).unwrap();
            assert!(out.is_empty());
            assert_eq!(out.latest(), None);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn mismatched_lengths_rejected() {
            let err = textbook(12, 26, 9)
                .compute_series(&[1.0, 2.0], &[1.0])
                .unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter {
                    name: "slow_input",
                    ..
                }
            ));
        }

        #[test]
        fn zero_span_rejected() {
            let cases = [
                (0, 26, 9, "fast"),
                (12, 0, 9, "slow"),
                (12, 26, 0, "signal"),
            ];
            for (fast, slow, signal, name) in cases {
                let err = MacdConfig::close_low(fast, slow, signal).unwrap_err();
                assert!(matches!(err, Error::InvalidParameter { name: n, .. } if n == name));
            }
        }

        #[test]
        fn missing_span_rejected() {
            assert!(MacdConfig::builder().fast(12).slow(26).build().is_err());
        }
    }

    #[test]
    fn display() {
        let macd = Macd::new(MacdConfig::close_low(12, 26, 9).unwrap());
        assert_eq!(macd.to_string(), "MACD(12, 26, 9, Close/Low)");
        assert_eq!(
            MacdConfig::textbook(12, 26, 9).unwrap().to_string(),
            "MacdConfig(12, 26, 9, Close, Close)"
        );
    }
}
