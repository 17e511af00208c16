use std::num::NonZero;

use crate::{DerivedSeries, NA, Price, ring_buffer::RingBuffer};

/// Trailing window over the last `length` observations with running
/// aggregates.
///
/// Undefined inputs occupy a slot but contribute zero to the aggregates;
/// while any is inside the window every statistic reads as `None`.
#[derive(Clone, Debug)]
pub(crate) struct RollingWindow<const DEVIATION: bool = false> {
    ring: RingBuffer,
    length: f64,
    /// Running sum of values in the window. Maintained incrementally via
    /// add/subtract, may accumulate FP rounding drift over very long runs,
    /// but negligible for typical window sizes on financial data.
    sum: Price,
    /// `Σ weight·value` with weights `1..=length`, oldest to newest.
    weighted_sum: f64,
    undefined: usize,
    /// Length of the trailing run of identical defined values.
    run: usize,
    last: Price,
    /// Welford state over the defined values in the window, rebuilt from
    /// the ring once per `length` evictions to shed accumulated rounding.
    defined: usize,
    evictions: usize,
    centre: f64,
    squared_deviations: f64,
}

pub(crate) type RollingWindowWithDeviation = RollingWindow<true>;

impl<const DEVIATION: bool> RollingWindow<DEVIATION> {
    pub(crate) fn new(length: NonZero<usize>) -> Self {
        Self {
            ring: RingBuffer::new(length.get()),
            #[allow(clippy::cast_precision_loss)]
            length: length.get() as f64,
            sum: 0.0,
            weighted_sum: 0.0,
            undefined: 0,
            run: 0,
            last: NA,
            defined: 0,
            evictions: 0,
            centre: 0.0,
            squared_deviations: 0.0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, price: Price) {
        let value = if price.is_nan() {
            self.undefined += 1;
            0.0
        } else {
            price
        };

        #[allow(clippy::float_cmp)]
        let repeats = price == self.last;
        self.run = match (price.is_nan(), repeats) {
            (true, _) => 0,
            (false, true) => self.run.saturating_add(1),
            (false, false) => 1,
        };
        self.last = price;

        match self.ring.push(price) {
            Some(evicted) => {
                let old = if evicted.is_nan() {
                    self.undefined -= 1;
                    0.0
                } else {
                    if DEVIATION {
                        self.remove_deviation(evicted);
                    }
                    evicted
                };

                // Every weight drops by one; the evicted value falls to zero.
                self.weighted_sum += self.length.mul_add(value, -self.sum);
                self.sum += value - old;
            }
            None => {
                #[allow(clippy::cast_precision_loss)]
                let weight = self.ring.len() as f64;

                self.weighted_sum += weight * value;
                self.sum += value;
            }
        }

        if DEVIATION && !price.is_nan() {
            self.add_deviation(price);
        }
        if DEVIATION && self.ring.is_full() {
            self.evictions += 1;
            if self.evictions >= self.ring.capacity() {
                self.resync_deviation();
            }
        }
    }

    fn resync_deviation(&mut self) {
        self.evictions = 0;
        if self.defined == 0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.defined as f64;

        let defined = || self.ring.values().iter().filter(|v| !v.is_nan());
        let centre = defined().sum::<f64>() / count;
        self.squared_deviations = defined().map(|v| (v - centre) * (v - centre)).sum();
        self.centre = centre;
    }

    #[inline]
    fn add_deviation(&mut self, value: Price) {
        self.defined += 1;
        #[allow(clippy::cast_precision_loss)]
        let count = self.defined as f64;

        let delta = value - self.centre;
        self.centre += delta / count;
        self.squared_deviations += delta * (value - self.centre);
    }

    #[inline]
    fn remove_deviation(&mut self, value: Price) {
        self.defined -= 1;
        if self.defined == 0 {
            self.centre = 0.0;
            self.squared_deviations = 0.0;
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.defined as f64;

        let delta = value - self.centre;
        self.centre -= delta / count;
        self.squared_deviations -= delta * (value - self.centre);
    }

    /// Full window with no undefined values.
    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        self.ring.is_full() && self.undefined == 0
    }

    /// Every value in the window is the same.
    #[inline]
    fn is_flat(&self) -> bool {
        self.run >= self.ring.capacity()
    }

    #[inline]
    pub(crate) fn mean(&self) -> Option<Price> {
        if self.is_flat() {
            return Some(self.last);
        }

        self.is_ready().then(|| self.sum / self.length)
    }

    /// Linearly weighted mean, newest value weighted `length`.
    #[inline]
    pub(crate) fn weighted_mean(&self) -> Option<Price> {
        if self.is_flat() {
            return Some(self.last);
        }

        let total_weight = self.length * (self.length + 1.0) / 2.0;

        self.is_ready().then(|| self.weighted_sum / total_weight)
    }
}

impl RollingWindow<true> {
    /// Sample standard deviation, denominator `length - 1`.
    ///
    /// `None` for a window of one, where the sample deviation is undefined.
    /// Exactly `0.0` when every value in the window is the same.
    #[inline]
    pub(crate) fn sample_std_dev(&self) -> Option<f64> {
        if !self.is_ready() || self.ring.capacity() < 2 {
            return None;
        }
        if self.is_flat() {
            return Some(0.0);
        }

        Some((self.squared_deviations.max(0.0) / (self.length - 1.0)).sqrt())
    }
}

fn rolling<const DEVIATION: bool>(
    series: &[Price],
    length: NonZero<usize>,
    statistic: impl Fn(&RollingWindow<DEVIATION>) -> Option<Price>,
) -> DerivedSeries {
    if series.len() < length.get() {
        tracing::debug!(
            len = series.len(),
            window = length.get(),
            "series shorter than window, output is undefined"
        );
        return DerivedSeries::undefined(series.len());
    }

    let mut window = RollingWindow::<DEVIATION>::new(length);

    DerivedSeries::from_values(
        series
            .iter()
            .map(|&price| {
                window.push(price);
                statistic(&window).unwrap_or(NA)
            })
            .collect(),
    )
}

/// Arithmetic mean of each trailing window of `length` values.
///
/// The first `length - 1` positions are [`NA`].
///
/// ```
/// use std::num::NonZero;
/// use trend_ta::rolling_mean;
///
/// let mean = rolling_mean(&[1.0, 2.0, 3.0, 4.0], NonZero::new(2).unwrap());
/// assert_eq!(mean.get(0), None);
/// assert_eq!(mean.get(3), Some(3.5));
/// ```
#[must_use]
pub fn rolling_mean(series: &[Price], length: NonZero<usize>) -> DerivedSeries {
    rolling::<false>(series, length, RollingWindow::mean)
}

/// Linearly weighted mean of each trailing window: weights `1..=length`
/// assigned oldest to newest, divided by their sum.
#[must_use]
pub fn rolling_weighted_mean(series: &[Price], length: NonZero<usize>) -> DerivedSeries {
    rolling::<false>(series, length, RollingWindow::weighted_mean)
}

/// Sample standard deviation (denominator `length - 1`) of each trailing
/// window.
#[must_use]
pub fn rolling_std_dev(series: &[Price], length: NonZero<usize>) -> DerivedSeries {
    rolling::<true>(series, length, RollingWindowWithDeviation::sample_std_dev)
}
