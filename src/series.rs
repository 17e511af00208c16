use std::{ops::Index, slice};

use crate::{Ohlcv, Price, PriceSource};

/// Undefined sentinel stored at positions that lack enough history.
///
/// It is a NaN, so compare with [`f64::is_nan`] or go through
/// [`DerivedSeries::get`], which maps it to `None`.
pub const NA: Price = f64::NAN;

/// Ordered, append-only sequence of price observations.
///
/// Insertion order is time order. Transforms borrow the series as a slice
/// and never mutate it.
///
/// # Example
///
/// ```
/// use trend_ta::PriceSeries;
///
/// let mut closes = PriceSeries::from(vec![10.0, 11.0]);
/// closes.push(12.0);
///
/// assert_eq!(closes.len(), 3);
/// assert_eq!(closes.last(), Some(12.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceSeries(Vec<Price>);

impl PriceSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from one price field of each bar, oldest first.
    #[must_use]
    pub fn from_bars<B: Ohlcv>(bars: &[B], source: PriceSource) -> Self {
        Self(source.extract_all(bars))
    }

    /// Appends the newest observation.
    #[inline]
    pub fn push(&mut self, price: Price) {
        self.0.push(price);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent observation.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<Price> {
        self.0.last().copied()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Price] {
        &self.0
    }
}

impl From<Vec<Price>> for PriceSeries {
    fn from(values: Vec<Price>) -> Self {
        Self(values)
    }
}

impl From<&[Price]> for PriceSeries {
    fn from(values: &[Price]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<Price> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = Price>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Price> for PriceSeries {
    fn extend<I: IntoIterator<Item = Price>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl AsRef<[Price]> for PriceSeries {
    fn as_ref(&self) -> &[Price] {
        &self.0
    }
}

/// Output of a transform: one value per input position.
///
/// Position `i` of a derived series corresponds to position `i` of the
/// series it was computed from. Positions without enough history hold
/// [`NA`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedSeries(Vec<Price>);

impl DerivedSeries {
    pub(crate) fn from_values(values: Vec<Price>) -> Self {
        Self(values)
    }

    /// Series of `len` undefined positions.
    pub(crate) fn undefined(len: usize) -> Self {
        Self(vec![NA; len])
    }

    /// Element-wise combination of two aligned series. An undefined operand
    /// yields an undefined result through NaN arithmetic.
    pub(crate) fn zip_with(&self, other: &Self, f: impl Fn(Price, Price) -> Price) -> Self {
        debug_assert_eq!(self.len(), other.len(), "derived series must be aligned");

        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`, or `None` when out of range or undefined.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Price> {
        self.0.get(index).copied().filter(|v| !v.is_nan())
    }

    /// Most recent value, or `None` when empty or undefined.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<Price> {
        self.0.last().copied().filter(|v| !v.is_nan())
    }

    /// Whether position `index` holds a defined value.
    #[inline]
    #[must_use]
    pub fn is_defined(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Raw values, sentinel included.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Price] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, Price> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Price> {
        self.0
    }
}

impl Index<usize> for DerivedSeries {
    type Output = Price;

    fn index(&self, index: usize) -> &Price {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a DerivedSeries {
    type Item = &'a Price;
    type IntoIter = slice::Iter<'a, Price>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[Price]> for DerivedSeries {
    fn as_ref(&self) -> &[Price] {
        &self.0
    }
}
