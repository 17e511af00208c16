/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead. The undefined
/// sentinel is [`NA`](crate::NA), a NaN.
pub type Price = f64;

/// OHLCV bar data used as input to the bar-driven indicators.
///
/// Implement this on your own kline/candle type to avoid copying whole
/// columns out of it. Indicators accept `&[impl Ohlcv]`, ordered oldest
/// to newest, and extract the configured [`PriceSource`](crate::PriceSource)
/// from each bar.
///
/// # Example
///
/// ```
/// use trend_ta::{Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Defaults to `0.0`.
    fn volume(&self) -> f64 {
        0.0
    }
}
