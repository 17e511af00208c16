//! Trend indicators over time-ordered price series.
//!
//! Every indicator reads a whole history and returns output series aligned
//! with it: position `i` of the output belongs to position `i` of the input.
//! Positions that lack enough history hold the undefined sentinel [`NA`]
//! (a NaN), which [`DerivedSeries::get`] reports as `None`. Insufficient
//! history is never an error; nonsensical parameters are rejected up front
//! with [`Error::InvalidParameter`].
//!
//! Three layers:
//!
//! - [`trend`]: plain functions over `&[f64]` (`sma`, `wma`, `std`, `ema`,
//!   `macd`, `boll`).
//! - Indicator types ([`Sma`], [`Wma`], [`Std`], [`Ema`], [`Macd`],
//!   [`Boll`]) built from validated configs. They read any bar type
//!   implementing [`Ohlcv`] through a configurable [`PriceSource`] and
//!   expose [`new`](Sma::new) and [`compute`](Sma::compute) as inherent
//!   methods, no trait import needed. Import [`Indicator`] only for generic
//!   code.
//! - [`BollBreakout`]: the entry/exit rule that trades price crossings of
//!   the Bollinger Bands.

mod boll;
mod ema;
mod error;
mod indicator;
mod macd;
mod ohlcv;
mod price_source;
mod ring_buffer;
mod series;
mod signal;
mod sma;
mod std_dev;
pub mod trend;
mod window;
mod wma;

pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price};
pub use crate::price_source::PriceSource;
pub use crate::series::{DerivedSeries, NA, PriceSeries};

pub use crate::boll::{Boll, BollConfig, BollConfigBuilder, BollSeries, BollValue, Deviations};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, exponential_mean};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdSeries, MacdValue};
pub use crate::signal::{BollBreakout, Decision, Position, Side};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use crate::std_dev::{Std, StdConfig, StdConfigBuilder};
pub use crate::window::{rolling_mean, rolling_std_dev, rolling_weighted_mean};
pub use crate::wma::{Wma, WmaConfig, WmaConfigBuilder};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[must_use]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> $output {
                <Self as Indicator>::compute(self, bars)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, DerivedSeries);
impl_indicator_methods!(Wma, WmaConfig, DerivedSeries);
impl_indicator_methods!(Std, StdConfig, DerivedSeries);
impl_indicator_methods!(Ema, EmaConfig, DerivedSeries);
impl_indicator_methods!(Macd, MacdConfig, MacdSeries);
impl_indicator_methods!(Boll, BollConfig, BollSeries);

#[cfg(test)]
mod test_util;
