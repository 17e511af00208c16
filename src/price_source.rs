use crate::{Ohlcv, Price};

use std::fmt::Display;

/// Price field extracted from each [`Ohlcv`] bar before it enters an
/// indicator.
///
/// Each indicator config carries a `PriceSource` that determines which
/// value (or derived value) of the bar the series is built from.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Close => ohlcv.close(),
            Self::Low => ohlcv.low(),
            Self::HL2 => f64::midpoint(ohlcv.high(), ohlcv.low()),
            Self::HLC3 => (ohlcv.high() + ohlcv.low() + ohlcv.close()) / 3.0,
            Self::OHLC4 => (ohlcv.open() + ohlcv.high() + ohlcv.low() + ohlcv.close()) / 4.0,
            Self::HLCC4 => (ohlcv.high() + ohlcv.low() + ohlcv.close() + ohlcv.close()) / 4.0,
            Self::TrueRange => {
                let hl = ohlcv.high() - ohlcv.low();

                match prev_close {
                    Some(prev_close) => {
                        let hc = (ohlcv.high() - prev_close).abs();
                        let lc = (ohlcv.low() - prev_close).abs();
                        hl.max(hc).max(lc)
                    }
                    None => hl,
                }
            }
        }
    }

    /// Extracts this field from every bar, oldest first.
    pub(crate) fn extract_all<B: Ohlcv>(self, bars: &[B]) -> Vec<Price> {
        let mut prev_close = None;

        bars.iter()
            .map(|bar| {
                let price = self.extract(bar, prev_close);
                prev_close = Some(bar.close());
                price
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, assert_approx};

    fn bar() -> Bar {
        Bar::new(10.0, 30.0, 5.0, 20.0)
    }

    mod single_bar {
        use super::*;

        #[test]
        fn extract_plain_fields() {
            assert_eq!(PriceSource::Open.extract(&bar(), None), 10.0);
            assert_eq!(PriceSource::High.extract(&bar(), None), 30.0);
            assert_eq!(PriceSource::Low.extract(&bar(), None), 5.0);
            assert_eq!(PriceSource::Close.extract(&bar(), None), 20.0);
        }

        #[test]
        fn extract_hl2() {
            // (30 + 5) / 2 = 17.5
            assert_eq!(PriceSource::HL2.extract(&bar(), None), 17.5);
        }

        #[test]
        fn extract_hlc3() {
            // (30 + 5 + 20) / 3 = 18.333...
            let result = PriceSource::HLC3.extract(&bar(), None);
            assert_approx!(result, 55.0 / 3.0);
        }

        #[test]
        fn extract_ohlc4() {
            // (10 + 30 + 5 + 20) / 4 = 16.25
            assert_eq!(PriceSource::OHLC4.extract(&bar(), None), 16.25);
        }

        #[test]
        fn extract_hlcc4() {
            // (30 + 5 + 20 + 20) / 4 = 18.75
            assert_eq!(PriceSource::HLCC4.extract(&bar(), None), 18.75);
        }

        #[test]
        fn true_range_without_prev_close_falls_back_to_hl() {
            assert_eq!(PriceSource::TrueRange.extract(&bar(), None), 25.0);
        }

        #[test]
        fn true_range_gap_down_uses_prev_close() {
            // hl = 25, |30 - 50| = 20, |5 - 50| = 45
            assert_eq!(PriceSource::TrueRange.extract(&bar(), Some(50.0)), 45.0);
        }
    }

    mod column {
        use super::*;

        #[test]
        fn keeps_bar_order() {
            let bars = [
                Bar::new(1.0, 4.0, 0.5, 2.0),
                Bar::new(2.0, 5.0, 1.5, 3.0),
                Bar::new(3.0, 6.0, 2.5, 4.0),
            ];
            assert_eq!(PriceSource::Close.extract_all(&bars), vec![2.0, 3.0, 4.0]);
            assert_eq!(PriceSource::Low.extract_all(&bars), vec![0.5, 1.5, 2.5]);
        }

        #[test]
        fn true_range_threads_previous_close() {
            let bars = [
                Bar::new(10.0, 20.0, 5.0, 15.0),
                // hl = 10, |22 - 15| = 7, |12 - 15| = 3
                Bar::new(16.0, 22.0, 12.0, 18.0),
                // hl = 10, |30 - 18| = 12, |20 - 18| = 2
                Bar::new(25.0, 30.0, 20.0, 28.0),
            ];
            assert_eq!(
                PriceSource::TrueRange.extract_all(&bars),
                vec![15.0, 10.0, 12.0]
            );
        }

        #[test]
        fn empty_bars_give_empty_column() {
            let bars: [Bar; 0] = [];
            assert!(PriceSource::Close.extract_all(&bars).is_empty());
        }
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(PriceSource::HLCC4.to_string(), "HLCC4");
    }
}
