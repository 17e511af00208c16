use std::fmt::Display;

use crate::{Boll, BollConfig, BollValue, Ohlcv, Price};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Long,
    Short,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Open position sizes as reported by the trading platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub long: u32,
    pub short: u32,
}

/// Actions the breakout rule asks for on one price update.
///
/// At most one side is opened and at most one side is closed. Placing the
/// orders is up to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub open: Option<Side>,
    pub close: Option<Side>,
}

impl Decision {
    /// No action.
    #[must_use]
    pub fn is_hold(&self) -> bool {
        self.open.is_none() && self.close.is_none()
    }
}

/// Bollinger breakout rule.
///
/// Evaluated on the latest price against the latest complete bands:
///
/// - price above the top band opens a long; otherwise price below the
///   bottom band opens a short;
/// - a held long is closed when price falls below the mid line; otherwise a
///   held short is closed when price rises above it.
///
/// Prices exactly on a line trigger nothing.
///
/// # Example
///
/// ```
/// use trend_ta::{BollBreakout, BollConfig, BollValue, Position, Side};
///
/// let rule = BollBreakout::new(BollConfig::default_26());
/// let bands = BollValue::new(100.0, 104.0, 96.0);
///
/// let decision = rule.evaluate(105.0, &bands, Position::default());
/// assert_eq!(decision.open, Some(Side::Long));
///
/// let held = Position { long: 1, short: 0 };
/// let decision = rule.evaluate(99.0, &bands, held);
/// assert_eq!(decision.close, Some(Side::Long));
/// ```
#[derive(Clone, Debug)]
pub struct BollBreakout {
    boll: Boll,
}

impl BollBreakout {
    #[must_use]
    pub fn new(config: BollConfig) -> Self {
        Self {
            boll: Boll::new(config),
        }
    }

    /// Applies the rule to already computed bands.
    #[must_use]
    pub fn evaluate(&self, last_price: Price, bands: &BollValue, position: Position) -> Decision {
        let open = if last_price > bands.top() {
            Some(Side::Long)
        } else if last_price < bands.bottom() {
            Some(Side::Short)
        } else {
            None
        };

        let close = if position.long > 0 {
            (last_price < bands.mid()).then_some(Side::Long)
        } else if position.short > 0 {
            (last_price > bands.mid()).then_some(Side::Short)
        } else {
            None
        };

        let decision = Decision { open, close };
        if !decision.is_hold() {
            tracing::debug!(
                rule = %self,
                last_price,
                bands = %bands,
                open = ?decision.open,
                close = ?decision.close,
                "breakout signal"
            );
        }

        decision
    }

    /// Recomputes the bands over `bars` and applies the rule to the newest
    /// complete bands. Holds while the window is still filling.
    #[must_use]
    pub fn evaluate_bars(
        &self,
        bars: &[impl Ohlcv],
        last_price: Price,
        position: Position,
    ) -> Decision {
        match self.boll.compute(bars).latest() {
            Some(bands) => self.evaluate(last_price, &bands, position),
            None => {
                tracing::debug!(rule = %self, bars = bars.len(), "bands not ready, holding");
                Decision::default()
            }
        }
    }
}

impl Display for BollBreakout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BollBreakout({})", self.boll)
    }
}
