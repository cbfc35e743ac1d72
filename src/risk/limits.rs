//! Drawdown tracking

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tracks peak equity and the worst drawdown seen so far
#[derive(Debug, Clone)]
pub struct DrawdownMonitor {
    /// Peak equity value
    pub peak_equity: Decimal,
    /// Current equity value
    pub current_equity: Decimal,
    /// Largest peak-to-trough decline in quote currency
    pub max_drawdown: Decimal,
    /// Largest peak-to-trough decline as a percentage of the peak
    pub max_drawdown_pct: Decimal,
}

impl DrawdownMonitor {
    /// Create a new drawdown monitor
    pub fn new(initial_equity: Decimal) -> Self {
        Self {
            peak_equity: initial_equity,
            current_equity: initial_equity,
            max_drawdown: dec!(0),
            max_drawdown_pct: dec!(0),
        }
    }

    /// Update with new equity value
    pub fn update(&mut self, new_equity: Decimal) {
        self.current_equity = new_equity;
        if new_equity > self.peak_equity {
            self.peak_equity = new_equity;
        }

        let drawdown = self.current_drawdown();
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        let drawdown_pct = self.current_drawdown_pct();
        if drawdown_pct > self.max_drawdown_pct {
            self.max_drawdown_pct = drawdown_pct;
        }
    }

    /// Current decline from peak in quote currency
    pub fn current_drawdown(&self) -> Decimal {
        self.peak_equity - self.current_equity
    }

    /// Current decline from peak as a percentage of the peak
    pub fn current_drawdown_pct(&self) -> Decimal {
        if self.peak_equity <= dec!(0) {
            return dec!(0);
        }
        (self.peak_equity - self.current_equity) / self.peak_equity * dec!(100)
    }
}
