//! Dual-pot, dual-risk TSP drawdown
//!
//! Balances live in four buckets: Traditional and Roth, each split into
//! a high-risk and a low-risk pot. Within each side, withdrawals come
//! from the low-risk pot before the high-risk pot, so the low-risk pots
//! act as the drawdown buffer. Balances are kept at cent precision and
//! clamp at zero after every mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{round_cents, Money, Rate};
use crate::registry::{Bracket, RmdTable};

/// How a year's withdrawal is split between Traditional and Roth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalStrategy {
    /// Split by the current Traditional/Roth balance ratio.
    Proportional,
    /// Traditional until exhausted, then Roth.
    TraditionalFirst,
    /// Roth until exhausted, then Traditional.
    RothFirst,
    /// Traditional up to the remaining federal bracket headroom, the
    /// rest from Roth.
    TaxBracketFill,
    /// Fixed percentage split.
    Custom {
        traditional_pct: Rate,
        roth_pct: Rate,
    },
}

/// The four TSP sub-pot balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TspBalances {
    pub trad_high: Money,
    pub trad_low: Money,
    pub roth_high: Money,
    pub roth_low: Money,
}

impl TspBalances {
    /// Initial balances at retirement from the total and the two split
    /// fractions. The last bucket absorbs the rounding remainder so the
    /// buckets sum exactly to the (cent-rounded) total.
    pub fn from_split(total: Money, traditional_frac: Rate, high_risk_frac: Rate) -> Self {
        let total = round_cents(total.max(Decimal::ZERO));
        let trad_high = round_cents(total * traditional_frac * high_risk_frac);
        let trad_low = round_cents(total * traditional_frac * (Decimal::ONE - high_risk_frac));
        let roth_high =
            round_cents(total * (Decimal::ONE - traditional_frac) * high_risk_frac);
        let roth_low = total - trad_high - trad_low - roth_high;
        Self {
            trad_high,
            trad_low,
            roth_high,
            roth_low,
        }
    }

    pub fn traditional(&self) -> Money {
        self.trad_high + self.trad_low
    }

    pub fn roth(&self) -> Money {
        self.roth_high + self.roth_low
    }

    pub fn total(&self) -> Money {
        self.traditional() + self.roth()
    }

    /// Depletion is a non-positive total balance.
    pub fn is_depleted(&self) -> bool {
        self.total() <= Decimal::ZERO
    }

    /// Take up to `amount` from the Traditional side, low-risk pot
    /// first. Returns the amount actually withdrawn.
    fn withdraw_traditional(&mut self, amount: Money) -> Money {
        let (taken_low, taken_high) =
            take_low_then_high(&mut self.trad_low, &mut self.trad_high, amount);
        taken_low + taken_high
    }

    /// Take up to `amount` from the Roth side, low-risk pot first.
    fn withdraw_roth(&mut self, amount: Money) -> Money {
        let (taken_low, taken_high) =
            take_low_then_high(&mut self.roth_low, &mut self.roth_high, amount);
        taken_low + taken_high
    }

    /// Grow each pot at its risk tier's return and clamp at zero.
    pub fn apply_growth(&mut self, high_roi: Rate, low_roi: Rate) {
        let high = (Decimal::ONE + high_roi).max(Decimal::ZERO);
        let low = (Decimal::ONE + low_roi).max(Decimal::ZERO);
        self.trad_high = round_cents(self.trad_high * high).max(Decimal::ZERO);
        self.roth_high = round_cents(self.roth_high * high).max(Decimal::ZERO);
        self.trad_low = round_cents(self.trad_low * low).max(Decimal::ZERO);
        self.roth_low = round_cents(self.roth_low * low).max(Decimal::ZERO);
    }
}

fn take_low_then_high(low: &mut Money, high: &mut Money, amount: Money) -> (Money, Money) {
    let want = amount.max(Decimal::ZERO);
    let from_low = want.min(*low);
    *low = (*low - from_low).max(Decimal::ZERO);
    let from_high = (want - from_low).min(*high);
    *high = (*high - from_high).max(Decimal::ZERO);
    (from_low, from_high)
}

/// RMD start age under SECURE 2.0: 73 for birth years before 1960, 75
/// from 1960 on.
pub fn rmd_start_age(birth_year: u32) -> u32 {
    if birth_year < 1960 {
        73
    } else {
        75
    }
}

/// RMD floor for the year: Traditional balance over the Uniform
/// Lifetime divisor once the start age is reached, zero before.
pub fn rmd_floor(age: u32, birth_year: u32, traditional_balance: Money, table: &RmdTable) -> Money {
    if age < rmd_start_age(birth_year) || traditional_balance <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_cents(traditional_balance / table.divisor(age))
}

/// Inputs for one withdrawal year.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalRequest<'a> {
    pub strategy: WithdrawalStrategy,
    /// COLA-escalated planned withdrawal for the year.
    pub planned: Money,
    /// RMD floor already computed from the start-of-year balance.
    pub rmd_floor: Money,
    /// Taxable income before any TSP withdrawal, for bracket fill.
    pub other_taxable_income: Money,
    /// Bracket schedule the fill strategy measures headroom against.
    pub brackets: &'a [Bracket],
}

/// What a withdrawal year produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalOutcome {
    pub traditional: Money,
    pub roth: Money,
    pub rmd_required: Money,
    pub rmd_satisfied: bool,
}

impl WithdrawalOutcome {
    pub fn total(&self) -> Money {
        self.traditional + self.roth
    }
}

/// Remaining room to the top of the bracket the income sits in, where
/// an income exactly on a boundary has zero room. `None` in the top
/// (unbounded) bracket.
fn fill_headroom(income: Money, brackets: &[Bracket]) -> Option<Money> {
    let income = income.max(Decimal::ZERO);
    for bracket in brackets {
        match bracket.max_income {
            Some(max) if income <= max => return Some(max - income),
            None => return None,
            _ => {}
        }
    }
    None
}

/// Execute one year's withdrawal against the balances.
///
/// Sequence: strategy split of the planned amount, RMD override raising
/// the Traditional side (Roth clamped at zero), per-side balance caps,
/// then the low-before-high bucket draw. Growth is applied separately
/// via [`TspBalances::apply_growth`].
pub fn execute_withdrawal_year(
    balances: &mut TspBalances,
    request: &WithdrawalRequest<'_>,
) -> WithdrawalOutcome {
    let start_traditional = balances.traditional();
    let start_roth = balances.roth();
    let planned = request.planned.max(Decimal::ZERO);

    let (mut traditional, mut roth) = match request.strategy {
        WithdrawalStrategy::Proportional => {
            let total = start_traditional + start_roth;
            if total <= Decimal::ZERO {
                (Decimal::ZERO, Decimal::ZERO)
            } else {
                let trad = round_cents(planned * start_traditional / total);
                (trad, planned - trad)
            }
        }
        WithdrawalStrategy::TraditionalFirst => {
            let trad = planned.min(start_traditional);
            (trad, planned - trad)
        }
        WithdrawalStrategy::RothFirst => {
            let roth = planned.min(start_roth);
            (planned - roth, roth)
        }
        WithdrawalStrategy::TaxBracketFill => {
            let trad = match fill_headroom(request.other_taxable_income, request.brackets) {
                Some(headroom) => planned.min(headroom),
                None => planned,
            };
            (trad, planned - trad)
        }
        WithdrawalStrategy::Custom {
            traditional_pct,
            roth_pct,
        } => (
            round_cents(planned * traditional_pct),
            round_cents(planned * roth_pct),
        ),
    };

    // The Traditional side must cover the RMD; the excess comes out of
    // the Roth request.
    if traditional < request.rmd_floor {
        let bump = request.rmd_floor - traditional;
        traditional = request.rmd_floor;
        roth = (roth - bump).max(Decimal::ZERO);
    }

    let traditional = round_cents(traditional.min(start_traditional).max(Decimal::ZERO));
    let roth = round_cents(roth.min(start_roth).max(Decimal::ZERO));

    // A depleted Traditional side satisfies whatever remains of the RMD.
    let rmd_satisfied = traditional >= request.rmd_floor.min(start_traditional);

    let taken_traditional = balances.withdraw_traditional(traditional);
    let taken_roth = balances.withdraw_roth(roth);

    WithdrawalOutcome {
        traditional: taken_traditional,
        roth: taken_roth,
        rmd_required: request.rmd_floor,
        rmd_satisfied,
    }
}
