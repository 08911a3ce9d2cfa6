//! Medicare IRMAA surcharge tiers

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::money::Money;
use crate::registry::IrmaaTier;

/// Annual IRMAA surcharge for a MAGI: twelve times the monthly surcharge
/// of the tier whose `[min_magi, max_magi)` band contains it, zero below
/// every tier.
pub fn irmaa_surcharge(magi: Money, tiers: &[IrmaaTier]) -> Money {
    for tier in tiers {
        let in_band = magi >= tier.min_magi
            && tier.max_magi.map_or(true, |max| magi < max);
        if in_band {
            return tier.monthly_surcharge * dec!(12);
        }
    }
    Decimal::ZERO
}
