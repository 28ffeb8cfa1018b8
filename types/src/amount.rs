//! Token amount helpers.
//!
//! Balances are 256-bit unsigned integers (`U256`). All fee and bucketing math is
//! integer-only so every replica derives the same values from the same inputs.

use alloy_primitives::U256;

/// Raw units per whole token (18 decimals).
pub const TOKEN_UNIT: u64 = 1_000_000_000_000_000_000;

/// Largest value representable in 96 bits, the width vouchers are signed at.
pub const U96_MAX: U256 = U256::from_limbs([u64::MAX, u32::MAX as u64, 0, 0]);

/// `amount` whole tokens expressed in raw units.
pub fn tokens(amount: u64) -> U256 {
    U256::from(amount) * U256::from(TOKEN_UNIT)
}

/// Integer division rounding up: `r = a / b; if a % b > 0 { r += 1 }`.
///
/// # Panics
/// Panics if `b` is zero. Callers pass validated divisors only.
pub fn ceil_div(a: U256, b: U256) -> U256 {
    let r = a / b;
    if (a % b).is_zero() {
        r
    } else {
        r + U256::from(1u8)
    }
}

/// Decimal order of magnitude, `floor(log10(value))`. Zero maps to 0.
pub fn order_of_magnitude(value: U256) -> u32 {
    let ten = U256::from(10u8);
    let mut rest = value;
    let mut magnitude = 0u32;
    while rest >= ten {
        rest /= ten;
        magnitude += 1;
    }
    magnitude
}

/// Whether `value` survives a narrowing cast to 96 bits unchanged.
pub fn fits_u96(value: U256) -> bool {
    value <= U96_MAX
}

/// The low 96 bits of `value`, big-endian (what a `uint96` cast keeps).
pub fn truncate_u96(value: U256) -> [u8; 12] {
    let bytes = value.to_be_bytes::<32>();
    let mut out = [0u8; 12];
    out.copy_from_slice(&bytes[20..]);
    out
}
