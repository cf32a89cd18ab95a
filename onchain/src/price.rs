use ethers::types::U256;

/// Adjusts a raw pool reserve by the token's decimals: `reserve · 10^(−decimals)`.
pub fn adjust_reserve(reserve: U256, decimals: u8) -> f64 {
    let raw = reserve.as_u128() as f64;
    raw / 10f64.powi(decimals as i32)
}

/// Spot price of the target token in quote-asset terms, given both
/// reserves already adjusted for decimals: `quote_reserve / target_reserve`.
pub fn spot_price(target_reserve: f64, quote_reserve: f64) -> Option<f64> {
    if target_reserve <= 0.0 || !target_reserve.is_finite() || !quote_reserve.is_finite() {
        return None;
    }
    Some(quote_reserve / target_reserve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusts_reserve_by_decimals() {
        assert_eq!(adjust_reserve(U256::from(1_000_000_000_000_000_000u128), 18), 1.0);
        assert_eq!(adjust_reserve(U256::from(3_000_000_000u128), 6), 3000.0);
    }

    #[test]
    fn spot_price_is_quote_over_target() {
        // reserve0=1e24 (target, 18 decimals) -> 1_000_000 target units
        // reserve1=3e9 (USDT, 6 decimals) -> 3000 USDT
        let target_reserve = adjust_reserve(U256::from(10u128).pow(U256::from(24)), 18);
        let quote_reserve = adjust_reserve(U256::from(3_000_000_000u128), 6);
        let price = spot_price(target_reserve, quote_reserve).unwrap();
        assert!((price - 0.003).abs() < 1e-9);
    }

    #[test]
    fn zero_target_reserve_yields_no_price() {
        assert!(spot_price(0.0, 100.0).is_none());
    }
}
