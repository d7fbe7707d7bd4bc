//! 16.16 signed fixed-point scalar used by the edge builder and scan driver.
//!
//! Port of the fixed-point arithmetic underlying `agg_rasterizer_cells_aa.h`'s
//! 24.8 coordinates, widened to 16.16 to give the edge table more fractional
//! precision for the `dy_top`/`dy_bottom` sub-pixel corrections (see
//! `crate::edge_builder`).

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use crate::basics::iround;

/// Number of fractional bits.
pub const FX_SHIFT: i32 = 16;

/// Signed 32-bit fixed-point number, 16 integer bits + 16 fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FX(pub i32);

/// One half in `FX`.
pub const FX_HALF: FX = FX(1 << (FX_SHIFT - 1));

/// A small epsilon used to reject near-horizontal/near-vertical slopes in
/// the high-precision path and the convex rectangle fast path. Chosen well
/// below one sub-fixed unit's worth of slope so it never widens a genuinely
/// sloped edge into a "rectangle".
pub const FX_NEAR0: FX = FX(1);

impl FX {
    pub const ZERO: FX = FX(0);
    pub const ONE: FX = FX(1 << FX_SHIFT);

    /// Convert a floating-point value to `FX`, rounding to the nearest
    /// fractional unit.
    #[inline]
    pub fn from_f64(v: f64) -> FX {
        FX(iround(v * (1i64 << FX_SHIFT) as f64))
    }

    /// Convert an integer scanline coordinate to `FX`.
    #[inline]
    pub fn from_i32(v: i32) -> FX {
        FX(v << FX_SHIFT)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1i64 << FX_SHIFT) as f64
    }

    /// Truncate toward negative infinity to the containing integer.
    #[inline]
    pub fn floor(self) -> i32 {
        self.0 >> FX_SHIFT
    }

    /// Round to the nearest integer, ties away from zero.
    #[inline]
    pub fn round(self) -> i32 {
        if self.0 >= 0 {
            (self.0 + (1 << (FX_SHIFT - 1))) >> FX_SHIFT
        } else {
            -((-self.0 + (1 << (FX_SHIFT - 1))) >> FX_SHIFT)
        }
    }

    #[inline]
    pub fn abs(self) -> FX {
        FX(self.0.abs())
    }

    /// `self * other`, with the product computed at 64-bit width to avoid
    /// overflow before the shift back down.
    #[inline]
    pub fn mul(self, other: FX) -> FX {
        FX(((self.0 as i64 * other.0 as i64) >> FX_SHIFT) as i32)
    }

    /// `self / other`. Panics on division by zero, matching the contract
    /// that callers (the edge builder) never divide by a zero `dy`.
    #[inline]
    pub fn div(self, other: FX) -> FX {
        FX((((self.0 as i64) << FX_SHIFT) / other.0 as i64) as i32)
    }

    /// `|self| <= epsilon`, used to detect near-horizontal slopes.
    #[inline]
    pub fn near_zero(self, epsilon: FX) -> bool {
        self.abs().0 <= epsilon.0
    }
}

impl Add for FX {
    type Output = FX;
    #[inline]
    fn add(self, rhs: FX) -> FX {
        FX(self.0 + rhs.0)
    }
}

impl AddAssign for FX {
    #[inline]
    fn add_assign(&mut self, rhs: FX) {
        self.0 += rhs.0;
    }
}

impl Sub for FX {
    type Output = FX;
    #[inline]
    fn sub(self, rhs: FX) -> FX {
        FX(self.0 - rhs.0)
    }
}

impl Neg for FX {
    type Output = FX;
    #[inline]
    fn neg(self) -> FX {
        FX(-self.0)
    }
}

impl Mul for FX {
    type Output = FX;
    #[inline]
    fn mul(self, rhs: FX) -> FX {
        FX::mul(self, rhs)
    }
}

impl Div for FX {
    type Output = FX;
    #[inline]
    fn div(self, rhs: FX) -> FX {
        FX::div(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_round_trips() {
        let v = FX::from_f64(3.5);
        assert!((v.to_f64() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn floor_and_round() {
        assert_eq!(FX::from_f64(3.7).floor(), 3);
        assert_eq!(FX::from_f64(-3.7).floor(), -4);
        assert_eq!(FX::from_f64(3.5).round(), 4);
        assert_eq!(FX::from_f64(-3.5).round(), -4);
    }

    #[test]
    fn mul_and_div() {
        let a = FX::from_f64(2.0);
        let b = FX::from_f64(3.0);
        assert!(((a * b).to_f64() - 6.0).abs() < 1e-9);
        let c = FX::from_f64(10.0);
        let d = FX::from_f64(4.0);
        assert!(((c / d).to_f64() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn near_zero() {
        assert!(FX::from_f64(0.0).near_zero(FX_NEAR0));
        assert!(!FX::from_f64(1.0).near_zero(FX_NEAR0));
    }

    #[test]
    fn half_constant() {
        assert!((FX_HALF.to_f64() - 0.5).abs() < 1e-9);
    }
}
