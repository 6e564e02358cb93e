use std::fmt;

use num_bigint::BigUint;

const WORD_BITS: u64 = 64;

/// The widest value the growing operations (`shl`, `mul` and `pow`) will produce.
pub const MAX_BITS: u64 = 1 << 16;

/// An arbitrary-precision natural number.
///
/// Operations that would go below zero wrap within the operand's width, which is
/// its bit length rounded up to whole 64-bit words (never less than one word).
/// This keeps `~x`, `-x` and `a - b` consistent with what the emitted machine code
/// computes for values that fit in a register.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nat(BigUint);

impl Nat {
    pub fn zero() -> Self {
        Self(BigUint::default())
    }

    /// Parse an integer literal: decimal, `0x` hex, `0o` octal or `0b` binary,
    /// with `_` allowed as a digit separator.
    pub fn parse(text: &str) -> Option<Self> {
        let (digits, radix) = match text.get(..2) {
            Some("0x" | "0X") => (&text[2..], 16),
            Some("0o" | "0O") => (&text[2..], 8),
            Some("0b" | "0B") => (&text[2..], 2),
            _ => (text, 10),
        };

        let digits: String = digits.chars().filter(|&c| c != '_').collect();
        if digits.is_empty() {
            return None;
        }

        BigUint::parse_bytes(digits.as_bytes(), radix).map(Self)
    }

    /// The least significant machine word.
    pub fn low_word(&self) -> u64 {
        self.0.iter_u64_digits().next().unwrap_or(0)
    }

    /// The value as a single word, if it fits in one.
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.0).ok()
    }

    pub fn is_zero(&self) -> bool {
        self.0.bits() == 0
    }

    pub fn to_string_radix(&self, radix: u32) -> String {
        match radix {
            16 => format!("0x{}", self.0.to_str_radix(16)),
            _ => self.0.to_str_radix(radix),
        }
    }

    pub fn from_bool(b: bool) -> Self {
        Self::from(u64::from(b))
    }

    fn width(&self) -> u64 {
        self.0.bits().div_ceil(WORD_BITS).max(1) * WORD_BITS
    }

    fn mask(width: u64) -> BigUint {
        (BigUint::from(1u8) << width) - 1u8
    }

    /// Amounts past a word saturate rather than wrap to the low word.
    fn shift_amount(&self) -> u64 {
        self.to_u64().unwrap_or(u64::MAX)
    }

    pub fn and(&self, rhs: &Self) -> Self {
        Self(&self.0 & &rhs.0)
    }

    pub fn or(&self, rhs: &Self) -> Self {
        Self(&self.0 | &rhs.0)
    }

    pub fn xor(&self, rhs: &Self) -> Self {
        Self(&self.0 ^ &rhs.0)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self(&self.0 + &rhs.0)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        if self.0 >= rhs.0 {
            return Self(&self.0 - &rhs.0);
        }

        let width = self.width().max(rhs.width());
        Self((BigUint::from(1u8) << width) + &self.0 - &rhs.0)
    }

    /// `None` if the product could exceed [`MAX_BITS`].
    pub fn mul(&self, rhs: &Self) -> Option<Self> {
        if self.0.bits() + rhs.0.bits() > MAX_BITS {
            return None;
        }
        Some(Self(&self.0 * &rhs.0))
    }

    /// Division by zero gives all ones at the dividend's width.
    pub fn div(&self, rhs: &Self) -> Self {
        if rhs.is_zero() {
            return Self(Self::mask(self.width()));
        }
        Self(&self.0 / &rhs.0)
    }

    /// Remainder by zero gives the dividend.
    pub fn rem(&self, rhs: &Self) -> Self {
        if rhs.is_zero() {
            return self.clone();
        }
        Self(&self.0 % &rhs.0)
    }

    /// `None` if the power could exceed [`MAX_BITS`].
    pub fn pow(&self, exp: &Self) -> Option<Self> {
        // 0 and 1 are fixed points, whatever the exponent
        if self.0.bits() <= 1 {
            return Some(if exp.is_zero() { Self::from(1) } else { self.clone() });
        }

        let exp = u32::try_from(exp.low_word())
            .ok()
            .filter(|&exp| self.0.bits().saturating_mul(u64::from(exp)) <= MAX_BITS)?;
        Some(Self(self.0.pow(exp)))
    }

    /// `None` if the result would exceed [`MAX_BITS`].
    pub fn shl(&self, amount: &Self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        let amount = amount.shift_amount();
        if self.0.bits().saturating_add(amount) > MAX_BITS {
            return None;
        }
        Some(Self(&self.0 << amount))
    }

    pub fn shr(&self, amount: &Self) -> Self {
        let amount = amount.shift_amount();
        if amount >= self.0.bits() {
            return Self::zero();
        }
        Self(&self.0 >> amount)
    }

    pub fn not(&self) -> Self {
        Self(&self.0 ^ Self::mask(self.width()))
    }

    pub fn neg(&self) -> Self {
        Self::zero().sub(self)
    }
}

impl From<u64> for Nat {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Nat, MAX_BITS};

    fn nat(text: &str) -> Nat {
        Nat::parse(text).unwrap()
    }

    #[test]
    fn parse_radixes() {
        assert_eq!(nat("42"), Nat::from(42));
        assert_eq!(nat("0x2a"), Nat::from(42));
        assert_eq!(nat("0b10_1010"), Nat::from(42));
        assert_eq!(nat("0o52"), Nat::from(42));
        assert_eq!(nat("1_000_000"), Nat::from(1_000_000));

        assert_eq!(Nat::parse("0x"), None);
        assert_eq!(Nat::parse("12a"), None);
    }

    #[test]
    fn low_word_of_wide_value() {
        let wide = nat("0x1_0000_0000_0000_0005");
        assert_eq!(wide.low_word(), 5);
        assert_eq!(Nat::zero().low_word(), 0);
    }

    #[test]
    fn render_decimal_and_hex() {
        let n = Nat::from(255);
        assert_eq!(n.to_string(), "255");
        assert_eq!(n.to_string_radix(16), "0xff");
        assert_eq!(Nat::zero().to_string_radix(16), "0x0");
    }

    #[test]
    fn wrapping_within_word_width() {
        assert_eq!(Nat::from(5).not(), Nat::from(0xffff_ffff_ffff_fffa));
        assert_eq!(Nat::from(2).sub(&Nat::from(3)), Nat::from(u64::MAX));
        assert_eq!(Nat::from(1).neg(), Nat::from(u64::MAX));
        assert_eq!(Nat::zero().neg(), Nat::zero());

        // Two words wide, so the wrap happens at 2^128.
        let wide = nat("0x1_0000_0000_0000_0000");
        assert_eq!(wide.not(), nat("0xffff_ffff_ffff_fffe_ffff_ffff_ffff_ffff"));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(Nat::from(7).div(&Nat::zero()), Nat::from(u64::MAX));
        assert_eq!(Nat::from(7).rem(&Nat::zero()), Nat::from(7));
        assert_eq!(Nat::from(7).div(&Nat::from(2)), Nat::from(3));
        assert_eq!(Nat::from(7).rem(&Nat::from(2)), Nat::from(1));
    }

    #[test]
    fn shifts_and_pow() {
        assert_eq!(Nat::from(1).shl(&Nat::from(3)), Some(Nat::from(8)));
        assert_eq!(Nat::from(8).shr(&Nat::from(2)), Nat::from(2));
        assert_eq!(
            Nat::from(1).shl(&Nat::from(64)),
            Some(nat("0x1_0000_0000_0000_0000"))
        );
        assert_eq!(Nat::from(2).pow(&Nat::from(10)), Some(Nat::from(1024)));
        assert_eq!(Nat::from(7).pow(&Nat::zero()), Some(Nat::from(1)));
        assert_eq!(Nat::zero().pow(&Nat::zero()), Some(Nat::from(1)));
        assert_eq!(Nat::from(1).pow(&Nat::from(u64::MAX)), Some(Nat::from(1)));
    }

    #[test]
    fn growth_is_bounded() {
        assert_eq!(Nat::from(1).shl(&Nat::from(u64::MAX)), None);
        assert_eq!(Nat::zero().shl(&Nat::from(u64::MAX)), Some(Nat::zero()));
        assert_eq!(Nat::from(1).shr(&Nat::from(u64::MAX)), Nat::zero());
        assert_eq!(nat("0x2_0000_0000_0000_0000").shr(&nat("0x1_0000_0000_0000_0001")), Nat::zero());
        assert_eq!(Nat::from(1).shl(&nat("0x1_0000_0000_0000_0000")), None);
        assert_eq!(Nat::from(2).pow(&Nat::from(u64::MAX)), None);
        assert_eq!(Nat::from(3).pow(&Nat::from(1 << 20)), None);

        // the largest value is still reachable
        let widest = Nat::from(1).shl(&Nat::from(MAX_BITS - 1)).unwrap();
        assert_eq!(widest.0.bits(), MAX_BITS);
        assert_eq!(widest.mul(&Nat::zero()), Some(Nat::zero()));
        assert_eq!(widest.mul(&widest), None);
    }
}
