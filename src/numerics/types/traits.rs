// src/numerics/types/traits.rs
// FloatingPoint marker trait shared by the numerics types.

/// FloatingPoint is a minimal trait for floating point types
/// that we use in the numerics types.
///
/// Note: We require Copy, PartialOrd and the basic arithmetic ops on Self.
pub trait FloatingPoint:
Copy + PartialOrd
+ core::ops::Add<Output = Self>
+ core::ops::Sub<Output = Self>
+ core::ops::Mul<Output = Self>
+ core::ops::Div<Output = Self>
+ core::ops::Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;

    /// Larger of two values; NaN loses against any number.
    fn max_of(self, other: Self) -> Self {
        match self.partial_cmp(&other) {
            Some(core::cmp::Ordering::Less) => other,
            Some(_) => self,
            None if self.partial_cmp(&self).is_none() => other,
            None => self,
        }
    }

    /// Smaller of two values; NaN loses against any number.
    fn min_of(self, other: Self) -> Self {
        match self.partial_cmp(&other) {
            Some(core::cmp::Ordering::Greater) => other,
            Some(_) => self,
            None if self.partial_cmp(&self).is_none() => other,
            None => self,
        }
    }
}

impl FloatingPoint for f32 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn sqrt(self) -> Self { f32::sqrt(self) }
    fn abs(self) -> Self { f32::abs(self) }
}

impl FloatingPoint for f64 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn sqrt(self) -> Self { f64::sqrt(self) }
    fn abs(self) -> Self { f64::abs(self) }
}
