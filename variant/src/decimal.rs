// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

use crate::VariantError;

/// Maximum value of the scale byte for all three decimal widths.
pub const MAX_DECIMAL_SCALE: u8 = 38;

fn validate_scale(scale: u8, width: &str) -> Result<(), VariantError> {
    if scale > MAX_DECIMAL_SCALE {
        return Err(VariantError::MalformedEncoding(format!(
            "scale {scale} of a {width} decimal exceeds the maximum {MAX_DECIMAL_SCALE}"
        )));
    }
    Ok(())
}

/// Writes `unscaled * 10^-scale` as an exact decimal literal, preserving the
/// scale's digit count (`1230, 3` prints as `1.230`).
fn format_decimal(unscaled: i128, scale: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if scale == 0 {
        return write!(f, "{unscaled}");
    }
    let magnitude = unscaled.unsigned_abs();
    let divisor = 10u128.pow(scale as u32);
    let sign = if unscaled < 0 { "-" } else { "" };
    write!(
        f,
        "{sign}{}.{:0width$}",
        magnitude / divisor,
        magnitude % divisor,
        width = scale as usize
    )
}

/// A 4-byte decimal value: a 32-bit signed unscaled integer and a scale
/// between 0 and [`MAX_DECIMAL_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantDecimal4 {
    integer: i32,
    scale: u8,
}

impl VariantDecimal4 {
    pub fn try_new(integer: i32, scale: u8) -> Result<Self, VariantError> {
        validate_scale(scale, "4-byte")?;
        Ok(Self { integer, scale })
    }

    /// The unscaled integer value.
    pub fn integer(&self) -> i32 {
        self.integer
    }

    /// The number of decimal digits to the right of the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl fmt::Display for VariantDecimal4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_decimal(self.integer as i128, self.scale, f)
    }
}

/// An 8-byte decimal value: a 64-bit signed unscaled integer and a scale
/// between 0 and [`MAX_DECIMAL_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantDecimal8 {
    integer: i64,
    scale: u8,
}

impl VariantDecimal8 {
    pub fn try_new(integer: i64, scale: u8) -> Result<Self, VariantError> {
        validate_scale(scale, "8-byte")?;
        Ok(Self { integer, scale })
    }

    /// The unscaled integer value.
    pub fn integer(&self) -> i64 {
        self.integer
    }

    /// The number of decimal digits to the right of the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl fmt::Display for VariantDecimal8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_decimal(self.integer as i128, self.scale, f)
    }
}

/// A 16-byte decimal value: a 128-bit signed unscaled integer and a scale
/// between 0 and [`MAX_DECIMAL_SCALE`].
///
/// The wire format allows the full 128-bit two's-complement range, which is
/// wider than the 96-bit magnitude many decimal types can hold. A value whose
/// unscaled magnitude fits in 96 bits can be observed through
/// [`Self::compact`]; wider values are *extended* and only reachable through
/// [`Self::integer`] and the exact [`fmt::Display`] form.
///
/// # Example
/// ```
/// # use variant::VariantDecimal16;
/// let compact = VariantDecimal16::try_new(1234, 2)?;
/// assert_eq!(compact.compact()?, (1234, 2));
///
/// // 2^96 needs 97 bits of magnitude
/// let extended = VariantDecimal16::try_new(1i128 << 96, 0)?;
/// assert!(extended.is_extended());
/// assert!(extended.compact().is_err());
/// assert_eq!(extended.try_compact(), None);
/// assert_eq!(extended.to_string(), "79228162514264337593543950336");
/// # Ok::<(), variant::VariantError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantDecimal16 {
    integer: i128,
    scale: u8,
}

impl VariantDecimal16 {
    /// Largest unscaled magnitude that still fits in 96 bits.
    const MAX_COMPACT_MAGNITUDE: u128 = (1u128 << 96) - 1;

    pub fn try_new(integer: i128, scale: u8) -> Result<Self, VariantError> {
        validate_scale(scale, "16-byte")?;
        Ok(Self { integer, scale })
    }

    /// The unscaled integer value, whatever its magnitude.
    pub fn integer(&self) -> i128 {
        self.integer
    }

    /// The number of decimal digits to the right of the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// True when the unscaled magnitude needs more than 96 bits.
    pub fn is_extended(&self) -> bool {
        self.integer.unsigned_abs() > Self::MAX_COMPACT_MAGNITUDE
    }

    /// The 96-bit view of this decimal, failing with
    /// [`VariantError::DecimalOverflow`] when the magnitude does not fit.
    pub fn compact(&self) -> Result<(i128, u8), VariantError> {
        if self.is_extended() {
            return Err(VariantError::DecimalOverflow(format!(
                "unscaled value {} does not fit in 96 bits",
                self.integer
            )));
        }
        Ok((self.integer, self.scale))
    }

    /// The 96-bit view of this decimal, or `None` when the magnitude does not
    /// fit.
    pub fn try_compact(&self) -> Option<(i128, u8)> {
        (!self.is_extended()).then_some((self.integer, self.scale))
    }
}

impl fmt::Display for VariantDecimal16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_decimal(self.integer, self.scale, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_validation() {
        assert!(VariantDecimal4::try_new(123, 38).is_ok());
        assert!(VariantDecimal4::try_new(123, 39).is_err());
        assert!(VariantDecimal8::try_new(123, 39).is_err());
        assert!(VariantDecimal16::try_new(123, 39).is_err());

        // zero keeps a nonzero scale at every width
        assert_eq!(VariantDecimal4::try_new(0, 5).unwrap().scale(), 5);
        assert_eq!(VariantDecimal16::try_new(0, 38).unwrap().scale(), 38);
    }

    #[test]
    fn test_display() {
        let cases: Vec<(i128, u8, &str)> = vec![
            (1234, 0, "1234"),
            (-12345, 3, "-12.345"),
            (123456789, 6, "123.456789"),
            (-5, 1, "-0.5"),
            (1230, 3, "1.230"),
            (0, 2, "0.00"),
            (1, 9, "0.000000001"),
        ];
        for (integer, scale, expected) in cases {
            let decimal = VariantDecimal16::try_new(integer, scale).unwrap();
            assert_eq!(decimal.to_string(), expected);
        }

        let decimal4 = VariantDecimal4::try_new(-12345, 3).unwrap();
        assert_eq!(decimal4.to_string(), "-12.345");
        let decimal8 = VariantDecimal8::try_new(123456789, 6).unwrap();
        assert_eq!(decimal8.to_string(), "123.456789");
    }

    #[test]
    fn test_display_extended_magnitude() {
        let value = VariantDecimal16::try_new(1i128 << 96, 0).unwrap();
        assert_eq!(value.to_string(), "79228162514264337593543950336");

        let negative = VariantDecimal16::try_new(-(1i128 << 96), 0).unwrap();
        assert_eq!(negative.to_string(), "-79228162514264337593543950336");
    }

    #[test]
    fn test_compact_boundaries() {
        let max_compact = (1i128 << 96) - 1;

        let fits = VariantDecimal16::try_new(max_compact, 0).unwrap();
        assert!(!fits.is_extended());
        assert_eq!(fits.compact().unwrap(), (max_compact, 0));
        assert_eq!(fits.try_compact(), Some((max_compact, 0)));

        let negative_fits = VariantDecimal16::try_new(-max_compact, 0).unwrap();
        assert!(!negative_fits.is_extended());

        let too_wide = VariantDecimal16::try_new(1i128 << 96, 0).unwrap();
        assert!(too_wide.is_extended());
        assert!(matches!(
            too_wide.compact(),
            Err(VariantError::DecimalOverflow(_))
        ));
        assert_eq!(too_wide.try_compact(), None);

        let negative_too_wide = VariantDecimal16::try_new(-(1i128 << 96), 0).unwrap();
        assert!(negative_too_wide.is_extended());
    }
}
