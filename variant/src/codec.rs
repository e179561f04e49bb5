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

//! Byte-level codec for the five header families and the per-primitive
//! payload layouts.
//!
//! Every value starts with one header byte: the basic type in bits 0-1 and a
//! six-bit value header in bits 2-7. The metadata blob has its own header
//! byte with the version in bits 0-3. All multi-byte integers, IEEE-754 bit
//! patterns and decimal unscaled values are little-endian; the UUID payload
//! is the sole big-endian field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::utils::{array_from_slice, overflow_error, slice_from_slice, string_from_slice};
use crate::VariantError;

pub(crate) const BASIC_TYPE_BITS: u8 = 2;

/// Maximum byte length of a short string value (six length bits).
pub(crate) const MAX_SHORT_STRING_BYTES: usize = 0x3F;

const METADATA_VERSION: u8 = 1;
const METADATA_RESERVED_BIT: u8 = 0x10;
const METADATA_SORTED_BIT: u8 = 0x20;

/// The basic type of a variant value, encoded in the first two bits of the
/// header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantBasicType {
    Primitive = 0,
    ShortString = 1,
    Object = 2,
    Array = 3,
}

/// The concrete kind of a [`VariantBasicType::Primitive`] value, encoded in
/// the six value-header bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantPrimitiveType {
    Null = 0,
    BooleanTrue = 1,
    BooleanFalse = 2,
    Int8 = 3,
    Int16 = 4,
    Int32 = 5,
    Int64 = 6,
    Double = 7,
    Decimal4 = 8,
    Decimal8 = 9,
    Decimal16 = 10,
    Date = 11,
    TimestampMicros = 12,
    TimestampNtzMicros = 13,
    Float = 14,
    Binary = 15,
    String = 16,
    TimeNtz = 17,
    TimestampNanos = 18,
    TimestampNtzNanos = 19,
    Uuid = 20,
}

impl TryFrom<u8> for VariantPrimitiveType {
    type Error = VariantError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VariantPrimitiveType::Null),
            1 => Ok(VariantPrimitiveType::BooleanTrue),
            2 => Ok(VariantPrimitiveType::BooleanFalse),
            3 => Ok(VariantPrimitiveType::Int8),
            4 => Ok(VariantPrimitiveType::Int16),
            5 => Ok(VariantPrimitiveType::Int32),
            6 => Ok(VariantPrimitiveType::Int64),
            7 => Ok(VariantPrimitiveType::Double),
            8 => Ok(VariantPrimitiveType::Decimal4),
            9 => Ok(VariantPrimitiveType::Decimal8),
            10 => Ok(VariantPrimitiveType::Decimal16),
            11 => Ok(VariantPrimitiveType::Date),
            12 => Ok(VariantPrimitiveType::TimestampMicros),
            13 => Ok(VariantPrimitiveType::TimestampNtzMicros),
            14 => Ok(VariantPrimitiveType::Float),
            15 => Ok(VariantPrimitiveType::Binary),
            16 => Ok(VariantPrimitiveType::String),
            17 => Ok(VariantPrimitiveType::TimeNtz),
            18 => Ok(VariantPrimitiveType::TimestampNanos),
            19 => Ok(VariantPrimitiveType::TimestampNtzNanos),
            20 => Ok(VariantPrimitiveType::Uuid),
            id => Err(VariantError::UnsupportedPrimitive(id)),
        }
    }
}

/// Extracts the basic type from a header byte.
pub(crate) fn basic_type(header: u8) -> VariantBasicType {
    match header & 0x03 {
        0 => VariantBasicType::Primitive,
        1 => VariantBasicType::ShortString,
        2 => VariantBasicType::Object,
        3 => VariantBasicType::Array,
        // A two-bit value cannot exceed 3.
        _ => unreachable!(),
    }
}

/// Extracts the primitive type from a header byte.
pub(crate) fn primitive_type(header: u8) -> Result<VariantPrimitiveType, VariantError> {
    VariantPrimitiveType::try_from(header >> BASIC_TYPE_BITS)
}

pub(crate) fn primitive_header(primitive_type: VariantPrimitiveType) -> u8 {
    (primitive_type as u8) << BASIC_TYPE_BITS | VariantBasicType::Primitive as u8
}

pub(crate) fn short_string_header(len: usize) -> u8 {
    (len as u8) << BASIC_TYPE_BITS | VariantBasicType::ShortString as u8
}

pub(crate) fn short_string_len(header: u8) -> usize {
    (header >> BASIC_TYPE_BITS) as usize
}

/// Human-readable name for the type a header byte encodes, for error
/// messages.
pub(crate) fn header_type_name(header: u8) -> &'static str {
    match basic_type(header) {
        VariantBasicType::ShortString => "short string",
        VariantBasicType::Object => "object",
        VariantBasicType::Array => "array",
        VariantBasicType::Primitive => match primitive_type(header) {
            Ok(VariantPrimitiveType::Null) => "null",
            Ok(VariantPrimitiveType::BooleanTrue) => "boolean true",
            Ok(VariantPrimitiveType::BooleanFalse) => "boolean false",
            Ok(VariantPrimitiveType::Int8) => "int8",
            Ok(VariantPrimitiveType::Int16) => "int16",
            Ok(VariantPrimitiveType::Int32) => "int32",
            Ok(VariantPrimitiveType::Int64) => "int64",
            Ok(VariantPrimitiveType::Double) => "double",
            Ok(VariantPrimitiveType::Decimal4) => "decimal4",
            Ok(VariantPrimitiveType::Decimal8) => "decimal8",
            Ok(VariantPrimitiveType::Decimal16) => "decimal16",
            Ok(VariantPrimitiveType::Date) => "date",
            Ok(VariantPrimitiveType::TimestampMicros) => "timestamp",
            Ok(VariantPrimitiveType::TimestampNtzMicros) => "timestamp without timezone",
            Ok(VariantPrimitiveType::Float) => "float",
            Ok(VariantPrimitiveType::Binary) => "binary",
            Ok(VariantPrimitiveType::String) => "string",
            Ok(VariantPrimitiveType::TimeNtz) => "time without timezone",
            Ok(VariantPrimitiveType::TimestampNanos) => "timestamp nanos",
            Ok(VariantPrimitiveType::TimestampNtzNanos) => "timestamp nanos without timezone",
            Ok(VariantPrimitiveType::Uuid) => "uuid",
            Err(_) => "unknown primitive",
        },
    }
}

/// Parsed form of the metadata header byte:
///
/// ```text
///  7      6  5   4  3             0
/// +--------+---+---+---------------+
/// | offset |srt| 0 |    version    |
/// +--------+---+---+---------------+
/// ```
///
/// Bits 0-3 hold the version (always 1), bit 4 is reserved and must be zero,
/// bit 5 is `sorted_strings`, and bits 6-7 hold `offset_size_minus_one`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MetadataHeader {
    pub(crate) version: u8,
    pub(crate) is_sorted: bool,
    pub(crate) offset_size: OffsetSizeBytes,
}

impl MetadataHeader {
    pub(crate) fn try_new(header_byte: u8) -> Result<Self, VariantError> {
        let version = header_byte & 0x0F;
        if version != METADATA_VERSION {
            return Err(VariantError::UnsupportedVersion(version));
        }
        if header_byte & METADATA_RESERVED_BIT != 0 {
            return Err(VariantError::MalformedEncoding(
                "reserved metadata header bit is set".to_string(),
            ));
        }
        Ok(Self {
            version,
            is_sorted: header_byte & METADATA_SORTED_BIT != 0,
            offset_size: OffsetSizeBytes::try_new(header_byte >> 6)?,
        })
    }

    /// The header byte the writer emits for a dictionary of the given shape.
    pub(crate) fn header_byte(is_sorted: bool, offset_size: u8) -> u8 {
        let sorted_bit = if is_sorted { METADATA_SORTED_BIT } else { 0 };
        METADATA_VERSION | sorted_bit | ((offset_size - 1) << 6)
    }
}

/// Parsed form of an object value header. The six value-header bits hold
/// `field_id_size_minus_one` (bits 0-1), `offset_size_minus_one` (bits 2-3),
/// `is_large` (bit 4) and one reserved zero bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ObjectHeader {
    pub(crate) field_id_size: OffsetSizeBytes,
    pub(crate) offset_size: OffsetSizeBytes,
    pub(crate) is_large: bool,
}

impl ObjectHeader {
    pub(crate) fn try_new(header_byte: u8) -> Result<Self, VariantError> {
        let value_header = header_byte >> BASIC_TYPE_BITS;
        if value_header & 0x20 != 0 {
            return Err(VariantError::MalformedEncoding(
                "reserved object header bit is set".to_string(),
            ));
        }
        Ok(Self {
            field_id_size: OffsetSizeBytes::try_new(value_header & 0x03)?,
            offset_size: OffsetSizeBytes::try_new((value_header >> 2) & 0x03)?,
            is_large: value_header & 0x10 != 0,
        })
    }
}

pub(crate) fn object_header(is_large: bool, field_id_size: u8, offset_size: u8) -> u8 {
    let large_bit = if is_large { 1 } else { 0 };
    (large_bit << (BASIC_TYPE_BITS + 4))
        | ((offset_size - 1) << (BASIC_TYPE_BITS + 2))
        | ((field_id_size - 1) << BASIC_TYPE_BITS)
        | VariantBasicType::Object as u8
}

/// Parsed form of an array value header. The six value-header bits hold
/// `offset_size_minus_one` (bits 0-1), `is_large` (bit 2) and three reserved
/// zero bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ArrayHeader {
    pub(crate) offset_size: OffsetSizeBytes,
    pub(crate) is_large: bool,
}

impl ArrayHeader {
    pub(crate) fn try_new(header_byte: u8) -> Result<Self, VariantError> {
        let value_header = header_byte >> BASIC_TYPE_BITS;
        if value_header & 0x38 != 0 {
            return Err(VariantError::MalformedEncoding(
                "reserved array header bits are set".to_string(),
            ));
        }
        Ok(Self {
            offset_size: OffsetSizeBytes::try_new(value_header & 0x03)?,
            is_large: value_header & 0x04 != 0,
        })
    }
}

pub(crate) fn array_header(is_large: bool, offset_size: u8) -> u8 {
    let large_bit = if is_large { 1 } else { 0 };
    (large_bit << (BASIC_TYPE_BITS + 2))
        | ((offset_size - 1) << BASIC_TYPE_BITS)
        | VariantBasicType::Array as u8
}

/// Used to unpack offset array entries such as metadata dictionary offsets or
/// object/array value offsets, as well as object field ids. These are always
/// derived from a two-bit `XXX_size_minus_one` field in the corresponding
/// header byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OffsetSizeBytes {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl OffsetSizeBytes {
    /// Build from the two `offset_size_minus_one` bits.
    pub(crate) fn try_new(offset_size_minus_one: u8) -> Result<Self, VariantError> {
        use OffsetSizeBytes::*;
        match offset_size_minus_one {
            0 => Ok(One),
            1 => Ok(Two),
            2 => Ok(Three),
            3 => Ok(Four),
            n => Err(VariantError::MalformedEncoding(format!(
                "offset_size_minus_one must be 0-3, got {n}"
            ))),
        }
    }

    /// Return one unsigned little-endian value from `bytes`.
    ///
    /// * `byte_offset` - number of bytes to skip **before** reading the first
    ///   value (e.g. `1` to move past a header byte).
    /// * `index` - 0-based index **after** the skipped bytes (`0` is the
    ///   first value, `1` the next, and so on).
    ///
    /// Each value is `self as usize` bytes wide (1, 2, 3 or 4),
    /// zero-extended as needed. Width 3 reads `b0 | b1 << 8 | b2 << 16`.
    pub(crate) fn unpack_usize(
        &self,
        bytes: &[u8],
        byte_offset: usize,
        index: usize,
    ) -> Result<usize, VariantError> {
        use OffsetSizeBytes::*;
        let offset = index
            .checked_mul(*self as usize)
            .and_then(|n| n.checked_add(byte_offset))
            .ok_or_else(|| overflow_error("offset array index"))?;
        let value = match self {
            One => u8::from_le_bytes(array_from_slice(bytes, offset)?) as usize,
            Two => u16::from_le_bytes(array_from_slice(bytes, offset)?) as usize,
            Three => {
                let chunk: [u8; 3] = array_from_slice(bytes, offset)?;
                u32::from_le_bytes([chunk[0], chunk[1], chunk[2], 0]) as usize
            }
            Four => u32::from_le_bytes(array_from_slice(bytes, offset)?) as usize,
        };
        Ok(value)
    }
}

/// Minimum number of bytes (1-4) that can hold `v` as an unsigned
/// little-endian integer.
pub(crate) fn int_size(v: usize) -> u8 {
    match v {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x10000..=0xFFFFFF => 3,
        _ => 4,
    }
}

/// Write `value` to `buf` as a little-endian integer of `nbytes` bytes.
pub(crate) fn write_offset(buf: &mut Vec<u8>, value: usize, nbytes: u8) {
    let bytes = value.to_le_bytes();
    buf.extend_from_slice(&bytes[..nbytes as usize]);
}

/// Decodes an Int8 from the value section of a variant.
pub(crate) fn decode_int8(data: &[u8]) -> Result<i8, VariantError> {
    Ok(i8::from_le_bytes(array_from_slice(data, 0)?))
}

/// Decodes an Int16 from the value section of a variant.
pub(crate) fn decode_int16(data: &[u8]) -> Result<i16, VariantError> {
    Ok(i16::from_le_bytes(array_from_slice(data, 0)?))
}

/// Decodes an Int32 from the value section of a variant.
pub(crate) fn decode_int32(data: &[u8]) -> Result<i32, VariantError> {
    Ok(i32::from_le_bytes(array_from_slice(data, 0)?))
}

/// Decodes an Int64 from the value section of a variant.
pub(crate) fn decode_int64(data: &[u8]) -> Result<i64, VariantError> {
    Ok(i64::from_le_bytes(array_from_slice(data, 0)?))
}

/// Decodes a Float from the value section of a variant.
pub(crate) fn decode_float(data: &[u8]) -> Result<f32, VariantError> {
    Ok(f32::from_le_bytes(array_from_slice(data, 0)?))
}

/// Decodes a Double from the value section of a variant.
pub(crate) fn decode_double(data: &[u8]) -> Result<f64, VariantError> {
    Ok(f64::from_le_bytes(array_from_slice(data, 0)?))
}

/// Decodes a Decimal4 from the value section of a variant, returning the
/// unscaled value and the scale.
pub(crate) fn decode_decimal4(data: &[u8]) -> Result<(i32, u8), VariantError> {
    let scale = u8::from_le_bytes(array_from_slice(data, 0)?);
    let integer = i32::from_le_bytes(array_from_slice(data, 1)?);
    Ok((integer, scale))
}

/// Decodes a Decimal8 from the value section of a variant.
pub(crate) fn decode_decimal8(data: &[u8]) -> Result<(i64, u8), VariantError> {
    let scale = u8::from_le_bytes(array_from_slice(data, 0)?);
    let integer = i64::from_le_bytes(array_from_slice(data, 1)?);
    Ok((integer, scale))
}

/// Decodes a Decimal16 from the value section of a variant.
pub(crate) fn decode_decimal16(data: &[u8]) -> Result<(i128, u8), VariantError> {
    let scale = u8::from_le_bytes(array_from_slice(data, 0)?);
    let integer = i128::from_le_bytes(array_from_slice(data, 1)?);
    Ok((integer, scale))
}

/// Decodes a Date from the value section of a variant.
pub(crate) fn decode_date(data: &[u8]) -> Result<NaiveDate, VariantError> {
    let days_since_epoch = i32::from_le_bytes(array_from_slice(data, 0)?);
    let value = DateTime::UNIX_EPOCH + chrono::Duration::days(i64::from(days_since_epoch));
    Ok(value.date_naive())
}

/// Decodes a TimestampMicros from the value section of a variant.
pub(crate) fn decode_timestamp_micros(data: &[u8]) -> Result<DateTime<Utc>, VariantError> {
    let micros_since_epoch = i64::from_le_bytes(array_from_slice(data, 0)?);
    DateTime::from_timestamp_micros(micros_since_epoch).ok_or_else(|| {
        VariantError::MalformedEncoding(format!(
            "{micros_since_epoch} microseconds is outside the representable timestamp range"
        ))
    })
}

/// Decodes a TimestampNtzMicros from the value section of a variant.
pub(crate) fn decode_timestamp_ntz_micros(data: &[u8]) -> Result<NaiveDateTime, VariantError> {
    decode_timestamp_micros(data).map(|v| v.naive_utc())
}

/// Decodes a TimeNtz from the value section of a variant.
pub(crate) fn decode_time_ntz(data: &[u8]) -> Result<NaiveTime, VariantError> {
    let micros_since_midnight = u64::from_le_bytes(array_from_slice(data, 0)?);

    let out_of_range = || {
        VariantError::MalformedEncoding(format!(
            "{micros_since_midnight} microseconds is not a valid time of day"
        ))
    };

    if micros_since_midnight >= 86_400_000_000 {
        return Err(out_of_range());
    }

    let nanos_since_midnight = micros_since_midnight * 1_000;
    NaiveTime::from_num_seconds_from_midnight_opt(
        (nanos_since_midnight / 1_000_000_000) as u32,
        (nanos_since_midnight % 1_000_000_000) as u32,
    )
    .ok_or_else(out_of_range)
}

/// Decodes a TimestampNanos from the value section of a variant.
pub(crate) fn decode_timestamp_nanos(data: &[u8]) -> Result<DateTime<Utc>, VariantError> {
    let nanos_since_epoch = i64::from_le_bytes(array_from_slice(data, 0)?);

    // Every i64 nanosecond count maps to a representable DateTime.
    Ok(DateTime::from_timestamp_nanos(nanos_since_epoch))
}

/// Decodes a TimestampNtzNanos from the value section of a variant.
pub(crate) fn decode_timestamp_ntz_nanos(data: &[u8]) -> Result<NaiveDateTime, VariantError> {
    decode_timestamp_nanos(data).map(|v| v.naive_utc())
}

/// Decodes a Uuid from the value section of a variant. The payload is stored
/// in RFC 4122 (big-endian) byte order, which is also the in-memory order of
/// [`Uuid`], so the bytes are taken as-is.
pub(crate) fn decode_uuid(data: &[u8]) -> Result<Uuid, VariantError> {
    let bytes: [u8; 16] = array_from_slice(data, 0)?;
    Ok(Uuid::from_bytes(bytes))
}

/// Decodes a Binary from the value section of a variant.
pub(crate) fn decode_binary(data: &[u8]) -> Result<&[u8], VariantError> {
    let len = u32::from_le_bytes(array_from_slice(data, 0)?) as usize;
    let end = len
        .checked_add(4)
        .ok_or_else(|| overflow_error("binary length"))?;
    slice_from_slice(data, 4..end)
}

/// Decodes a String primitive (4-byte length prefix) from the value section
/// of a variant.
pub(crate) fn decode_long_string(data: &[u8]) -> Result<&str, VariantError> {
    let len = u32::from_le_bytes(array_from_slice(data, 0)?) as usize;
    let end = len
        .checked_add(4)
        .ok_or_else(|| overflow_error("string length"))?;
    string_from_slice(data, 4..end)
}

/// Decodes a short string: the length lives in the header byte, the payload
/// follows it directly.
pub(crate) fn decode_short_string(header: u8, data: &[u8]) -> Result<&str, VariantError> {
    string_from_slice(data, 0..short_string_len(header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;

    fn decimal_payload(scale: u8, unscaled: &[u8]) -> Vec<u8> {
        let mut payload = vec![scale];
        payload.extend_from_slice(unscaled);
        payload
    }

    fn length_prefixed(data: &[u8]) -> Vec<u8> {
        let mut payload = (data.len() as u32).to_le_bytes().to_vec();
        payload.extend_from_slice(data);
        payload
    }

    // Every strict prefix of a well-formed payload must fail to decode, not
    // just the one-byte-short case.
    macro_rules! test_rejects_truncation {
        ($($kind:ident => $payload:expr),+ $(,)?) => {
            $(paste! {
                #[test]
                fn [<truncated_ $kind _payload_fails>]() {
                    let payload = $payload;
                    assert!([<decode_ $kind>](&payload[..]).is_ok());
                    for len in 0..payload.len() {
                        let result = [<decode_ $kind>](&payload[..len]);
                        assert!(
                            matches!(result, Err(VariantError::MalformedEncoding(_))),
                            "{len} of {} bytes must not decode as {}",
                            payload.len(),
                            stringify!($kind)
                        );
                    }
                }
            })+
        };
    }

    test_rejects_truncation! {
        int8 => 3i8.to_le_bytes(),
        int16 => 300i16.to_le_bytes(),
        int32 => (-70_000i32).to_le_bytes(),
        int64 => 5_000_000_000i64.to_le_bytes(),
        float => 0.25f32.to_le_bytes(),
        double => (-1.5f64).to_le_bytes(),
        decimal4 => decimal_payload(2, &(-250i32).to_le_bytes()),
        decimal8 => decimal_payload(4, &31_415_926_535i64.to_le_bytes()),
        decimal16 => decimal_payload(5, &10i128.pow(20).to_le_bytes()),
        date => 11_017i32.to_le_bytes(),
        timestamp_micros => 946_684_800_123_456i64.to_le_bytes(),
        timestamp_nanos => 1_000_000_007i64.to_le_bytes(),
        time_ntz => 45_296_789_012u64.to_le_bytes(),
        uuid => *Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000")
            .unwrap()
            .as_bytes(),
        binary => length_prefixed(&[1, 2, 3, 4, 5]),
        long_string => length_prefixed(b"variant"),
    }

    #[test]
    fn decode_integer_values() {
        assert_eq!(decode_int8(&(-7i8).to_le_bytes()).unwrap(), -7);
        assert_eq!(decode_int16(&300i16.to_le_bytes()).unwrap(), 300);
        assert_eq!(decode_int32(&(-70_000i32).to_le_bytes()).unwrap(), -70_000);
        assert_eq!(
            decode_int64(&5_000_000_000i64.to_le_bytes()).unwrap(),
            5_000_000_000
        );
    }

    #[test]
    fn decode_float_values() {
        assert_eq!(decode_float(&0.25f32.to_le_bytes()).unwrap(), 0.25);
        assert_eq!(decode_double(&(-1.5f64).to_le_bytes()).unwrap(), -1.5);
    }

    #[test]
    fn decode_decimal_values() {
        assert_eq!(
            decode_decimal4(&decimal_payload(2, &(-250i32).to_le_bytes())).unwrap(),
            (-250, 2)
        );
        assert_eq!(
            decode_decimal8(&decimal_payload(4, &31_415_926_535i64.to_le_bytes())).unwrap(),
            (31_415_926_535, 4)
        );
        assert_eq!(
            decode_decimal16(&decimal_payload(5, &10i128.pow(20).to_le_bytes())).unwrap(),
            (10i128.pow(20), 5)
        );
    }

    #[test]
    fn decode_date_values() {
        // day zero is the epoch itself; 11017 = 10957 days to 2000-01-01
        // plus 31 for January plus 29 for a leap February
        let cases = [
            (0, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            (11_017, NaiveDate::from_ymd_opt(2000, 3, 1).unwrap()),
            (-1, NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()),
        ];
        for (days, expected) in cases {
            assert_eq!(decode_date(&(days as i32).to_le_bytes()).unwrap(), expected);
        }
    }

    #[test]
    fn decode_timestamp_values() {
        // 946684800 seconds after the epoch is 2000-01-01T00:00:00Z
        let payload = 946_684_800_123_456i64.to_le_bytes();
        let expected = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_micro_opt(0, 0, 0, 123_456)
            .unwrap();
        assert_eq!(decode_timestamp_micros(&payload).unwrap(), expected.and_utc());
        assert_eq!(decode_timestamp_ntz_micros(&payload).unwrap(), expected);
    }

    #[test]
    fn decode_timestamp_nanos_values() {
        let payload = 1_000_000_007i64.to_le_bytes();
        let expected = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_nano_opt(0, 0, 1, 7)
            .unwrap();
        assert_eq!(decode_timestamp_nanos(&payload).unwrap(), expected.and_utc());
        assert_eq!(decode_timestamp_ntz_nanos(&payload).unwrap(), expected);

        // one nanosecond before the epoch
        let payload = (-1i64).to_le_bytes();
        let expected = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap();
        assert_eq!(decode_timestamp_nanos(&payload).unwrap(), expected.and_utc());
    }

    #[test]
    fn decode_time_ntz_values() {
        let micros: u64 = (12 * 3600 + 34 * 60 + 56) * 1_000_000 + 789_012;
        assert_eq!(
            decode_time_ntz(&micros.to_le_bytes()).unwrap(),
            NaiveTime::from_hms_micro_opt(12, 34, 56, 789_012).unwrap()
        );

        // midnight and the last representable microsecond of the day
        assert_eq!(
            decode_time_ntz(&0u64.to_le_bytes()).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            decode_time_ntz(&86_399_999_999u64.to_le_bytes()).unwrap(),
            NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap()
        );
    }

    #[test]
    fn decode_time_ntz_rejects_full_day() {
        for micros in [86_400_000_000u64, u64::MAX] {
            let result = decode_time_ntz(&micros.to_le_bytes());
            assert!(matches!(result, Err(VariantError::MalformedEncoding(_))));
        }
    }

    #[test]
    fn decode_uuid_network_order() {
        // RFC 4122 bytes map straight onto the textual form
        let payload = [
            0x55, 0x0e, 0x84, 0x00, 0xe2, 0x9b, 0x41, 0xd4, 0xa7, 0x16, 0x44, 0x66, 0x55, 0x44,
            0x00, 0x00,
        ];
        assert_eq!(
            decode_uuid(&payload).unwrap(),
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
        );
    }

    #[test]
    fn decode_binary_reads_prefixed_length() {
        let payload = length_prefixed(&[1, 2, 3, 4, 5]);
        assert_eq!(decode_binary(&payload).unwrap(), &[1, 2, 3, 4, 5]);

        // trailing bytes beyond the prefixed length are ignored
        let mut padded = payload.clone();
        padded.push(0xFF);
        assert_eq!(decode_binary(&padded).unwrap(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn decode_string_values() {
        let data = b"variant!";
        assert_eq!(
            decode_short_string(short_string_header(7), data).unwrap(),
            "variant"
        );
        assert!(matches!(
            decode_short_string(short_string_header(7), &data[..6]),
            Err(VariantError::MalformedEncoding(_))
        ));

        assert_eq!(
            decode_long_string(&length_prefixed(b"variant")).unwrap(),
            "variant"
        );
    }

    #[test]
    fn decode_string_rejects_invalid_utf8() {
        assert!(matches!(
            decode_short_string(short_string_header(2), &[0xFF, 0xFE]),
            Err(VariantError::InvalidUtf8(_))
        ));
        assert!(matches!(
            decode_long_string(&length_prefixed(&[0xC0, 0x00])),
            Err(VariantError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn offset_size_covers_two_bits() {
        for bits in 0..=3u8 {
            assert_eq!(OffsetSizeBytes::try_new(bits).unwrap() as u8, bits + 1);
        }
        assert!(OffsetSizeBytes::try_new(4).is_err());
    }

    #[test]
    fn unpack_round_trips_every_width() {
        for width in 1..=4u8 {
            let size = OffsetSizeBytes::try_new(width - 1).unwrap();
            let max = (u32::MAX >> (32 - 8 * width as u32)) as usize;
            let values = [0usize, 1, max / 2, max];

            // one pad byte in front, skipped with byte_offset
            let mut buf = vec![0xAAu8];
            for &value in &values {
                write_offset(&mut buf, value, width);
            }

            for (index, &expected) in values.iter().enumerate() {
                assert_eq!(size.unpack_usize(&buf, 1, index).unwrap(), expected);
            }
            // one entry past the end runs out of bytes
            assert!(size.unpack_usize(&buf, 1, values.len()).is_err());
        }
    }

    #[test]
    fn unpack_three_byte_width() {
        // b0 | b1 << 8 | b2 << 16
        assert_eq!(
            OffsetSizeBytes::Three
                .unpack_usize(&[0x01, 0x02, 0x03], 0, 0)
                .unwrap(),
            0x030201
        );
    }

    #[test]
    fn test_int_size() {
        assert_eq!(int_size(0), 1);
        assert_eq!(int_size(0xFF), 1);
        assert_eq!(int_size(0x100), 2);
        assert_eq!(int_size(0xFFFF), 2);
        assert_eq!(int_size(0x10000), 3);
        assert_eq!(int_size(0xFFFFFF), 3);
        assert_eq!(int_size(0x1000000), 4);
    }

    #[test]
    fn test_write_offset_round_trips() {
        for (value, width) in [
            (0usize, 1u8),
            (0xFF, 1),
            (0x100, 2),
            (0x030201, 3),
            (0xFFFFFF, 3),
            (0x12345678, 4),
        ] {
            let mut buf = Vec::new();
            write_offset(&mut buf, value, width);
            assert_eq!(buf.len(), width as usize);

            let size = OffsetSizeBytes::try_new(width - 1).unwrap();
            assert_eq!(size.unpack_usize(&buf, 0, 0).unwrap(), value);
        }
    }

    #[test]
    fn test_metadata_header_round_trip() {
        for is_sorted in [false, true] {
            for offset_size in 1..=4u8 {
                let byte = MetadataHeader::header_byte(is_sorted, offset_size);
                let header = MetadataHeader::try_new(byte).unwrap();
                assert_eq!(header.version, 1);
                assert_eq!(header.is_sorted, is_sorted);
                assert_eq!(header.offset_size as u8, offset_size);
            }
        }
    }

    #[test]
    fn test_metadata_header_rejects_bad_version() {
        for version in [0u8, 2, 15] {
            let err = MetadataHeader::try_new(version).unwrap_err();
            assert!(matches!(err, VariantError::UnsupportedVersion(v) if v == version));
        }
    }

    #[test]
    fn test_metadata_header_rejects_reserved_bit() {
        let err = MetadataHeader::try_new(0x11).unwrap_err();
        assert!(matches!(err, VariantError::MalformedEncoding(_)));
    }

    #[test]
    fn test_object_header_round_trip() {
        for is_large in [false, true] {
            for field_id_size in 1..=4u8 {
                for offset_size in 1..=4u8 {
                    let byte = object_header(is_large, field_id_size, offset_size);
                    assert_eq!(basic_type(byte), VariantBasicType::Object);

                    let header = ObjectHeader::try_new(byte).unwrap();
                    assert_eq!(header.is_large, is_large);
                    assert_eq!(header.field_id_size as u8, field_id_size);
                    assert_eq!(header.offset_size as u8, offset_size);
                }
            }
        }
    }

    #[test]
    fn test_array_header_round_trip() {
        for is_large in [false, true] {
            for offset_size in 1..=4u8 {
                let byte = array_header(is_large, offset_size);
                assert_eq!(basic_type(byte), VariantBasicType::Array);

                let header = ArrayHeader::try_new(byte).unwrap();
                assert_eq!(header.is_large, is_large);
                assert_eq!(header.offset_size as u8, offset_size);
            }
        }
    }

    #[test]
    fn test_container_headers_reject_reserved_bits() {
        let object_reserved = 0x80 | VariantBasicType::Object as u8;
        assert!(ObjectHeader::try_new(object_reserved).is_err());

        for reserved_bit in [0x20u8, 0x40, 0x80] {
            let array_reserved = reserved_bit | VariantBasicType::Array as u8;
            assert!(ArrayHeader::try_new(array_reserved).is_err());
        }
    }

    #[test]
    fn test_primitive_header_round_trip() {
        for id in 0..=20u8 {
            let primitive = VariantPrimitiveType::try_from(id).unwrap();
            let byte = primitive_header(primitive);
            assert_eq!(basic_type(byte), VariantBasicType::Primitive);
            assert_eq!(primitive_type(byte).unwrap(), primitive);
        }

        assert!(matches!(
            VariantPrimitiveType::try_from(21),
            Err(VariantError::UnsupportedPrimitive(21))
        ));
    }

    #[test]
    fn test_short_string_header_round_trip() {
        for len in [0usize, 1, 63] {
            let byte = short_string_header(len);
            assert_eq!(basic_type(byte), VariantBasicType::ShortString);
            assert_eq!(short_string_len(byte), len);
        }
    }
}
