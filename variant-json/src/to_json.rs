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

//! Writing variant data out as JSON text.
//!
//! [`variant_to_json`] walks an encoded blob directly through a
//! [`VariantReader`] without materializing it; [`value_to_json`] does the
//! same for an owned [`VariantValue`] tree. Objects are emitted in stored
//! order, which is name-sorted for encoded values.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveTime, Timelike, Utc};

use variant::{VariantError, VariantPrimitiveType, VariantReader, VariantValue};

/// Writes the JSON form of an encoded variant value to `writer`.
///
/// Float and double values must be finite; NaN and the infinities fail with
/// [`VariantError::UnrepresentableFloat`] because JSON has no encoding for
/// them. Decimals of any magnitude are written as exact decimal literals.
///
/// # Example
/// ```
/// # use variant::{encode_variant, VariantReader, VariantValue};
/// # use variant_json::variant_to_json;
/// let (metadata, value) = encode_variant(&VariantValue::from("Hi"))?;
/// let reader = VariantReader::try_new(&metadata, &value)?;
/// let mut buffer = Vec::new();
/// variant_to_json(&mut buffer, &reader)?;
/// assert_eq!(buffer.as_slice(), b"\"Hi\"");
/// # Ok::<(), variant::VariantError>(())
/// ```
pub fn variant_to_json(
    writer: &mut impl Write,
    reader: &VariantReader<'_, '_>,
) -> Result<(), VariantError> {
    use variant::VariantBasicType;

    match reader.basic_type() {
        VariantBasicType::ShortString => write_json_string(writer, reader.get_string()?),
        VariantBasicType::Object => {
            let obj = reader.get_object()?;
            write!(writer, "{{")?;
            for i in 0..obj.len() {
                if i > 0 {
                    write!(writer, ",")?;
                }
                write_json_string(writer, obj.field_name(i)?)?;
                write!(writer, ":")?;
                variant_to_json(writer, &obj.field(i)?)?;
            }
            write!(writer, "}}")?;
            Ok(())
        }
        VariantBasicType::Array => {
            let arr = reader.get_array()?;
            write!(writer, "[")?;
            for i in 0..arr.len() {
                if i > 0 {
                    write!(writer, ",")?;
                }
                variant_to_json(writer, &arr.element(i)?)?;
            }
            write!(writer, "]")?;
            Ok(())
        }
        VariantBasicType::Primitive => match reader.primitive_type()? {
            VariantPrimitiveType::Null => Ok(write!(writer, "null")?),
            VariantPrimitiveType::BooleanTrue => Ok(write!(writer, "true")?),
            VariantPrimitiveType::BooleanFalse => Ok(write!(writer, "false")?),
            VariantPrimitiveType::Int8 => Ok(write!(writer, "{}", reader.get_int8()?)?),
            VariantPrimitiveType::Int16 => Ok(write!(writer, "{}", reader.get_int16()?)?),
            VariantPrimitiveType::Int32 => Ok(write!(writer, "{}", reader.get_int32()?)?),
            VariantPrimitiveType::Int64 => Ok(write!(writer, "{}", reader.get_int64()?)?),
            VariantPrimitiveType::Float => write_float(writer, reader.get_float()?),
            VariantPrimitiveType::Double => write_double(writer, reader.get_double()?),
            VariantPrimitiveType::Decimal4 => {
                Ok(write!(writer, "{}", reader.get_decimal4()?)?)
            }
            VariantPrimitiveType::Decimal8 => {
                Ok(write!(writer, "{}", reader.get_decimal8()?)?)
            }
            VariantPrimitiveType::Decimal16 => {
                Ok(write!(writer, "{}", reader.get_decimal16()?)?)
            }
            VariantPrimitiveType::Date => {
                Ok(write!(writer, "\"{}\"", reader.get_date()?.format("%Y-%m-%d"))?)
            }
            VariantPrimitiveType::TimestampMicros => {
                Ok(write!(writer, "\"{}\"", reader.get_timestamp_micros()?.to_rfc3339())?)
            }
            VariantPrimitiveType::TimestampNtzMicros => Ok(write!(
                writer,
                "\"{}\"",
                reader
                    .get_timestamp_ntz_micros()?
                    .format("%Y-%m-%dT%H:%M:%S%.6f")
            )?),
            VariantPrimitiveType::TimeNtz => {
                Ok(write!(writer, "{}", time_micros(&reader.get_time_ntz()?))?)
            }
            VariantPrimitiveType::TimestampNanos => {
                write_nanos(writer, &reader.get_timestamp_nanos()?)
            }
            VariantPrimitiveType::TimestampNtzNanos => {
                write_nanos(writer, &reader.get_timestamp_ntz_nanos()?.and_utc())
            }
            VariantPrimitiveType::Binary => {
                write_json_string(writer, &STANDARD.encode(reader.get_binary()?))
            }
            VariantPrimitiveType::String => write_json_string(writer, reader.get_string()?),
            VariantPrimitiveType::Uuid => {
                Ok(write!(writer, "\"{}\"", reader.get_uuid()?)?)
            }
        },
    }
}

/// Renders an encoded variant value as a JSON string.
pub fn variant_to_json_string(reader: &VariantReader<'_, '_>) -> Result<String, VariantError> {
    let mut buffer = Vec::new();
    variant_to_json(&mut buffer, reader)?;
    String::from_utf8(buffer).map_err(|e| VariantError::InvalidUtf8(e.utf8_error()))
}

/// Writes the JSON form of an owned value tree to `writer`, with the same
/// mappings as [`variant_to_json`]. Object fields are written in insertion
/// order.
pub fn value_to_json(
    writer: &mut impl Write,
    value: &VariantValue,
) -> Result<(), VariantError> {
    match value {
        VariantValue::Null => Ok(write!(writer, "null")?),
        VariantValue::BooleanTrue => Ok(write!(writer, "true")?),
        VariantValue::BooleanFalse => Ok(write!(writer, "false")?),
        VariantValue::Int8(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Int16(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Int32(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Int64(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Float(v) => write_float(writer, *v),
        VariantValue::Double(v) => write_double(writer, *v),
        VariantValue::Decimal4(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Decimal8(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Decimal16(v) => Ok(write!(writer, "{v}")?),
        VariantValue::Date(v) => Ok(write!(writer, "\"{}\"", v.format("%Y-%m-%d"))?),
        VariantValue::TimestampMicros(v) => Ok(write!(writer, "\"{}\"", v.to_rfc3339())?),
        VariantValue::TimestampNtzMicros(v) => Ok(write!(
            writer,
            "\"{}\"",
            v.format("%Y-%m-%dT%H:%M:%S%.6f")
        )?),
        VariantValue::TimeNtz(v) => Ok(write!(writer, "{}", time_micros(v))?),
        VariantValue::TimestampNanos(v) => write_nanos(writer, v),
        VariantValue::TimestampNtzNanos(v) => write_nanos(writer, &v.and_utc()),
        VariantValue::Binary(v) => write_json_string(writer, &STANDARD.encode(v)),
        VariantValue::String(v) => write_json_string(writer, v),
        VariantValue::Uuid(v) => Ok(write!(writer, "\"{v}\"")?),
        VariantValue::Object(fields) => {
            write!(writer, "{{")?;
            for (i, (name, child)) in fields.iter().enumerate() {
                if i > 0 {
                    write!(writer, ",")?;
                }
                write_json_string(writer, name)?;
                write!(writer, ":")?;
                value_to_json(writer, child)?;
            }
            write!(writer, "}}")?;
            Ok(())
        }
        VariantValue::Array(elements) => {
            write!(writer, "[")?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    write!(writer, ",")?;
                }
                value_to_json(writer, element)?;
            }
            write!(writer, "]")?;
            Ok(())
        }
    }
}

/// Renders an owned value tree as a JSON string.
pub fn value_to_json_string(value: &VariantValue) -> Result<String, VariantError> {
    let mut buffer = Vec::new();
    value_to_json(&mut buffer, value)?;
    String::from_utf8(buffer).map_err(|e| VariantError::InvalidUtf8(e.utf8_error()))
}

fn write_json_string(writer: &mut impl Write, value: &str) -> Result<(), VariantError> {
    // serde_json applies the JSON escaping rules
    let escaped = serde_json::to_string(value)
        .map_err(|e| VariantError::MalformedJson(format!("string encoding error: {e}")))?;
    write!(writer, "{escaped}")?;
    Ok(())
}

fn write_float(writer: &mut impl Write, value: f32) -> Result<(), VariantError> {
    check_finite(value.is_nan(), value.is_infinite())?;
    write!(writer, "{value}")?;
    Ok(())
}

fn write_double(writer: &mut impl Write, value: f64) -> Result<(), VariantError> {
    check_finite(value.is_nan(), value.is_infinite())?;
    write!(writer, "{value}")?;
    Ok(())
}

fn check_finite(is_nan: bool, is_infinite: bool) -> Result<(), VariantError> {
    if is_nan {
        return Err(VariantError::UnrepresentableFloat("NaN"));
    }
    if is_infinite {
        return Err(VariantError::UnrepresentableFloat("infinity"));
    }
    Ok(())
}

// Times are written as their stored scalar: microseconds since midnight.
fn time_micros(time: &NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * 1_000_000 + (time.nanosecond() / 1_000) as i64
}

// Nanosecond timestamps are written as their stored scalar.
fn write_nanos(writer: &mut impl Write, ts: &DateTime<Utc>) -> Result<(), VariantError> {
    let nanos = ts.timestamp_nanos_opt().ok_or_else(|| {
        VariantError::MalformedEncoding(format!(
            "timestamp {ts} is outside the representable nanosecond range"
        ))
    })?;
    write!(writer, "{nanos}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use variant::{encode_variant, VariantDecimal4, VariantDecimal16};

    fn to_json(value: &VariantValue) -> Result<String, VariantError> {
        let (metadata, bytes) = encode_variant(value)?;
        let reader = VariantReader::try_new(&metadata, &bytes)?;
        variant_to_json_string(&reader)
    }

    #[test]
    fn test_primitives_to_json() {
        assert_eq!(to_json(&VariantValue::Null).unwrap(), "null");
        assert_eq!(to_json(&VariantValue::BooleanTrue).unwrap(), "true");
        assert_eq!(to_json(&VariantValue::BooleanFalse).unwrap(), "false");
        assert_eq!(to_json(&VariantValue::Int8(42)).unwrap(), "42");
        assert_eq!(to_json(&VariantValue::Int8(-123)).unwrap(), "-123");
        assert_eq!(to_json(&VariantValue::Int64(i64::MAX)).unwrap(), "9223372036854775807");
        assert_eq!(to_json(&VariantValue::Double(1.5)).unwrap(), "1.5");
        assert_eq!(to_json(&VariantValue::from("hello")).unwrap(), "\"hello\"");
        assert_eq!(
            to_json(&VariantValue::from("say \"hi\"\n")).unwrap(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn test_nan_and_infinity_fail() {
        for value in [
            VariantValue::Double(f64::NAN),
            VariantValue::Double(f64::INFINITY),
            VariantValue::Double(f64::NEG_INFINITY),
            VariantValue::Float(f32::NAN),
        ] {
            let err = to_json(&value).unwrap_err();
            assert!(
                matches!(err, VariantError::UnrepresentableFloat(_)),
                "expected an unrepresentable float error, got {err:?}"
            );
        }
    }

    #[test]
    fn test_decimals_to_json() {
        assert_eq!(
            to_json(&VariantValue::Decimal4(
                VariantDecimal4::try_new(-12345, 3).unwrap()
            ))
            .unwrap(),
            "-12.345"
        );
        assert_eq!(
            to_json(&VariantValue::from_decimal(123456789, 6).unwrap()).unwrap(),
            "123.456789"
        );
    }

    #[test]
    fn test_decimal16_beyond_96_bits_to_json() {
        // 2^96 written as its exact 29-digit literal
        let value =
            VariantValue::Decimal16(VariantDecimal16::try_new(1i128 << 96, 0).unwrap());
        assert_eq!(to_json(&value).unwrap(), "79228162514264337593543950336");
    }

    #[test]
    fn test_temporal_to_json() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(
            to_json(&VariantValue::Date(date)).unwrap(),
            "\"2023-12-25\""
        );

        let ts = date.and_hms_opt(10, 30, 45).unwrap();
        assert_eq!(
            to_json(&VariantValue::TimestampMicros(ts.and_utc())).unwrap(),
            "\"2023-12-25T10:30:45+00:00\""
        );
        assert_eq!(
            to_json(&VariantValue::TimestampNtzMicros(
                date.and_hms_micro_opt(10, 30, 45, 123_456).unwrap()
            ))
            .unwrap(),
            "\"2023-12-25T10:30:45.123456\""
        );
    }

    #[test]
    fn test_time_and_nanos_to_json_integers() {
        let time = NaiveTime::from_hms_micro_opt(0, 0, 12, 345_678).unwrap();
        assert_eq!(
            to_json(&VariantValue::TimeNtz(time)).unwrap(),
            "12345678"
        );

        let ts = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_nano_opt(0, 0, 1, 500)
            .unwrap();
        assert_eq!(
            to_json(&VariantValue::TimestampNanos(ts.and_utc())).unwrap(),
            "1000000500"
        );
        assert_eq!(
            to_json(&VariantValue::TimestampNtzNanos(ts)).unwrap(),
            "1000000500"
        );
    }

    #[test]
    fn test_binary_to_json_base64() {
        assert_eq!(
            to_json(&VariantValue::Binary(b"hello".to_vec())).unwrap(),
            "\"aGVsbG8=\""
        );
    }

    #[test]
    fn test_uuid_to_json() {
        let uuid = uuid::Uuid::parse_str("550E8400-E29B-41D4-A716-446655440000").unwrap();
        assert_eq!(
            to_json(&VariantValue::Uuid(uuid)).unwrap(),
            "\"550e8400-e29b-41d4-a716-446655440000\""
        );
    }

    #[test]
    fn test_objects_emit_sorted_fields() {
        let mut fields = indexmap::IndexMap::new();
        fields.insert("zebra".to_string(), VariantValue::Int8(1));
        fields.insert("apple".to_string(), VariantValue::Int8(2));
        let value = VariantValue::Object(fields);

        // the encoded form stores fields sorted by name
        assert_eq!(to_json(&value).unwrap(), r#"{"apple":2,"zebra":1}"#);
        // the tree writer keeps insertion order
        assert_eq!(
            value_to_json_string(&value).unwrap(),
            r#"{"zebra":1,"apple":2}"#
        );
    }

    #[test]
    fn test_nested_to_json() {
        let mut inner = indexmap::IndexMap::new();
        inner.insert("name".to_string(), VariantValue::from("Alice"));
        let value = VariantValue::Array(vec![
            VariantValue::Object(inner),
            VariantValue::Int16(128),
            VariantValue::BooleanFalse,
            VariantValue::Null,
        ]);

        assert_eq!(
            to_json(&value).unwrap(),
            r#"[{"name":"Alice"},128,false,null]"#
        );
    }
}
