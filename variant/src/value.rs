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

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::codec::{VariantBasicType, VariantPrimitiveType};
use crate::{
    VariantDecimal16, VariantDecimal4, VariantDecimal8, VariantError, VariantReader,
};

/// An owned, materialized variant value.
///
/// This is the input of [`encode_variant`] and the output of
/// [`VariantReader::materialize`]. The concrete primitive tag is part of the
/// value: an `Int16(7)` is distinct from an `Int32(7)` and survives a round
/// trip through the binary form unchanged. The only exception is strings,
/// where the short and long encodings are a wire-level detail and both
/// materialize to [`VariantValue::String`].
///
/// # Equality and hashing
///
/// Equality is structural. Objects compare order-independently (two objects
/// built with the same fields in different insertion order are equal), arrays
/// compare element by element in order, and floats compare by bit pattern so
/// NaN-carrying values stay equal to themselves. The [`Hash`] implementation
/// agrees: object hashes accumulate entry hashes with XOR, so insertion
/// order does not affect them.
///
/// # Example
/// ```
/// # use variant::{encode_variant, VariantReader, VariantValue};
/// let value = VariantValue::from(1234i16);
/// let (metadata, bytes) = encode_variant(&value)?;
/// let reader = VariantReader::try_new(&metadata, &bytes)?;
/// assert_eq!(reader.materialize()?, value);
/// # Ok::<(), variant::VariantError>(())
/// ```
///
/// [`encode_variant`]: crate::encode_variant
#[derive(Debug, Clone)]
pub enum VariantValue {
    /// The null primitive.
    Null,
    /// The boolean true primitive.
    BooleanTrue,
    /// The boolean false primitive.
    BooleanFalse,
    /// An 8-bit signed integer.
    Int8(i8),
    /// A 16-bit signed integer.
    Int16(i16),
    /// A 32-bit signed integer.
    Int32(i32),
    /// A 64-bit signed integer.
    Int64(i64),
    /// A 32-bit IEEE-754 float.
    Float(f32),
    /// A 64-bit IEEE-754 double.
    Double(f64),
    /// A decimal with a 4-byte unscaled value.
    Decimal4(VariantDecimal4),
    /// A decimal with an 8-byte unscaled value.
    Decimal8(VariantDecimal8),
    /// A decimal with a 16-byte unscaled value, covering magnitudes beyond
    /// 96 bits.
    Decimal16(VariantDecimal16),
    /// A date, stored as days since 1970-01-01.
    Date(NaiveDate),
    /// A UTC-adjusted timestamp with microsecond precision.
    TimestampMicros(DateTime<Utc>),
    /// A timestamp without timezone, microsecond precision.
    TimestampNtzMicros(NaiveDateTime),
    /// A time of day without timezone, microsecond precision.
    TimeNtz(NaiveTime),
    /// A UTC-adjusted timestamp with nanosecond precision.
    TimestampNanos(DateTime<Utc>),
    /// A timestamp without timezone, nanosecond precision.
    TimestampNtzNanos(NaiveDateTime),
    /// An opaque byte sequence.
    Binary(Vec<u8>),
    /// A UTF-8 string; the builder picks the short or long wire form.
    String(String),
    /// A UUID, carried in RFC 4122 byte order on the wire.
    Uuid(Uuid),
    /// A mapping from field name to child value, in insertion order.
    /// Duplicate names are impossible by construction.
    Object(IndexMap<String, VariantValue>),
    /// An ordered sequence of child values.
    Array(Vec<VariantValue>),
}

impl VariantValue {
    /// Builds a decimal value with the smallest width whose unscaled range
    /// holds `unscaled`.
    pub fn from_decimal(unscaled: i128, scale: u8) -> Result<Self, VariantError> {
        if let Ok(v) = i32::try_from(unscaled) {
            VariantDecimal4::try_new(v, scale).map(Self::Decimal4)
        } else if let Ok(v) = i64::try_from(unscaled) {
            VariantDecimal8::try_new(v, scale).map(Self::Decimal8)
        } else {
            VariantDecimal16::try_new(unscaled, scale).map(Self::Decimal16)
        }
    }

    /// Encodes this value tree, returning `(metadata, value)` byte buffers.
    pub fn encode(&self) -> Result<(Vec<u8>, Vec<u8>), VariantError> {
        crate::builder::encode_variant(self)
    }

    /// Recursively materializes the value a reader points at.
    pub fn try_from_reader(reader: &VariantReader<'_, '_>) -> Result<Self, VariantError> {
        let value = match reader.basic_type() {
            VariantBasicType::ShortString => Self::String(reader.get_string()?.to_string()),
            VariantBasicType::Object => {
                let obj = reader.get_object()?;
                let mut fields = IndexMap::with_capacity(obj.len());
                for i in 0..obj.len() {
                    let name = obj.field_name(i)?.to_string();
                    let child = Self::try_from_reader(&obj.field(i)?)?;
                    fields.insert(name, child);
                }
                Self::Object(fields)
            }
            VariantBasicType::Array => {
                let arr = reader.get_array()?;
                let mut elements = Vec::with_capacity(arr.len());
                for element in arr.iter() {
                    elements.push(Self::try_from_reader(&element?)?);
                }
                Self::Array(elements)
            }
            VariantBasicType::Primitive => match reader.primitive_type()? {
                VariantPrimitiveType::Null => Self::Null,
                VariantPrimitiveType::BooleanTrue => Self::BooleanTrue,
                VariantPrimitiveType::BooleanFalse => Self::BooleanFalse,
                VariantPrimitiveType::Int8 => Self::Int8(reader.get_int8()?),
                VariantPrimitiveType::Int16 => Self::Int16(reader.get_int16()?),
                VariantPrimitiveType::Int32 => Self::Int32(reader.get_int32()?),
                VariantPrimitiveType::Int64 => Self::Int64(reader.get_int64()?),
                VariantPrimitiveType::Float => Self::Float(reader.get_float()?),
                VariantPrimitiveType::Double => Self::Double(reader.get_double()?),
                VariantPrimitiveType::Decimal4 => Self::Decimal4(reader.get_decimal4()?),
                VariantPrimitiveType::Decimal8 => Self::Decimal8(reader.get_decimal8()?),
                VariantPrimitiveType::Decimal16 => Self::Decimal16(reader.get_decimal16()?),
                VariantPrimitiveType::Date => Self::Date(reader.get_date()?),
                VariantPrimitiveType::TimestampMicros => {
                    Self::TimestampMicros(reader.get_timestamp_micros()?)
                }
                VariantPrimitiveType::TimestampNtzMicros => {
                    Self::TimestampNtzMicros(reader.get_timestamp_ntz_micros()?)
                }
                VariantPrimitiveType::TimeNtz => Self::TimeNtz(reader.get_time_ntz()?),
                VariantPrimitiveType::TimestampNanos => {
                    Self::TimestampNanos(reader.get_timestamp_nanos()?)
                }
                VariantPrimitiveType::TimestampNtzNanos => {
                    Self::TimestampNtzNanos(reader.get_timestamp_ntz_nanos()?)
                }
                VariantPrimitiveType::Binary => Self::Binary(reader.get_binary()?.to_vec()),
                VariantPrimitiveType::String => Self::String(reader.get_string()?.to_string()),
                VariantPrimitiveType::Uuid => Self::Uuid(reader.get_uuid()?),
            },
        };
        Ok(value)
    }
}

impl PartialEq for VariantValue {
    fn eq(&self, other: &Self) -> bool {
        use VariantValue::*;
        match (self, other) {
            (Null, Null) | (BooleanTrue, BooleanTrue) | (BooleanFalse, BooleanFalse) => true,
            (Int8(a), Int8(b)) => a == b,
            (Int16(a), Int16(b)) => a == b,
            (Int32(a), Int32(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (Decimal4(a), Decimal4(b)) => a == b,
            (Decimal8(a), Decimal8(b)) => a == b,
            (Decimal16(a), Decimal16(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (TimestampMicros(a), TimestampMicros(b)) => a == b,
            (TimestampNtzMicros(a), TimestampNtzMicros(b)) => a == b,
            (TimeNtz(a), TimeNtz(b)) => a == b,
            (TimestampNanos(a), TimestampNanos(b)) => a == b,
            (TimestampNtzNanos(a), TimestampNtzNanos(b)) => a == b,
            (Binary(a), Binary(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            // IndexMap equality is order-independent
            (Object(a), Object(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for VariantValue {}

impl Hash for VariantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use VariantValue::*;
        discriminant(self).hash(state);
        match self {
            Null | BooleanTrue | BooleanFalse => {}
            Int8(v) => v.hash(state),
            Int16(v) => v.hash(state),
            Int32(v) => v.hash(state),
            Int64(v) => v.hash(state),
            Float(v) => v.to_bits().hash(state),
            Double(v) => v.to_bits().hash(state),
            Decimal4(v) => v.hash(state),
            Decimal8(v) => v.hash(state),
            Decimal16(v) => v.hash(state),
            Date(v) => v.hash(state),
            TimestampMicros(v) => v.hash(state),
            TimestampNtzMicros(v) => v.hash(state),
            TimeNtz(v) => v.hash(state),
            TimestampNanos(v) => v.hash(state),
            TimestampNtzNanos(v) => v.hash(state),
            Binary(v) => v.hash(state),
            String(v) => v.hash(state),
            Uuid(v) => v.hash(state),
            Object(fields) => {
                // Order-independent accumulation so it agrees with equality
                let mut acc = 0u64;
                for (name, value) in fields {
                    let mut entry_hasher = DefaultHasher::new();
                    name.hash(&mut entry_hasher);
                    value.hash(&mut entry_hasher);
                    acc ^= entry_hasher.finish();
                }
                acc.hash(state);
            }
            Array(elements) => elements.hash(state),
        }
    }
}

impl From<()> for VariantValue {
    fn from((): ()) -> Self {
        VariantValue::Null
    }
}

impl From<bool> for VariantValue {
    fn from(value: bool) -> Self {
        match value {
            true => VariantValue::BooleanTrue,
            false => VariantValue::BooleanFalse,
        }
    }
}

impl From<i8> for VariantValue {
    fn from(value: i8) -> Self {
        VariantValue::Int8(value)
    }
}

impl From<i16> for VariantValue {
    fn from(value: i16) -> Self {
        VariantValue::Int16(value)
    }
}

impl From<i32> for VariantValue {
    fn from(value: i32) -> Self {
        VariantValue::Int32(value)
    }
}

impl From<i64> for VariantValue {
    fn from(value: i64) -> Self {
        VariantValue::Int64(value)
    }
}

impl From<f32> for VariantValue {
    fn from(value: f32) -> Self {
        VariantValue::Float(value)
    }
}

impl From<f64> for VariantValue {
    fn from(value: f64) -> Self {
        VariantValue::Double(value)
    }
}

impl From<VariantDecimal4> for VariantValue {
    fn from(value: VariantDecimal4) -> Self {
        VariantValue::Decimal4(value)
    }
}

impl From<VariantDecimal8> for VariantValue {
    fn from(value: VariantDecimal8) -> Self {
        VariantValue::Decimal8(value)
    }
}

impl From<VariantDecimal16> for VariantValue {
    fn from(value: VariantDecimal16) -> Self {
        VariantValue::Decimal16(value)
    }
}

impl From<NaiveDate> for VariantValue {
    fn from(value: NaiveDate) -> Self {
        VariantValue::Date(value)
    }
}

impl From<DateTime<Utc>> for VariantValue {
    fn from(value: DateTime<Utc>) -> Self {
        VariantValue::TimestampMicros(value)
    }
}

impl From<NaiveDateTime> for VariantValue {
    fn from(value: NaiveDateTime) -> Self {
        VariantValue::TimestampNtzMicros(value)
    }
}

impl From<NaiveTime> for VariantValue {
    fn from(value: NaiveTime) -> Self {
        VariantValue::TimeNtz(value)
    }
}

impl From<&[u8]> for VariantValue {
    fn from(value: &[u8]) -> Self {
        VariantValue::Binary(value.to_vec())
    }
}

impl From<Vec<u8>> for VariantValue {
    fn from(value: Vec<u8>) -> Self {
        VariantValue::Binary(value)
    }
}

impl From<&str> for VariantValue {
    fn from(value: &str) -> Self {
        VariantValue::String(value.to_string())
    }
}

impl From<String> for VariantValue {
    fn from(value: String) -> Self {
        VariantValue::String(value)
    }
}

impl From<Uuid> for VariantValue {
    fn from(value: Uuid) -> Self {
        VariantValue::Uuid(value)
    }
}

impl From<IndexMap<String, VariantValue>> for VariantValue {
    fn from(value: IndexMap<String, VariantValue>) -> Self {
        VariantValue::Object(value)
    }
}

impl From<Vec<VariantValue>> for VariantValue {
    fn from(value: Vec<VariantValue>) -> Self {
        VariantValue::Array(value)
    }
}
