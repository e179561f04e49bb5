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

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::codec::{
    self, basic_type, header_type_name, primitive_type, short_string_len, ArrayHeader,
    ObjectHeader, VariantBasicType, VariantPrimitiveType,
};
use crate::utils::{first_byte_from_slice, slice_from_slice};
use crate::{
    VariantArray, VariantDecimal16, VariantDecimal4, VariantDecimal8, VariantError,
    VariantMetadata, VariantObject, VariantValue,
};

/// A zero-copy view over one encoded variant value.
///
/// The reader borrows the metadata and value buffers (lifetimes `'m` and `'v`
/// respectively) and allocates nothing while traversing; child readers
/// produced by [`VariantObject`] and [`VariantArray`] borrow from the same
/// two buffers and must not outlive them.
///
/// Type inspection is O(1) from the header byte. Each typed accessor asserts
/// the expected type first and fails with [`VariantError::TypeMismatch`]
/// otherwise.
///
/// # Example
/// ```
/// # use variant::VariantReader;
/// // empty dictionary and the short string "Hi"
/// let metadata = [0x01, 0x00, 0x00];
/// let value = [0x09, 0x48, 0x69];
/// let reader = VariantReader::try_new(&metadata, &value)?;
/// assert_eq!(reader.get_string()?, "Hi");
/// assert!(reader.get_int32().is_err());
/// # Ok::<(), variant::VariantError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VariantReader<'m, 'v> {
    metadata: VariantMetadata<'m>,
    value: &'v [u8],
}

impl<'m, 'v> VariantReader<'m, 'v> {
    /// Attempts to interpret a metadata and value buffer pair as a variant
    /// value, parsing the metadata blob first.
    pub fn try_new(metadata: &'m [u8], value: &'v [u8]) -> Result<Self, VariantError> {
        let metadata = VariantMetadata::try_new(metadata)?;
        Self::try_new_with_metadata(metadata, value)
    }

    /// Creates a reader over `value` with an already-parsed metadata
    /// dictionary. Validation is constant-cost: the header byte must name a
    /// known type and carry no reserved bits. Payload bounds are checked
    /// lazily by the accessors.
    pub fn try_new_with_metadata(
        metadata: VariantMetadata<'m>,
        value: &'v [u8],
    ) -> Result<Self, VariantError> {
        let header = first_byte_from_slice(value)?;
        match basic_type(header) {
            VariantBasicType::Primitive => {
                primitive_type(header)?;
            }
            VariantBasicType::ShortString => {}
            VariantBasicType::Object => {
                ObjectHeader::try_new(header)?;
            }
            VariantBasicType::Array => {
                ArrayHeader::try_new(header)?;
            }
        }
        Ok(Self { metadata, value })
    }

    /// The metadata dictionary this value references.
    pub fn metadata(&self) -> &VariantMetadata<'m> {
        &self.metadata
    }

    /// The raw bytes of this value, starting at its header byte.
    pub fn value_bytes(&self) -> &'v [u8] {
        self.value
    }

    // The constructor rejected empty buffers, so the header byte exists.
    fn header(&self) -> u8 {
        self.value[0]
    }

    /// The basic type family of this value.
    pub fn basic_type(&self) -> VariantBasicType {
        basic_type(self.header())
    }

    /// The primitive tag of this value; fails with
    /// [`VariantError::TypeMismatch`] for short strings, objects and arrays.
    pub fn primitive_type(&self) -> Result<VariantPrimitiveType, VariantError> {
        match self.basic_type() {
            VariantBasicType::Primitive => primitive_type(self.header()),
            _ => Err(self.type_mismatch("primitive")),
        }
    }

    /// Human-readable name of the encoded type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        header_type_name(self.header())
    }

    fn type_mismatch(&self, expected: &'static str) -> VariantError {
        VariantError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    fn primitive_payload(
        &self,
        expected: VariantPrimitiveType,
        expected_name: &'static str,
    ) -> Result<&'v [u8], VariantError> {
        if self.basic_type() == VariantBasicType::Primitive
            && primitive_type(self.header())? == expected
        {
            slice_from_slice(self.value, 1..)
        } else {
            Err(self.type_mismatch(expected_name))
        }
    }

    /// Asserts that this value is the null primitive.
    pub fn get_null(&self) -> Result<(), VariantError> {
        self.primitive_payload(VariantPrimitiveType::Null, "null")
            .map(|_| ())
    }

    /// Reads either boolean primitive.
    pub fn get_boolean(&self) -> Result<bool, VariantError> {
        match self.primitive_type() {
            Ok(VariantPrimitiveType::BooleanTrue) => Ok(true),
            Ok(VariantPrimitiveType::BooleanFalse) => Ok(false),
            _ => Err(self.type_mismatch("boolean")),
        }
    }

    pub fn get_int8(&self) -> Result<i8, VariantError> {
        codec::decode_int8(self.primitive_payload(VariantPrimitiveType::Int8, "int8")?)
    }

    pub fn get_int16(&self) -> Result<i16, VariantError> {
        codec::decode_int16(self.primitive_payload(VariantPrimitiveType::Int16, "int16")?)
    }

    pub fn get_int32(&self) -> Result<i32, VariantError> {
        codec::decode_int32(self.primitive_payload(VariantPrimitiveType::Int32, "int32")?)
    }

    pub fn get_int64(&self) -> Result<i64, VariantError> {
        codec::decode_int64(self.primitive_payload(VariantPrimitiveType::Int64, "int64")?)
    }

    pub fn get_float(&self) -> Result<f32, VariantError> {
        codec::decode_float(self.primitive_payload(VariantPrimitiveType::Float, "float")?)
    }

    pub fn get_double(&self) -> Result<f64, VariantError> {
        codec::decode_double(self.primitive_payload(VariantPrimitiveType::Double, "double")?)
    }

    pub fn get_decimal4(&self) -> Result<VariantDecimal4, VariantError> {
        let data = self.primitive_payload(VariantPrimitiveType::Decimal4, "decimal4")?;
        let (integer, scale) = codec::decode_decimal4(data)?;
        VariantDecimal4::try_new(integer, scale)
    }

    pub fn get_decimal8(&self) -> Result<VariantDecimal8, VariantError> {
        let data = self.primitive_payload(VariantPrimitiveType::Decimal8, "decimal8")?;
        let (integer, scale) = codec::decode_decimal8(data)?;
        VariantDecimal8::try_new(integer, scale)
    }

    pub fn get_decimal16(&self) -> Result<VariantDecimal16, VariantError> {
        let data = self.primitive_payload(VariantPrimitiveType::Decimal16, "decimal16")?;
        let (integer, scale) = codec::decode_decimal16(data)?;
        VariantDecimal16::try_new(integer, scale)
    }

    pub fn get_date(&self) -> Result<NaiveDate, VariantError> {
        codec::decode_date(self.primitive_payload(VariantPrimitiveType::Date, "date")?)
    }

    pub fn get_timestamp_micros(&self) -> Result<DateTime<Utc>, VariantError> {
        let data = self.primitive_payload(VariantPrimitiveType::TimestampMicros, "timestamp")?;
        codec::decode_timestamp_micros(data)
    }

    pub fn get_timestamp_ntz_micros(&self) -> Result<NaiveDateTime, VariantError> {
        let data = self.primitive_payload(
            VariantPrimitiveType::TimestampNtzMicros,
            "timestamp without timezone",
        )?;
        codec::decode_timestamp_ntz_micros(data)
    }

    pub fn get_time_ntz(&self) -> Result<NaiveTime, VariantError> {
        let data =
            self.primitive_payload(VariantPrimitiveType::TimeNtz, "time without timezone")?;
        codec::decode_time_ntz(data)
    }

    pub fn get_timestamp_nanos(&self) -> Result<DateTime<Utc>, VariantError> {
        let data = self.primitive_payload(VariantPrimitiveType::TimestampNanos, "timestamp nanos")?;
        codec::decode_timestamp_nanos(data)
    }

    pub fn get_timestamp_ntz_nanos(&self) -> Result<NaiveDateTime, VariantError> {
        let data = self.primitive_payload(
            VariantPrimitiveType::TimestampNtzNanos,
            "timestamp nanos without timezone",
        )?;
        codec::decode_timestamp_ntz_nanos(data)
    }

    pub fn get_binary(&self) -> Result<&'v [u8], VariantError> {
        codec::decode_binary(self.primitive_payload(VariantPrimitiveType::Binary, "binary")?)
    }

    /// Reads a string value of either encoding: the short form with its
    /// length in the header byte, or the String primitive with a four-byte
    /// length prefix.
    pub fn get_string(&self) -> Result<&'v str, VariantError> {
        match self.basic_type() {
            VariantBasicType::ShortString => {
                codec::decode_short_string(self.header(), slice_from_slice(self.value, 1..)?)
            }
            VariantBasicType::Primitive
                if matches!(
                    primitive_type(self.header()),
                    Ok(VariantPrimitiveType::String)
                ) =>
            {
                codec::decode_long_string(slice_from_slice(self.value, 1..)?)
            }
            _ => Err(self.type_mismatch("string")),
        }
    }

    /// Reads the raw bytes of a string value of either encoding, without
    /// UTF-8 validation.
    pub fn get_string_bytes(&self) -> Result<&'v [u8], VariantError> {
        match self.basic_type() {
            VariantBasicType::ShortString => {
                slice_from_slice(self.value, 1..1 + short_string_len(self.header()))
            }
            VariantBasicType::Primitive
                if matches!(
                    primitive_type(self.header()),
                    Ok(VariantPrimitiveType::String)
                ) =>
            {
                codec::decode_binary(slice_from_slice(self.value, 1..)?)
            }
            _ => Err(self.type_mismatch("string")),
        }
    }

    /// Reads a UUID. The 16 payload bytes are stored in RFC 4122 big-endian
    /// order, matching the in-memory order of [`Uuid`], so no byte swapping
    /// takes place.
    pub fn get_uuid(&self) -> Result<Uuid, VariantError> {
        codec::decode_uuid(self.primitive_payload(VariantPrimitiveType::Uuid, "uuid")?)
    }

    /// Opens this value as an object.
    pub fn get_object(&self) -> Result<VariantObject<'m, 'v>, VariantError> {
        VariantObject::try_new(self.metadata, self.value)
    }

    /// Opens this value as an array.
    pub fn get_array(&self) -> Result<VariantArray<'m, 'v>, VariantError> {
        VariantArray::try_new(self.metadata, self.value)
    }

    /// Recursively converts this value into an owned [`VariantValue`] tree.
    pub fn materialize(&self) -> Result<VariantValue, VariantError> {
        VariantValue::try_from_reader(self)
    }
}
