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

use crate::codec::{basic_type, header_type_name, ObjectHeader, OffsetSizeBytes, VariantBasicType};
use crate::utils::{
    first_byte_from_slice, overflow_error, slice_from_slice, try_binary_search_range_by,
};
use crate::{VariantError, VariantMetadata, VariantReader};

/// A view over an encoded variant object: a sorted collection of field-id /
/// field-value pairs.
///
/// The payload holds the field count, `num_fields` field ids referencing the
/// metadata dictionary, `num_fields + 1` offsets, and the concatenated field
/// values. Field ids are stored in ascending order, and ids reference sorted
/// dictionary positions, so fields are also sorted by name and
/// [`Self::field_by_name`] can binary search.
///
/// Offsets are starting positions only. A field value's extent comes from its
/// own header (values are self-delimiting), so valid input may hold
/// non-monotonic offsets.
#[derive(Debug, Clone)]
pub struct VariantObject<'m, 'v> {
    metadata: VariantMetadata<'m>,
    value: &'v [u8],
    header: ObjectHeader,
    num_fields: usize,
    field_ids_start: usize,
    offsets_start: usize,
    values_start: usize,
}

impl<'m, 'v> VariantObject<'m, 'v> {
    /// Attempts to interpret `value` as a variant object.
    ///
    /// Validation covers the header byte, the section table derived from it,
    /// and the final offset (which marks the end of the field values). Field
    /// values themselves are validated lazily on access.
    pub fn try_new(
        metadata: VariantMetadata<'m>,
        value: &'v [u8],
    ) -> Result<Self, VariantError> {
        let header_byte = first_byte_from_slice(value)?;
        if basic_type(header_byte) != VariantBasicType::Object {
            return Err(VariantError::TypeMismatch {
                expected: "object",
                found: header_type_name(header_byte),
            });
        }
        let header = ObjectHeader::try_new(header_byte)?;

        let num_fields_size = if header.is_large {
            OffsetSizeBytes::Four
        } else {
            OffsetSizeBytes::One
        };
        let num_fields = num_fields_size.unpack_usize(value, 1, 0)?;

        let field_ids_start = 1 + num_fields_size as usize;
        let offsets_start = num_fields
            .checked_mul(header.field_id_size as usize)
            .and_then(|n| n.checked_add(field_ids_start))
            .ok_or_else(|| overflow_error("object field id array end"))?;
        let values_start = num_fields
            .checked_add(1)
            .and_then(|n| n.checked_mul(header.offset_size as usize))
            .and_then(|n| n.checked_add(offsets_start))
            .ok_or_else(|| overflow_error("object offset array end"))?;
        if values_start > value.len() {
            return Err(VariantError::MalformedEncoding(format!(
                "object header implies {values_start} bytes but the value has {}",
                value.len()
            )));
        }

        let new_self = Self {
            metadata,
            value,
            header,
            num_fields,
            field_ids_start,
            offsets_start,
            values_start,
        };

        // The last offset points one past the end of the last field value.
        // Offsets need not be monotonic, so it must be checked on its own.
        let last_offset = new_self.offset(num_fields)?;
        let end = values_start
            .checked_add(last_offset)
            .ok_or_else(|| overflow_error("object size"))?;
        if end > value.len() {
            return Err(VariantError::MalformedEncoding(format!(
                "last object offset {last_offset} is outside the {} byte value",
                value.len()
            )));
        }

        Ok(new_self)
    }

    fn offset(&self, i: usize) -> Result<usize, VariantError> {
        self.header
            .offset_size
            .unpack_usize(self.value, self.offsets_start, i)
    }

    fn check_index(&self, i: usize) -> Result<(), VariantError> {
        if i >= self.num_fields {
            return Err(VariantError::MalformedEncoding(format!(
                "field index {i} is out of range for an object of {} fields",
                self.num_fields
            )));
        }
        Ok(())
    }

    /// The number of fields in this object.
    pub fn len(&self) -> usize {
        self.num_fields
    }

    /// True if the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.num_fields == 0
    }

    /// The dictionary id of field `i`.
    pub fn field_id(&self, i: usize) -> Result<usize, VariantError> {
        self.check_index(i)?;
        self.header
            .field_id_size
            .unpack_usize(self.value, self.field_ids_start, i)
    }

    /// The name of field `i`, resolved through the metadata dictionary.
    pub fn field_name(&self, i: usize) -> Result<&'m str, VariantError> {
        self.metadata.get(self.field_id(i)?)
    }

    fn field_name_bytes(&self, i: usize) -> Result<&'m [u8], VariantError> {
        self.metadata.get_bytes(self.field_id(i)?)
    }

    /// A reader over the value of field `i`. The child starts at
    /// `values_start + offsets[i]` and delimits itself.
    pub fn field(&self, i: usize) -> Result<VariantReader<'m, 'v>, VariantError> {
        self.check_index(i)?;
        let start = self
            .values_start
            .checked_add(self.offset(i)?)
            .ok_or_else(|| overflow_error("field value offset"))?;
        let value = slice_from_slice(self.value, start..)?;
        VariantReader::try_new_with_metadata(self.metadata, value)
    }

    /// Looks a field up by name with a binary search over the field ids,
    /// resolving each probed id through the dictionary for comparison.
    ///
    /// `Ok(None)` means the field does not exist; `Err` means the search hit
    /// malformed bytes.
    pub fn field_by_name(
        &self,
        name: &str,
    ) -> Result<Option<VariantReader<'m, 'v>>, VariantError> {
        let target = name.as_bytes();
        let search_result =
            try_binary_search_range_by(0..self.num_fields, &target, |i| self.field_name_bytes(i))?;

        search_result.ok().map(|i| self.field(i)).transpose()
    }

    /// Iterates `(name, value)` pairs in stored (name-sorted) order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = Result<(&'m str, VariantReader<'m, 'v>), VariantError>> + '_ {
        (0..self.num_fields).map(move |i| Ok((self.field_name(i)?, self.field(i)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_simple() {
        // {"age": 30, "name": "Bob"} over the dictionary ["age", "name"]
        let metadata_bytes = [
            0x21, 2, 0, 3, 7, b'a', b'g', b'e', b'n', b'a', b'm', b'e',
        ];
        let metadata = VariantMetadata::try_new(&metadata_bytes).unwrap();

        let value = [
            0x02, // object header, all sizes 1
            0x02, // num_fields = 2
            0x00, 0x01, // field ids
            0x00, 0x02, 0x06, // offsets
            0x0C, 0x1E, // int8 30
            0x0D, 0x42, 0x6F, 0x62, // short string "Bob"
        ];

        let obj = VariantObject::try_new(metadata, &value).unwrap();
        assert_eq!(obj.len(), 2);
        assert!(!obj.is_empty());

        assert_eq!(obj.field_name(0).unwrap(), "age");
        assert_eq!(obj.field(0).unwrap().get_int8().unwrap(), 30);
        assert_eq!(obj.field_name(1).unwrap(), "name");
        assert_eq!(obj.field(1).unwrap().get_string().unwrap(), "Bob");

        let name = obj.field_by_name("name").unwrap().unwrap();
        assert_eq!(name.get_string().unwrap(), "Bob");
        let age = obj.field_by_name("age").unwrap().unwrap();
        assert_eq!(age.get_int8().unwrap(), 30);
        assert!(obj.field_by_name("missing").unwrap().is_none());

        let fields: Vec<_> = obj.iter().map(Result::unwrap).collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "age");
        assert_eq!(fields[1].0, "name");
    }

    #[test]
    fn test_object_empty() {
        let metadata_bytes = [0x01, 0, 0];
        let metadata = VariantMetadata::try_new(&metadata_bytes).unwrap();

        let value = [
            0x02, // object header
            0,    // num_fields = 0
            0,    // single offset pointing at the end
        ];

        let obj = VariantObject::try_new(metadata, &value).unwrap();
        assert_eq!(obj.len(), 0);
        assert!(obj.is_empty());
        assert!(obj.field_by_name("anything").unwrap().is_none());
        assert_eq!(obj.iter().count(), 0);
        assert!(obj.field(0).is_err());
    }

    #[test]
    fn test_object_wrong_basic_type() {
        let metadata_bytes = [0x01, 0, 0];
        let metadata = VariantMetadata::try_new(&metadata_bytes).unwrap();

        let err = VariantObject::try_new(metadata, &[0x00]).unwrap_err();
        assert!(matches!(
            err,
            VariantError::TypeMismatch {
                expected: "object",
                found: "null"
            }
        ));
    }

    #[test]
    fn test_object_truncated() {
        let metadata_bytes = [0x01, 0, 0];
        let metadata = VariantMetadata::try_new(&metadata_bytes).unwrap();

        // claims two fields but holds bytes for none
        let value = [0x02, 0x02];
        let err = VariantObject::try_new(metadata, &value).unwrap_err();
        assert!(matches!(err, VariantError::MalformedEncoding(_)));
    }

    #[test]
    fn test_object_bad_last_offset() {
        let metadata_bytes = [
            0x21, 1, 0, 1, b'a', // dictionary ["a"]
        ];
        let metadata = VariantMetadata::try_new(&metadata_bytes).unwrap();

        // last offset claims 9 payload bytes, but only 1 follows
        let value = [0x02, 0x01, 0x00, 0x00, 0x09, 0x00];
        let err = VariantObject::try_new(metadata, &value).unwrap_err();
        assert!(matches!(err, VariantError::MalformedEncoding(_)));
    }
}
