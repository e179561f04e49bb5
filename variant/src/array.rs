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

use crate::codec::{basic_type, header_type_name, ArrayHeader, OffsetSizeBytes, VariantBasicType};
use crate::utils::{first_byte_from_slice, overflow_error, slice_from_slice};
use crate::{VariantError, VariantMetadata, VariantReader};

/// A view over an encoded variant array: an ordered sequence of variant
/// values.
///
/// The payload holds the element count, `num_elements + 1` offsets, and the
/// concatenated element bytes. As with objects, offsets are starting
/// positions and each element delimits itself through its own header.
#[derive(Debug, Clone)]
pub struct VariantArray<'m, 'v> {
    metadata: VariantMetadata<'m>,
    value: &'v [u8],
    header: ArrayHeader,
    num_elements: usize,
    offsets_start: usize,
    values_start: usize,
}

impl<'m, 'v> VariantArray<'m, 'v> {
    /// Attempts to interpret `value` as a variant array. Validation covers
    /// the header byte, the offset table bounds and the final offset;
    /// elements are validated lazily on access.
    pub fn try_new(
        metadata: VariantMetadata<'m>,
        value: &'v [u8],
    ) -> Result<Self, VariantError> {
        let header_byte = first_byte_from_slice(value)?;
        if basic_type(header_byte) != VariantBasicType::Array {
            return Err(VariantError::TypeMismatch {
                expected: "array",
                found: header_type_name(header_byte),
            });
        }
        let header = ArrayHeader::try_new(header_byte)?;

        let num_elements_size = if header.is_large {
            OffsetSizeBytes::Four
        } else {
            OffsetSizeBytes::One
        };
        let num_elements = num_elements_size.unpack_usize(value, 1, 0)?;

        let offsets_start = 1 + num_elements_size as usize;
        let values_start = num_elements
            .checked_add(1)
            .and_then(|n| n.checked_mul(header.offset_size as usize))
            .and_then(|n| n.checked_add(offsets_start))
            .ok_or_else(|| overflow_error("array offset array end"))?;
        if values_start > value.len() {
            return Err(VariantError::MalformedEncoding(format!(
                "array header implies {values_start} bytes but the value has {}",
                value.len()
            )));
        }

        let new_self = Self {
            metadata,
            value,
            header,
            num_elements,
            offsets_start,
            values_start,
        };

        let last_offset = new_self.offset(num_elements)?;
        let end = values_start
            .checked_add(last_offset)
            .ok_or_else(|| overflow_error("array size"))?;
        if end > value.len() {
            return Err(VariantError::MalformedEncoding(format!(
                "last array offset {last_offset} is outside the {} byte value",
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

    /// The number of elements in this array.
    pub fn len(&self) -> usize {
        self.num_elements
    }

    /// True if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.num_elements == 0
    }

    /// A reader over element `i`.
    pub fn element(&self, i: usize) -> Result<VariantReader<'m, 'v>, VariantError> {
        if i >= self.num_elements {
            return Err(VariantError::MalformedEncoding(format!(
                "element index {i} is out of range for an array of {} elements",
                self.num_elements
            )));
        }
        let start = self
            .values_start
            .checked_add(self.offset(i)?)
            .ok_or_else(|| overflow_error("element offset"))?;
        let value = slice_from_slice(self.value, start..)?;
        VariantReader::try_new_with_metadata(self.metadata, value)
    }

    /// Iterates the elements in order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = Result<VariantReader<'m, 'v>, VariantError>> + '_ {
        (0..self.num_elements).map(move |i| self.element(i))
    }
}
