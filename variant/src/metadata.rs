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

use crate::codec::MetadataHeader;
use crate::utils::{
    first_byte_from_slice, overflow_error, slice_from_slice, try_binary_search_range_by,
};
use crate::VariantError;

/// A view over the variant metadata blob: the versioned dictionary of field
/// name strings that object values reference by id.
///
/// The dictionary layout is a header byte, the dictionary size, `size + 1`
/// monotonically non-decreasing offsets, and the concatenated UTF-8 string
/// bytes. String `i` spans `offsets[i]..offsets[i + 1]` of the string region.
///
/// # Example
/// ```
/// # use variant::VariantMetadata;
/// // dictionary of "cat" and "dog"
/// let bytes = [0x21, 2, 0, 3, 6, b'c', b'a', b't', b'd', b'o', b'g'];
/// let metadata = VariantMetadata::try_new(&bytes)?;
/// assert_eq!(metadata.dictionary_size(), 2);
/// assert_eq!(metadata.get(1)?, "dog");
/// assert_eq!(metadata.find(b"dog"), Some(1));
/// # Ok::<(), variant::VariantError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantMetadata<'m> {
    bytes: &'m [u8],
    header: MetadataHeader,
    dict_size: usize,
    first_string_byte: usize,
}

impl<'m> VariantMetadata<'m> {
    /// Attempts to interpret `bytes` as a variant metadata blob.
    ///
    /// # Validation
    ///
    /// The constructor checks the header (version must be 1, the reserved bit
    /// must be clear), that the buffer covers the dictionary size and offset
    /// array, and that every offset is non-decreasing and within the string
    /// region. UTF-8 validation is deferred to [`Self::get`] so that
    /// byte-level access never fails on non-UTF-8 dictionaries.
    pub fn try_new(bytes: &'m [u8]) -> Result<Self, VariantError> {
        let header = MetadataHeader::try_new(first_byte_from_slice(bytes)?)?;

        // The dictionary size is the first offset-sized word after the header
        let dict_size = header.offset_size.unpack_usize(bytes, 1, 0)?;

        // Header byte, dictionary size, and dict_size + 1 offsets:
        // 1 + offset_size + (dict_size + 1) * offset_size
        // = (dict_size + 2) * offset_size + 1
        let first_string_byte = dict_size
            .checked_add(2)
            .and_then(|n| n.checked_mul(header.offset_size as usize))
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| overflow_error("metadata length"))?;
        if first_string_byte > bytes.len() {
            return Err(VariantError::MalformedEncoding(format!(
                "metadata is {} bytes but its dictionary size implies {first_string_byte}",
                bytes.len()
            )));
        }

        let new_self = Self {
            bytes,
            header,
            dict_size,
            first_string_byte,
        };

        // Every offset must stay inside the string region and never decrease
        let string_region = bytes.len() - first_string_byte;
        let mut prev_offset = 0;
        for i in 0..=dict_size {
            let offset = new_self.get_offset(i)?;
            if offset < prev_offset || offset > string_region {
                return Err(VariantError::MalformedEncoding(format!(
                    "dictionary offset {offset} at index {i} is out of range"
                )));
            }
            prev_offset = offset;
        }

        Ok(new_self)
    }

    /// The number of strings in the dictionary.
    pub fn dictionary_size(&self) -> usize {
        self.dict_size
    }

    /// True if the dictionary holds no strings.
    pub fn is_empty(&self) -> bool {
        self.dict_size == 0
    }

    /// Whether the dictionary strings are in ascending byte order. When set,
    /// [`Self::find`] uses binary search.
    pub fn is_sorted(&self) -> bool {
        self.header.is_sorted
    }

    /// The metadata format version (always 1).
    pub fn version(&self) -> u8 {
        self.header.version
    }

    /// The raw metadata bytes this view was constructed over.
    pub fn as_bytes(&self) -> &'m [u8] {
        self.bytes
    }

    /// Gets an offset array entry by index; entry `i` is the boundary between
    /// string `i - 1` and string `i`.
    fn get_offset(&self, i: usize) -> Result<usize, VariantError> {
        // Skip the header byte and the dictionary size word
        self.header.offset_size.unpack_usize(self.bytes, 1, i + 1)
    }

    /// Gets the raw bytes of dictionary entry `i`. Succeeds for any valid
    /// index whether or not the bytes are UTF-8.
    pub fn get_bytes(&self, i: usize) -> Result<&'m [u8], VariantError> {
        if i >= self.dict_size {
            return Err(VariantError::MalformedEncoding(format!(
                "field id {i} is out of range for a dictionary of {} entries",
                self.dict_size
            )));
        }
        let strings = slice_from_slice(self.bytes, self.first_string_byte..)?;
        slice_from_slice(strings, self.get_offset(i)?..self.get_offset(i + 1)?)
    }

    /// Gets dictionary entry `i` as a string, validating its UTF-8.
    pub fn get(&self, i: usize) -> Result<&'m str, VariantError> {
        Ok(std::str::from_utf8(self.get_bytes(i)?)?)
    }

    /// Finds the index of `field_name` in the dictionary, comparing byte-wise
    /// on UTF-8 bytes. Sorted dictionaries are binary searched; unsorted ones
    /// are scanned.
    pub fn find(&self, field_name: &[u8]) -> Option<usize> {
        if self.header.is_sorted {
            try_binary_search_range_by(0..self.dict_size, &field_name, |i| self.get_bytes(i))
                .ok()?
                .ok()
        } else {
            (0..self.dict_size)
                .find(|&i| matches!(self.get_bytes(i), Ok(bytes) if bytes == field_name))
        }
    }

    /// Iterates the dictionary entries in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'m str, VariantError>> + '_ {
        (0..self.dict_size).map(move |i| self.get(i))
    }
}
