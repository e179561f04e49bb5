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

//! Builders that encode [`VariantValue`] trees into the binary form.
//!
//! Encoding runs in two passes: [`MetadataBuilder::collect`] interns every
//! object key of the tree, [`MetadataBuilder::build`] emits the sorted
//! dictionary together with a remap table from provisional (insertion-order)
//! ids to sorted ids, and [`ValueBuilder::write`] then encodes the value
//! bytes against the sorted dictionary. [`encode_variant`] wires the passes
//! together.

use chrono::Timelike;
use indexmap::{IndexMap, IndexSet};

use crate::codec::{
    array_header, int_size, object_header, primitive_header, short_string_header, write_offset,
    MetadataHeader, VariantPrimitiveType, MAX_SHORT_STRING_BYTES,
};
use crate::{VariantError, VariantValue};

const UNIX_EPOCH_DATE: chrono::NaiveDate = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

/// Collects the unique field names of one or more value trees and emits the
/// metadata dictionary.
///
/// [`Self::add`] interns a name and returns its *provisional* id, assigned in
/// insertion order. [`Self::build`] writes the dictionary with the strings in
/// ascending byte order (`sorted_strings` is always set) and returns a remap
/// table translating provisional ids to sorted ids.
///
/// # Example
/// ```
/// # use variant::MetadataBuilder;
/// let mut builder = MetadataBuilder::new();
/// assert_eq!(builder.add("zebra"), 0);
/// assert_eq!(builder.add("apple"), 1);
/// assert_eq!(builder.add("zebra"), 0); // interned
///
/// let (metadata, remap) = builder.build();
/// // "apple" sorts first
/// assert_eq!(remap, vec![1, 0]);
/// assert_eq!(&metadata[..2], &[0x21, 2]);
/// ```
#[derive(Debug, Default)]
pub struct MetadataBuilder {
    field_names: IndexSet<String>,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `field_name`, returning its provisional id.
    pub fn add(&mut self, field_name: &str) -> u32 {
        let (id, _) = self.field_names.insert_full(field_name.to_string());
        id as u32
    }

    /// The number of distinct field names interned so far.
    pub fn len(&self) -> usize {
        self.field_names.len()
    }

    /// True if no field names were interned.
    pub fn is_empty(&self) -> bool {
        self.field_names.is_empty()
    }

    /// The provisional id of a previously interned name.
    pub(crate) fn field_index(&self, field_name: &str) -> Option<u32> {
        self.field_names.get_index_of(field_name).map(|i| i as u32)
    }

    /// Walks a value tree, interning every object key it contains.
    pub fn collect(&mut self, value: &VariantValue) {
        match value {
            VariantValue::Object(fields) => {
                for (name, child) in fields {
                    self.add(name);
                    self.collect(child);
                }
            }
            VariantValue::Array(elements) => {
                for element in elements {
                    self.collect(element);
                }
            }
            _ => {}
        }
    }

    /// Emits the sorted dictionary bytes and the provisional-to-sorted remap
    /// table.
    pub fn build(&self) -> (Vec<u8>, Vec<u32>) {
        let nkeys = self.field_names.len();

        // Sort ids by the byte order of their strings; equal keys cannot
        // occur because the set already interned them.
        let mut sorted_ids: Vec<u32> = (0..nkeys as u32).collect();
        sorted_ids.sort_by(|&a, &b| {
            self.field_names[a as usize]
                .as_bytes()
                .cmp(self.field_names[b as usize].as_bytes())
        });

        let mut remap = vec![0u32; nkeys];
        for (sorted_id, &provisional_id) in sorted_ids.iter().enumerate() {
            remap[provisional_id as usize] = sorted_id as u32;
        }

        let total_string_bytes: usize = self.field_names.iter().map(|k| k.len()).sum();

        // The offset width must hold both the string region size and the
        // dictionary size word
        let offset_size = int_size(std::cmp::max(total_string_bytes, nkeys));

        let offset_start = 1 + offset_size as usize;
        let string_start = offset_start + (nkeys + 1) * offset_size as usize;
        let mut metadata = Vec::with_capacity(string_start + total_string_bytes);

        metadata.push(MetadataHeader::header_byte(true, offset_size));
        write_offset(&mut metadata, nkeys, offset_size);

        let mut cur_offset = 0;
        for &id in &sorted_ids {
            write_offset(&mut metadata, cur_offset, offset_size);
            cur_offset += self.field_names[id as usize].len();
        }
        write_offset(&mut metadata, cur_offset, offset_size);

        for &id in &sorted_ids {
            metadata.extend_from_slice(self.field_names[id as usize].as_bytes());
        }

        (metadata, remap)
    }
}

/// Encodes [`VariantValue`] trees into value bytes, against a dictionary
/// produced by [`MetadataBuilder`].
///
/// The builder owns its output buffer and a pool of scratch buffers used for
/// container payloads; both are retained across [`Self::finish`] calls so a
/// single builder can encode many top-level values without reallocating.
///
/// Containers are emitted in two phases. Children are first written to a
/// scratch buffer in input order, which fixes the payload length; only then
/// can the minimal field-id width, offset width and `is_large` flag be
/// chosen and the header, count, id table, offset table and payload be
/// appended to the output. Object children are re-packed in ascending
/// field-id order during that copy, so offsets come out monotonic even
/// though readers do not require it.
#[derive(Debug, Default)]
pub struct ValueBuilder {
    buffer: Vec<u8>,
    scratch: Vec<Vec<u8>>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one encoded value. `remap` must be the table returned by the
    /// [`MetadataBuilder::build`] call that produced the metadata this value
    /// will be paired with.
    pub fn write(
        &mut self,
        value: &VariantValue,
        metadata: &MetadataBuilder,
        remap: &[u32],
    ) -> Result<(), VariantError> {
        let mut out = std::mem::take(&mut self.buffer);
        let start = out.len();
        let result = self.append_value(&mut out, value, metadata, remap);
        if result.is_err() {
            // no partial values in the output
            out.truncate(start);
        }
        self.buffer = out;
        result
    }

    /// The number of bytes written so far.
    pub fn offset(&self) -> usize {
        self.buffer.len()
    }

    /// Takes the encoded bytes, leaving the builder (and its scratch pool)
    /// ready for the next value.
    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    fn rent_scratch(&mut self) -> Vec<u8> {
        self.scratch.pop().unwrap_or_default()
    }

    fn return_scratch(&mut self, mut buf: Vec<u8>) {
        buf.clear();
        self.scratch.push(buf);
    }

    fn append_value(
        &mut self,
        out: &mut Vec<u8>,
        value: &VariantValue,
        metadata: &MetadataBuilder,
        remap: &[u32],
    ) -> Result<(), VariantError> {
        use VariantPrimitiveType as P;
        match value {
            VariantValue::Null => out.push(primitive_header(P::Null)),
            VariantValue::BooleanTrue => out.push(primitive_header(P::BooleanTrue)),
            VariantValue::BooleanFalse => out.push(primitive_header(P::BooleanFalse)),
            VariantValue::Int8(v) => {
                out.push(primitive_header(P::Int8));
                out.push(*v as u8);
            }
            VariantValue::Int16(v) => {
                out.push(primitive_header(P::Int16));
                out.extend_from_slice(&v.to_le_bytes());
            }
            VariantValue::Int32(v) => {
                out.push(primitive_header(P::Int32));
                out.extend_from_slice(&v.to_le_bytes());
            }
            VariantValue::Int64(v) => {
                out.push(primitive_header(P::Int64));
                out.extend_from_slice(&v.to_le_bytes());
            }
            VariantValue::Float(v) => {
                out.push(primitive_header(P::Float));
                out.extend_from_slice(&v.to_le_bytes());
            }
            VariantValue::Double(v) => {
                out.push(primitive_header(P::Double));
                out.extend_from_slice(&v.to_le_bytes());
            }
            VariantValue::Decimal4(d) => {
                out.push(primitive_header(P::Decimal4));
                out.push(d.scale());
                out.extend_from_slice(&d.integer().to_le_bytes());
            }
            VariantValue::Decimal8(d) => {
                out.push(primitive_header(P::Decimal8));
                out.push(d.scale());
                out.extend_from_slice(&d.integer().to_le_bytes());
            }
            VariantValue::Decimal16(d) => {
                out.push(primitive_header(P::Decimal16));
                out.push(d.scale());
                out.extend_from_slice(&d.integer().to_le_bytes());
            }
            VariantValue::Date(v) => {
                out.push(primitive_header(P::Date));
                let days_since_epoch =
                    v.signed_duration_since(UNIX_EPOCH_DATE).num_days() as i32;
                out.extend_from_slice(&days_since_epoch.to_le_bytes());
            }
            VariantValue::TimestampMicros(v) => {
                out.push(primitive_header(P::TimestampMicros));
                out.extend_from_slice(&v.timestamp_micros().to_le_bytes());
            }
            VariantValue::TimestampNtzMicros(v) => {
                out.push(primitive_header(P::TimestampNtzMicros));
                out.extend_from_slice(&v.and_utc().timestamp_micros().to_le_bytes());
            }
            VariantValue::TimeNtz(v) => {
                out.push(primitive_header(P::TimeNtz));
                let micros_since_midnight = v.num_seconds_from_midnight() as i64 * 1_000_000
                    + (v.nanosecond() / 1_000) as i64;
                out.extend_from_slice(&micros_since_midnight.to_le_bytes());
            }
            VariantValue::TimestampNanos(v) => {
                out.push(primitive_header(P::TimestampNanos));
                let nanos = v.timestamp_nanos_opt().ok_or_else(|| {
                    VariantError::MalformedEncoding(format!(
                        "timestamp {v} is outside the representable nanosecond range"
                    ))
                })?;
                out.extend_from_slice(&nanos.to_le_bytes());
            }
            VariantValue::TimestampNtzNanos(v) => {
                out.push(primitive_header(P::TimestampNtzNanos));
                let nanos = v.and_utc().timestamp_nanos_opt().ok_or_else(|| {
                    VariantError::MalformedEncoding(format!(
                        "timestamp {v} is outside the representable nanosecond range"
                    ))
                })?;
                out.extend_from_slice(&nanos.to_le_bytes());
            }
            VariantValue::Binary(v) => {
                out.push(primitive_header(P::Binary));
                out.extend_from_slice(&(v.len() as u32).to_le_bytes());
                out.extend_from_slice(v);
            }
            VariantValue::String(s) => append_string(out, s),
            VariantValue::Uuid(v) => {
                out.push(primitive_header(P::Uuid));
                // RFC 4122 byte order, the sole big-endian payload
                out.extend_from_slice(v.as_bytes());
            }
            VariantValue::Object(fields) => self.append_object(out, fields, metadata, remap)?,
            VariantValue::Array(elements) => {
                self.append_array(out, elements, metadata, remap)?
            }
        }
        Ok(())
    }

    fn append_object(
        &mut self,
        out: &mut Vec<u8>,
        fields: &IndexMap<String, VariantValue>,
        metadata: &MetadataBuilder,
        remap: &[u32],
    ) -> Result<(), VariantError> {
        // On the error paths the rented buffer is simply dropped; the pool
        // only ever holds buffers from completed containers.
        let mut payload = self.rent_scratch();

        // Phase one: encode children in input order, recording each child's
        // sorted field id and byte range within the scratch buffer
        let mut entries: Vec<(u32, usize, usize)> = Vec::with_capacity(fields.len());
        for (name, child) in fields {
            let field_id = lookup_field_id(name, metadata, remap)?;
            let start = payload.len();
            self.append_value(&mut payload, child, metadata, remap)?;
            entries.push((field_id, start, payload.len()));
        }

        // Phase two: the payload length is now known, so the minimal widths
        // can be chosen and the container emitted in sorted-id order
        entries.sort_by_key(|&(field_id, _, _)| field_id);

        let payload_len: usize = entries.iter().map(|&(_, start, end)| end - start).sum();
        let max_id = entries.iter().map(|&(id, _, _)| id).max().unwrap_or(0);
        let field_id_size = int_size(max_id as usize);
        let offset_size = int_size(payload_len);
        let is_large = entries.len() > u8::MAX as usize;

        out.push(object_header(is_large, field_id_size, offset_size));
        write_count(out, is_large, entries.len());
        for &(field_id, _, _) in &entries {
            write_offset(out, field_id as usize, field_id_size);
        }
        let mut cur_offset = 0;
        for &(_, start, end) in &entries {
            write_offset(out, cur_offset, offset_size);
            cur_offset += end - start;
        }
        write_offset(out, cur_offset, offset_size);
        for &(_, start, end) in &entries {
            out.extend_from_slice(&payload[start..end]);
        }

        self.return_scratch(payload);
        Ok(())
    }

    fn append_array(
        &mut self,
        out: &mut Vec<u8>,
        elements: &[VariantValue],
        metadata: &MetadataBuilder,
        remap: &[u32],
    ) -> Result<(), VariantError> {
        let mut payload = self.rent_scratch();

        let mut offsets = Vec::with_capacity(elements.len() + 1);
        offsets.push(0);
        for element in elements {
            self.append_value(&mut payload, element, metadata, remap)?;
            offsets.push(payload.len());
        }

        let offset_size = int_size(payload.len());
        let is_large = elements.len() > u8::MAX as usize;

        out.push(array_header(is_large, offset_size));
        write_count(out, is_large, elements.len());
        for &offset in &offsets {
            write_offset(out, offset, offset_size);
        }
        out.extend_from_slice(&payload);

        self.return_scratch(payload);
        Ok(())
    }
}

fn lookup_field_id(
    name: &str,
    metadata: &MetadataBuilder,
    remap: &[u32],
) -> Result<u32, VariantError> {
    let provisional = metadata.field_index(name).ok_or_else(|| {
        VariantError::MalformedEncoding(format!(
            "field name {name:?} was not collected into the metadata dictionary"
        ))
    })?;
    remap.get(provisional as usize).copied().ok_or_else(|| {
        VariantError::MalformedEncoding(format!(
            "field id {provisional} is missing from the remap table"
        ))
    })
}

fn write_count(buf: &mut Vec<u8>, is_large: bool, count: usize) {
    if is_large {
        buf.extend_from_slice(&(count as u32).to_le_bytes());
    } else {
        buf.push(count as u8);
    }
}

fn append_string(out: &mut Vec<u8>, value: &str) {
    if value.len() <= MAX_SHORT_STRING_BYTES {
        out.push(short_string_header(value.len()));
    } else {
        out.push(primitive_header(VariantPrimitiveType::String));
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    }
    out.extend_from_slice(value.as_bytes());
}

/// Encodes a value tree, returning the `(metadata, value)` byte buffer pair.
///
/// # Example
/// ```
/// # use variant::{encode_variant, VariantReader, VariantValue};
/// let (metadata, value) = encode_variant(&VariantValue::from(42i8))?;
/// let reader = VariantReader::try_new(&metadata, &value)?;
/// assert_eq!(reader.get_int8()?, 42);
/// # Ok::<(), variant::VariantError>(())
/// ```
pub fn encode_variant(value: &VariantValue) -> Result<(Vec<u8>, Vec<u8>), VariantError> {
    let mut metadata = MetadataBuilder::new();
    metadata.collect(value);
    let (metadata_bytes, remap) = metadata.build();

    let mut builder = ValueBuilder::new();
    builder.write(value, &metadata, &remap)?;
    Ok((metadata_bytes, builder.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariantReader;
    use indexmap::IndexMap;

    fn object(fields: Vec<(&str, VariantValue)>) -> VariantValue {
        VariantValue::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect::<IndexMap<_, _>>(),
        )
    }

    fn round_trip(value: &VariantValue) -> VariantValue {
        let (metadata, bytes) = encode_variant(value).unwrap();
        VariantReader::try_new(&metadata, &bytes)
            .unwrap()
            .materialize()
            .unwrap()
    }

    #[test]
    fn test_metadata_builder_sorts_and_remaps() {
        let mut builder = MetadataBuilder::new();
        assert_eq!(builder.add("zebra"), 0);
        assert_eq!(builder.add("apple"), 1);
        assert_eq!(builder.add("banana"), 2);
        assert_eq!(builder.add("apple"), 1);
        assert_eq!(builder.len(), 3);

        let (metadata, remap) = builder.build();
        assert_eq!(remap, vec![2, 0, 1]);

        let parsed = crate::VariantMetadata::try_new(&metadata).unwrap();
        assert!(parsed.is_sorted());
        assert_eq!(parsed.dictionary_size(), 3);
        assert_eq!(parsed.get(0).unwrap(), "apple");
        assert_eq!(parsed.get(1).unwrap(), "banana");
        assert_eq!(parsed.get(2).unwrap(), "zebra");
        assert_eq!(parsed.find(b"zebra"), Some(2));
    }

    #[test]
    fn test_metadata_builder_empty() {
        let (metadata, remap) = MetadataBuilder::new().build();
        assert!(remap.is_empty());

        let parsed = crate::VariantMetadata::try_new(&metadata).unwrap();
        assert_eq!(parsed.dictionary_size(), 0);
        assert!(parsed.is_sorted());
    }

    #[test]
    fn test_simple_primitives_round_trip() {
        let values = vec![
            VariantValue::Null,
            VariantValue::BooleanTrue,
            VariantValue::BooleanFalse,
            VariantValue::Int8(42),
            VariantValue::Int8(-128),
            VariantValue::Int16(1234),
            VariantValue::Int32(123456),
            VariantValue::Int64(1234567890123456789),
            VariantValue::Float(1.5),
            VariantValue::Double(2.5),
            VariantValue::from("hello"),
            VariantValue::from("x".repeat(200).as_str()),
            VariantValue::Binary(b"binary data".to_vec()),
        ];
        for value in values {
            assert_eq!(round_trip(&value), value, "round trip failed for {value:?}");
        }
    }

    #[test]
    fn test_object_fields_emitted_in_sorted_order() {
        let value = object(vec![
            ("zebra", VariantValue::from("stripes")),
            ("apple", VariantValue::from("red")),
            ("banana", VariantValue::from("yellow")),
        ]);
        let (metadata, bytes) = encode_variant(&value).unwrap();

        let reader = VariantReader::try_new(&metadata, &bytes).unwrap();
        let obj = reader.get_object().unwrap();
        assert_eq!(obj.len(), 3);

        // ids ascend and resolve to names in ascending byte order
        assert_eq!(obj.field_id(0).unwrap(), 0);
        assert_eq!(obj.field_id(1).unwrap(), 1);
        assert_eq!(obj.field_id(2).unwrap(), 2);
        assert_eq!(obj.field_name(0).unwrap(), "apple");
        assert_eq!(obj.field_name(1).unwrap(), "banana");
        assert_eq!(obj.field_name(2).unwrap(), "zebra");
        assert_eq!(
            obj.field_by_name("zebra")
                .unwrap()
                .unwrap()
                .get_string()
                .unwrap(),
            "stripes"
        );
    }

    #[test]
    fn test_object_known_bytes() {
        // {"age": 30, "name": "Bob"}
        let value = object(vec![
            ("age", VariantValue::Int8(30)),
            ("name", VariantValue::from("Bob")),
        ]);
        let (metadata, bytes) = encode_variant(&value).unwrap();

        assert_eq!(
            metadata,
            vec![0x21, 2, 0, 3, 7, b'a', b'g', b'e', b'n', b'a', b'm', b'e']
        );
        assert_eq!(
            bytes,
            vec![0x02, 0x02, 0x00, 0x01, 0x00, 0x02, 0x06, 0x0C, 0x1E, 0x0D, 0x42, 0x6F, 0x62]
        );
    }

    #[test]
    fn test_array_known_bytes() {
        // [42, "hi", null]
        let value = VariantValue::Array(vec![
            VariantValue::Int8(42),
            VariantValue::from("hi"),
            VariantValue::Null,
        ]);
        let (metadata, bytes) = encode_variant(&value).unwrap();

        assert_eq!(metadata, vec![0x21, 0, 0]);
        assert_eq!(
            bytes,
            vec![0x03, 0x03, 0x00, 0x02, 0x05, 0x06, 0x0C, 0x2A, 0x09, 0x68, 0x69, 0x00]
        );
    }

    #[test]
    fn test_nested_containers_round_trip() {
        let value = object(vec![
            (
                "users",
                VariantValue::Array(vec![
                    object(vec![
                        ("name", VariantValue::from("Alice")),
                        (
                            "scores",
                            VariantValue::Array(vec![
                                VariantValue::Int8(95),
                                VariantValue::Int8(87),
                            ]),
                        ),
                    ]),
                    object(vec![("name", VariantValue::from("Bob"))]),
                ]),
            ),
            ("empty", object(vec![])),
            ("list", VariantValue::Array(vec![])),
        ]);
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_large_object_uses_four_byte_count() {
        let fields: Vec<(String, VariantValue)> = (0..256)
            .map(|i| (format!("{i:03}"), VariantValue::Int32(i)))
            .collect();
        let value = VariantValue::Object(fields.into_iter().collect());

        let (metadata, bytes) = encode_variant(&value).unwrap();
        let reader = VariantReader::try_new(&metadata, &bytes).unwrap();
        let obj = reader.get_object().unwrap();
        assert_eq!(obj.len(), 256);

        // is_large lives in value-header bit 4
        assert_ne!(bytes[0] & 0x40, 0);
        assert_eq!(obj.field_name(0).unwrap(), "000");
        assert_eq!(
            obj.field_by_name("255")
                .unwrap()
                .unwrap()
                .get_int32()
                .unwrap(),
            255
        );

        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_large_array_offsets() {
        // 128 two-byte elements plus a header push payload past 255 bytes,
        // forcing two-byte offsets while the count stays one byte
        let value =
            VariantValue::Array((0..128).map(|_| VariantValue::Int8(1)).collect::<Vec<_>>());
        let (metadata, bytes) = encode_variant(&value).unwrap();

        let reader = VariantReader::try_new(&metadata, &bytes).unwrap();
        let arr = reader.get_array().unwrap();
        assert_eq!(arr.len(), 128);
        assert_eq!(bytes[0], 0x07); // offset_size 2, not large
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_builder_reuse_keeps_no_state() {
        let mut metadata = MetadataBuilder::new();
        let first = object(vec![("a", VariantValue::Int8(1))]);
        metadata.collect(&first);
        let (metadata_bytes, remap) = metadata.build();

        let mut builder = ValueBuilder::new();
        builder.write(&first, &metadata, &remap).unwrap();
        let first_bytes = builder.finish();

        // The same builder encodes an unrelated value from a clean buffer
        builder
            .write(&VariantValue::Int8(7), &metadata, &remap)
            .unwrap();
        let second_bytes = builder.finish();

        assert_eq!(second_bytes, vec![0x0C, 0x07]);
        let reader = VariantReader::try_new(&metadata_bytes, &first_bytes).unwrap();
        assert_eq!(
            reader
                .get_object()
                .unwrap()
                .field_by_name("a")
                .unwrap()
                .unwrap()
                .get_int8()
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_uncollected_field_name_fails() {
        let metadata = MetadataBuilder::new();
        let (_, remap) = metadata.build();

        let mut builder = ValueBuilder::new();
        let err = builder
            .write(
                &object(vec![("a", VariantValue::Int8(1))]),
                &metadata,
                &remap,
            )
            .unwrap_err();
        assert!(matches!(err, VariantError::MalformedEncoding(_)));
    }

    #[test]
    fn test_short_string_boundary() {
        let at_limit = VariantValue::from("a".repeat(63).as_str());
        let (_, bytes) = encode_variant(&at_limit).unwrap();
        assert_eq!(bytes[0], short_string_header(63));

        let over_limit = VariantValue::from("a".repeat(64).as_str());
        let (_, bytes) = encode_variant(&over_limit).unwrap();
        assert_eq!(bytes[0], primitive_header(VariantPrimitiveType::String));
        assert_eq!(&bytes[1..5], &64u32.to_le_bytes());
    }

    #[test]
    fn test_empty_string_is_short() {
        let (_, bytes) = encode_variant(&VariantValue::from("")).unwrap();
        assert_eq!(bytes, vec![short_string_header(0)]);
    }
}
