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

use std::fmt::Debug;
use std::ops::Range;
use std::slice::SliceIndex;
use std::str;

use crate::VariantError;

#[inline]
pub(crate) fn slice_from_slice<I: SliceIndex<[u8]> + Clone + Debug>(
    bytes: &[u8],
    index: I,
) -> Result<&I::Output, VariantError> {
    bytes.get(index.clone()).ok_or_else(|| {
        VariantError::MalformedEncoding(format!(
            "tried to extract byte(s) {index:?} from {}-byte buffer",
            bytes.len(),
        ))
    })
}

pub(crate) fn array_from_slice<const N: usize>(
    bytes: &[u8],
    offset: usize,
) -> Result<[u8; N], VariantError> {
    let end = offset
        .checked_add(N)
        .ok_or_else(|| overflow_error("array slice bound"))?;
    let bytes = slice_from_slice(bytes, offset..end)?;
    bytes
        .try_into()
        .map_err(|_| VariantError::MalformedEncoding("slice length mismatch".to_string()))
}

pub(crate) fn first_byte_from_slice(slice: &[u8]) -> Result<u8, VariantError> {
    slice
        .first()
        .copied()
        .ok_or_else(|| VariantError::MalformedEncoding("received empty bytes".to_string()))
}

/// Helper to get a `&str` from a slice based on range, validating the bytes
/// as UTF-8.
pub(crate) fn string_from_slice(
    slice: &[u8],
    range: Range<usize>,
) -> Result<&str, VariantError> {
    Ok(str::from_utf8(slice_from_slice(slice, range)?)?)
}

pub(crate) fn overflow_error(what: &str) -> VariantError {
    VariantError::MalformedEncoding(format!("overflow computing {what}"))
}

/// Binary search over an index range whose keys must be looked up through a
/// fallible function (a dictionary probe can hit malformed bytes).
///
/// The outer `Result` carries the first lookup failure, which aborts the
/// search. The inner value follows the `slice::binary_search_by` convention:
/// `Ok(position)` when a key equal to `target` exists, `Err(position)` with
/// the insertion point otherwise.
pub(crate) fn try_binary_search_range_by<K, E, F>(
    range: Range<usize>,
    target: &K,
    mut key_of: F,
) -> Result<Result<usize, usize>, E>
where
    K: Ord,
    F: FnMut(usize) -> Result<K, E>,
{
    use std::cmp::Ordering::{Equal, Greater, Less};

    let mut base = range.start;
    let mut remaining = range.end.saturating_sub(range.start);
    while remaining > 0 {
        let half = remaining / 2;
        let probe = base + half;
        match key_of(probe)?.cmp(target) {
            Equal => return Ok(Ok(probe)),
            Less => {
                // discard the probe and everything below it
                base = probe + 1;
                remaining -= half + 1;
            }
            Greater => remaining = half,
        }
    }

    Ok(Err(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_from_slice_out_of_bounds() {
        let bytes = [0u8, 1, 2];
        assert!(slice_from_slice(&bytes, 0..3).is_ok());
        let err = slice_from_slice(&bytes, 0..4).unwrap_err();
        assert!(matches!(err, VariantError::MalformedEncoding(_)));
    }

    #[test]
    fn test_string_from_slice_invalid_utf8() {
        let bytes = [0xFFu8, 0xFE];
        let err = string_from_slice(&bytes, 0..2).unwrap_err();
        assert!(matches!(err, VariantError::InvalidUtf8(_)));
    }

    #[test]
    fn test_try_binary_search_range_by() {
        let keys = ["apple", "banana", "cherry", "date"];
        let search = |target: &&str| {
            try_binary_search_range_by(0..keys.len(), target, |i| {
                Ok::<_, VariantError>(keys[i])
            })
            .unwrap()
        };

        assert_eq!(search(&"apple"), Ok(0));
        assert_eq!(search(&"date"), Ok(3));
        assert_eq!(search(&"blueberry"), Err(2));
        assert_eq!(search(&"zucchini"), Err(4));
    }
}
