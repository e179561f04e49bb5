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

//! The error type shared by every fallible operation in this crate.

use std::str::Utf8Error;

use thiserror::Error;

/// Error raised when reading, building, or converting variant data.
///
/// All failures are deterministic and reported by the call that detected
/// them; nothing is retried or recovered locally, and no partial results are
/// returned.
#[derive(Debug, Error)]
pub enum VariantError {
    /// A buffer was too short, an offset pointed out of range, a size field
    /// held an illegal width, or reserved header bits were set.
    #[error("Malformed variant: {0}")]
    MalformedEncoding(String),

    /// The metadata header carried a version other than 1.
    #[error("Unsupported metadata version: {0}")]
    UnsupportedVersion(u8),

    /// A primitive value header named a type id that is not assigned.
    #[error("Unsupported primitive type id: {0}")]
    UnsupportedPrimitive(u8),

    /// An accessor expected one type but the value encodes another.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the accessor was asked for.
        expected: &'static str,
        /// The type actually encoded in the value.
        found: &'static str,
    },

    /// A 16-byte decimal was asked for its 96-bit view but its unscaled
    /// magnitude does not fit. [`VariantDecimal16::try_compact`] returns
    /// `None` instead of failing.
    ///
    /// [`VariantDecimal16::try_compact`]: crate::VariantDecimal16::try_compact
    #[error("Decimal overflow: {0}")]
    DecimalOverflow(String),

    /// JSON text failed to parse, or held a number representable neither as
    /// an `i64` nor as a finite `f64`.
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    /// NaN and the infinities have no JSON encoding.
    #[error("{0} cannot be represented in JSON")]
    UnrepresentableFloat(&'static str),

    /// A dictionary or value string was not valid UTF-8. Byte-level accessors
    /// succeed regardless.
    #[error("Invalid UTF-8 string: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// The output sink failed while writing JSON.
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
}
