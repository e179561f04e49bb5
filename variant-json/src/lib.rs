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

//! JSON conversions for the [`variant`] binary encoding.
//!
//! - [`json_to_variant`]: encode JSON text straight into the
//!   `(metadata, value)` binary form.
//! - [`json_to_value`]: parse JSON text into an owned
//!   [`VariantValue`](variant::VariantValue) tree.
//! - [`variant_to_json`] / [`variant_to_json_string`]: walk an encoded blob
//!   and emit JSON.
//! - [`value_to_json`] / [`value_to_json_string`]: the same for owned trees.
//!
//! ```
//! use variant::VariantReader;
//! use variant_json::{json_to_variant, variant_to_json_string};
//!
//! let (metadata, value) = json_to_variant(r#"{"name": "Alice", "scores": [95, 87]}"#)?;
//! let reader = VariantReader::try_new(&metadata, &value)?;
//! assert_eq!(
//!     variant_to_json_string(&reader)?,
//!     r#"{"name":"Alice","scores":[95,87]}"#
//! );
//! # Ok::<(), variant::VariantError>(())
//! ```

mod from_json;
mod to_json;

pub use from_json::{json_to_value, json_to_variant};
pub use to_json::{value_to_json, value_to_json_string, variant_to_json, variant_to_json_string};
