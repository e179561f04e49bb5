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

//! Implementation of the [Variant Binary Encoding] from [Apache Parquet]: a
//! self-describing format for JSON-like semi-structured values, encoded as a
//! shared *metadata* dictionary of field names plus a per-value *value* blob.
//!
//! ## Main APIs
//! - [`VariantReader`]: zero-copy traversal of an encoded value, with
//!   [`VariantObject`] and [`VariantArray`] for the container kinds and
//!   [`VariantMetadata`] for the dictionary.
//! - [`VariantValue`]: an owned value tree, produced by
//!   [`VariantReader::materialize`] and consumed by [`encode_variant`].
//! - [`MetadataBuilder`] / [`ValueBuilder`]: the lower-level encoding pieces,
//!   for callers that encode many values against one dictionary.
//!
//! JSON conversions live in the companion `variant-json` crate.
//!
//! ```
//! use variant::{encode_variant, VariantReader, VariantValue};
//!
//! let mut fields = indexmap::IndexMap::new();
//! fields.insert("age".to_string(), VariantValue::Int8(30));
//! fields.insert("name".to_string(), VariantValue::from("Bob"));
//!
//! let (metadata, value) = encode_variant(&VariantValue::Object(fields))?;
//!
//! let reader = VariantReader::try_new(&metadata, &value)?;
//! let object = reader.get_object()?;
//! let name = object.field_by_name("name")?.expect("name is present");
//! assert_eq!(name.get_string()?, "Bob");
//! # Ok::<(), variant::VariantError>(())
//! ```
//!
//! [Variant Binary Encoding]: https://github.com/apache/parquet-format/blob/master/VariantEncoding.md
//! [Apache Parquet]: https://parquet.apache.org/

mod array;
mod builder;
mod codec;
mod decimal;
mod error;
mod metadata;
mod object;
mod reader;
mod utils;
mod value;

pub use array::VariantArray;
pub use builder::{encode_variant, MetadataBuilder, ValueBuilder};
pub use codec::{VariantBasicType, VariantPrimitiveType};
pub use decimal::{VariantDecimal16, VariantDecimal4, VariantDecimal8, MAX_DECIMAL_SCALE};
pub use error::VariantError;
pub use metadata::VariantMetadata;
pub use object::VariantObject;
pub use reader::VariantReader;
pub use value::VariantValue;
