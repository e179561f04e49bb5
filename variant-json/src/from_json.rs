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

//! Parsing JSON text into variant form.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use variant::{MetadataBuilder, ValueBuilder, VariantError, VariantValue};

/// Parses JSON text into an owned [`VariantValue`] tree.
///
/// Numbers that parse as `i64` take the narrowest of Int8/Int16/Int32/Int64
/// that fits; all other numbers become Double. Object keys keep their
/// appearance order, and a duplicated key keeps its last value.
///
/// # Example
/// ```
/// # use variant::VariantValue;
/// # use variant_json::json_to_value;
/// assert_eq!(json_to_value("127")?, VariantValue::Int8(127));
/// assert_eq!(json_to_value("128")?, VariantValue::Int16(128));
/// assert_eq!(json_to_value("1.5")?, VariantValue::Double(1.5));
/// # Ok::<(), variant::VariantError>(())
/// ```
pub fn json_to_value(json: &str) -> Result<VariantValue, VariantError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| VariantError::MalformedJson(e.to_string()))?;
    build_value(&value)
}

/// Encodes JSON text directly into a `(metadata, value)` byte buffer pair.
///
/// The input is walked twice: the first pass interns every object key into
/// the metadata dictionary, the second writes the value bytes against the
/// sorted dictionary.
///
/// # Example
/// ```
/// # use variant::VariantReader;
/// # use variant_json::json_to_variant;
/// let (metadata, value) = json_to_variant(r#"{"age": 30, "name": "Bob"}"#)?;
/// let reader = VariantReader::try_new(&metadata, &value)?;
/// let object = reader.get_object()?;
/// assert_eq!(object.field_by_name("age")?.unwrap().get_int8()?, 30);
/// # Ok::<(), variant::VariantError>(())
/// ```
pub fn json_to_variant(json: &str) -> Result<(Vec<u8>, Vec<u8>), VariantError> {
    let value = json_to_value(json)?;

    // Pass one: collect field names into the dictionary
    let mut metadata = MetadataBuilder::new();
    metadata.collect(&value);
    let (metadata_bytes, remap) = metadata.build();

    // Pass two: emit value bytes against the sorted dictionary
    let mut builder = ValueBuilder::new();
    builder.write(&value, &metadata, &remap)?;
    Ok((metadata_bytes, builder.finish()))
}

fn build_value(json: &Value) -> Result<VariantValue, VariantError> {
    let value = match json {
        Value::Null => VariantValue::Null,
        Value::Bool(true) => VariantValue::BooleanTrue,
        Value::Bool(false) => VariantValue::BooleanFalse,
        Value::Number(n) => number_to_value(n)?,
        Value::String(s) => VariantValue::String(s.clone()),
        Value::Array(elements) => VariantValue::Array(
            elements
                .iter()
                .map(build_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(fields) => {
            let mut object = IndexMap::with_capacity(fields.len());
            for (key, value) in fields {
                object.insert(key.clone(), build_value(value)?);
            }
            VariantValue::Object(object)
        }
    };
    Ok(value)
}

fn number_to_value(n: &Number) -> Result<VariantValue, VariantError> {
    if let Some(i) = n.as_i64() {
        // The narrowest signed width that fits
        let value = if let Ok(v) = i8::try_from(i) {
            VariantValue::Int8(v)
        } else if let Ok(v) = i16::try_from(i) {
            VariantValue::Int16(v)
        } else if let Ok(v) = i32::try_from(i) {
            VariantValue::Int32(v)
        } else {
            VariantValue::Int64(i)
        };
        return Ok(value);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => Ok(VariantValue::Double(f)),
        _ => Err(VariantError::MalformedJson(format!(
            "failed to parse {n} as a number"
        ))),
    }
}
