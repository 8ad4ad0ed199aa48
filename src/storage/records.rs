//! Conversion of Arrow record batches into schema-agnostic JSON rows.
//!
//! Lookup tables and metadata files have arbitrary columns, so rows are passed
//! through to clients as ordered `field -> value` maps instead of fixed structs.

use arrow::array::{Array, AsArray, GenericStringArray, OffsetSizeTrait};
use arrow::datatypes::{self as types, DataType};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::{Map, Number, Value};

use super::StorageError;

/// A single record: column name -> value, in column order.
pub type Row = Map<String, Value>;

/// Convert every row of `batch` into a [`Row`].
pub fn batch_to_rows(batch: &RecordBatch) -> Result<Vec<Row>, StorageError> {
    let schema = batch.schema();
    let mut rows: Vec<Row> = (0..batch.num_rows()).map(|_| Map::new()).collect();

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let values = column_values(column.as_ref())?;
        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(field.name().clone(), value);
        }
    }

    Ok(rows)
}

/// Convert the row at `index` of `batch` into a [`Row`].
pub fn batch_row(batch: &RecordBatch, index: usize) -> Result<Row, StorageError> {
    let schema = batch.schema();
    let mut row = Map::new();

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let value = column_values(column.slice(index, 1).as_ref())?
            .into_iter()
            .next()
            .unwrap_or(Value::Null);
        row.insert(field.name().clone(), value);
    }

    Ok(row)
}

/// Convert one column into a value per row.
pub fn column_values(array: &dyn Array) -> Result<Vec<Value>, StorageError> {
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Boolean => {
            let a = array.as_boolean();
            (0..a.len())
                .map(|i| non_null(a, i, || Value::Bool(a.value(i))))
                .collect()
        }
        DataType::Utf8 => strings(array.as_string::<i32>()),
        DataType::LargeUtf8 => strings(array.as_string::<i64>()),
        DataType::Utf8View => {
            let a = array.as_string_view();
            (0..a.len())
                .map(|i| non_null(a, i, || Value::String(a.value(i).to_string())))
                .collect()
        }
        DataType::Int8 => integers::<types::Int8Type>(array),
        DataType::Int16 => integers::<types::Int16Type>(array),
        DataType::Int32 => integers::<types::Int32Type>(array),
        DataType::Int64 => integers::<types::Int64Type>(array),
        DataType::UInt8 => unsigned::<types::UInt8Type>(array),
        DataType::UInt16 => unsigned::<types::UInt16Type>(array),
        DataType::UInt32 => unsigned::<types::UInt32Type>(array),
        DataType::UInt64 => unsigned::<types::UInt64Type>(array),
        DataType::Float16 => {
            let a = array.as_primitive::<types::Float16Type>();
            (0..a.len())
                .map(|i| non_null(a, i, || float(a.value(i).to_f64())))
                .collect()
        }
        DataType::Float32 => floats::<types::Float32Type>(array),
        DataType::Float64 => floats::<types::Float64Type>(array),
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array, &options)?;
            (0..array.len())
                .map(|i| non_null(array, i, || Value::String(formatter.value(i).to_string())))
                .collect()
        }
    };
    Ok(values)
}

fn non_null(array: &dyn Array, i: usize, value: impl FnOnce() -> Value) -> Value {
    if array.is_null(i) {
        Value::Null
    } else {
        value()
    }
}

fn strings<O: OffsetSizeTrait>(a: &GenericStringArray<O>) -> Vec<Value> {
    (0..a.len())
        .map(|i| non_null(a, i, || Value::String(a.value(i).to_string())))
        .collect()
}

fn integers<T>(array: &dyn Array) -> Vec<Value>
where
    T: types::ArrowPrimitiveType,
    T::Native: Into<i64>,
{
    let a = array.as_primitive::<T>();
    (0..a.len())
        .map(|i| {
            non_null(a, i, || {
                let v: i64 = a.value(i).into();
                Value::Number(Number::from(v))
            })
        })
        .collect()
}

fn unsigned<T>(array: &dyn Array) -> Vec<Value>
where
    T: types::ArrowPrimitiveType,
    T::Native: Into<u64>,
{
    let a = array.as_primitive::<T>();
    (0..a.len())
        .map(|i| {
            non_null(a, i, || {
                let v: u64 = a.value(i).into();
                Value::Number(Number::from(v))
            })
        })
        .collect()
}

fn floats<T>(array: &dyn Array) -> Vec<Value>
where
    T: types::ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    let a = array.as_primitive::<T>();
    (0..a.len())
        .map(|i| non_null(a, i, || float(a.value(i).into())))
        .collect()
}

/// JSON has no NaN or infinity; those become null.
fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}
