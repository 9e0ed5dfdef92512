use std::{fs::File, path::Path, sync::Arc, time::Instant};

use arrow::{
    array::{ArrayRef, RecordBatch},
    compute::cast,
    datatypes::{DataType, Field, Schema},
};
use itertools::Itertools;
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ProjectionMask};
use rayon::prelude::*;

use crate::{
    ingest::{
        trip_record::{DROPOFF_LOCATION_ID, FARE_AMOUNT, PICKUP_LOCATION_ID, TRIP_DISTANCE},
        RawTripRow, TRIP_COLUMNS,
    },
    TripGraphError,
};

/// reads a parquet trip file fully into memory, keeping only the six trip
/// columns. any other columns in the file are ignored.
///
/// # Errors
///
/// fails with [`TripGraphError::InputReadError`] if the file cannot be opened,
/// is not valid parquet, or is missing one of the trip columns.
pub fn read_trip_rows(path: &Path) -> Result<Vec<RawTripRow>, TripGraphError> {
    let read_error = |message: String| TripGraphError::InputReadError {
        path: path.to_owned(),
        message,
    };
    let start = Instant::now();
    let file = File::open(path).map_err(|e| read_error(e.to_string()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| read_error(format!("failed to read parquet metadata: {e}")))?;

    let missing = TRIP_COLUMNS
        .iter()
        .filter(|c| builder.schema().index_of(c).is_err())
        .collect_vec();
    if !missing.is_empty() {
        let msg = format!("file schema is missing columns [{}]", missing.iter().join(", "));
        return Err(read_error(msg));
    }

    let mask = ProjectionMask::columns(builder.parquet_schema(), TRIP_COLUMNS);
    let reader = builder
        .with_projection(mask)
        .build()
        .map_err(|e| read_error(format!("failed to build parquet reader: {e}")))?;
    let batches = reader
        .collect::<Result<Vec<RecordBatch>, _>>()
        .map_err(|e| read_error(format!("failed to read record batch: {e}")))?;
    log::debug!(
        "read {} record batches from {:?} in {:?}",
        batches.len(),
        path,
        start.elapsed()
    );

    let rows = batches
        .par_iter()
        .map(|batch| -> Result<Vec<RawTripRow>, TripGraphError> {
            let normalized = normalize_batch(batch).map_err(&read_error)?;
            let as_rows: Vec<RawTripRow> = serde_arrow::from_record_batch(&normalized)
                .map_err(|e| read_error(format!("failed to deserialize trip rows: {e}")))?;
            Ok(as_rows)
        })
        .collect::<Result<Vec<_>, TripGraphError>>()?
        .into_iter()
        .flatten()
        .collect_vec();

    log::info!("read {} trip rows from {:?} in {:?}", rows.len(), path, start.elapsed());
    Ok(rows)
}

/// the arrow type each trip column is cast to before row deserialization.
/// timestamps become text so both native timestamp columns and string
/// columns go through the same parser.
fn target_type(column: &str) -> DataType {
    match column {
        PICKUP_LOCATION_ID | DROPOFF_LOCATION_ID => DataType::Int64,
        TRIP_DISTANCE | FARE_AMOUNT => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// reorders the batch to [`TRIP_COLUMNS`] and casts each column to its
/// target type.
fn normalize_batch(batch: &RecordBatch) -> Result<RecordBatch, String> {
    let schema = batch.schema();
    let (fields, columns): (Vec<Field>, Vec<ArrayRef>) = TRIP_COLUMNS
        .iter()
        .map(|name| -> Result<(Field, ArrayRef), String> {
            let idx = schema
                .index_of(name)
                .map_err(|e| format!("column '{name}' not found in batch: {e}"))?;
            let data_type = target_type(name);
            let column = cast(batch.column(idx), &data_type)
                .map_err(|e| format!("column '{name}' cannot be read as {data_type}: {e}"))?;
            Ok((Field::new(*name, data_type, true), column))
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unzip();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| format!("failed to rebuild record batch: {e}"))
}
