use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveTime};

use bdg_report::dataset::Dataset;
use bdg_report::loader::LoadedTable;

/// Millisecond timestamp for midnight of an ISO date
#[must_use]
pub fn day_ms(date: &str) -> i64 {
    date.parse::<NaiveDate>()
        .unwrap()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// Millisecond timestamp for an ISO date at a given time of day
#[must_use]
pub fn time_ms(date: &str, hour: u32, minute: u32, second: u32) -> i64 {
    date.parse::<NaiveDate>()
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn timestamp_field(name: &str) -> Field {
    Field::new(name, DataType::Timestamp(TimeUnit::Millisecond, None), true)
}

fn timestamp_array(dates: &[Option<&str>]) -> ArrayRef {
    Arc::new(TimestampMillisecondArray::from(
        dates
            .iter()
            .map(|date| date.map(day_ms))
            .collect::<Vec<_>>(),
    ))
}

fn int_array(values: &[Option<i64>]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

fn string_array(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

/// Wrap batches as a loaded table without touching the filesystem
#[must_use]
pub fn table_from(name: &str, dataset: Dataset, batches: Vec<RecordBatch>) -> LoadedTable {
    LoadedTable {
        name: name.to_string(),
        dataset,
        batches,
        file_date: None,
    }
}

/// Copy of `batch` without the named column, for exercising degraded
/// sections
#[must_use]
pub fn drop_column(batch: &RecordBatch, name: &str) -> RecordBatch {
    let keep: Vec<usize> = batch
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| field.name() != name)
        .map(|(index, _)| index)
        .collect();
    batch.project(&keep).unwrap()
}

/// A small loan-application table in the shape the global and rejection
/// views read.
///
/// Eight applications across 2023: six form dates inside January..March,
/// one unparseable form date (null) and one in December. Two rows carry a
/// rejection date and line.
#[must_use]
pub fn nomina_table() -> LoadedTable {
    let schema = Arc::new(Schema::new(vec![
        timestamp_field("FEC_FORM"),
        Field::new("ID_ESTADO_PRESTAMO", DataType::Int64, true),
        Field::new("N_LINEA_PRESTAMO", DataType::Utf8, true),
        Field::new("N_LOCALIDAD", DataType::Utf8, true),
        timestamp_field("FEC_RECHAZO"),
        Field::new("N_LINEA_RECHAZO", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            timestamp_array(&[
                Some("2023-01-05"),
                Some("2023-01-20"),
                Some("2023-02-01"),
                Some("2023-02-10"),
                Some("2023-03-03"),
                Some("2023-03-15"),
                None,
                Some("2023-12-31"),
            ]),
            int_array(&[
                Some(1),
                Some(3),
                Some(1),
                Some(5),
                Some(9),
                Some(6),
                Some(4),
                Some(23),
            ]),
            string_array(&[
                Some("LINEA 1"),
                Some("LINEA 2"),
                Some("LINEA 1"),
                Some("LINEA 1"),
                Some("LINEA 3"),
                Some("LINEA 2"),
                Some("LINEA 1"),
                Some("LINEA 2"),
            ]),
            string_array(&[
                Some("CORDOBA"),
                Some("RIO CUARTO"),
                Some("CORDOBA"),
                Some("VILLA MARIA"),
                Some("CORDOBA"),
                None,
                Some("CORDOBA"),
                Some("RIO CUARTO"),
            ]),
            timestamp_array(&[
                None,
                Some("2023-01-21"),
                None,
                None,
                None,
                Some("2023-03-18"),
                None,
                None,
            ]),
            string_array(&[
                None,
                Some("EVALUACION"),
                None,
                None,
                None,
                Some("DOCUMENTACION"),
                None,
                None,
            ]),
        ],
    )
    .unwrap();
    table_from("nomina", Dataset::Nomina, vec![batch])
}

/// A small repayment table in the shape the recovery view reads.
///
/// Ten credits: eight ingestion dates inside January..February 2023, one
/// in December 2022 and one null. Status codes cover paid, indebted,
/// finalized and written-off buckets; one locality is null.
#[must_use]
pub fn recupero_table() -> LoadedTable {
    let schema = Arc::new(Schema::new(vec![
        timestamp_field("FECHA_INGRESO"),
        Field::new("ID_ESTADO_PRESTAMO", DataType::Int64, true),
        Field::new("N_ESTADO_PRESTAMO", DataType::Utf8, true),
        Field::new("N_LOCALIDAD", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            timestamp_array(&[
                Some("2022-12-05"),
                Some("2023-01-05"),
                Some("2023-01-08"),
                Some("2023-01-12"),
                Some("2023-01-15"),
                Some("2023-01-20"),
                Some("2023-02-02"),
                Some("2023-02-14"),
                Some("2023-02-20"),
                None,
            ]),
            int_array(&[
                Some(13),
                Some(13),
                Some(21),
                Some(7),
                Some(15),
                Some(13),
                Some(21),
                Some(13),
                Some(22),
                Some(13),
            ]),
            string_array(&[
                Some("PAGADO"),
                Some("PAGADO"),
                Some("DEUDA"),
                Some("FINALIZADO"),
                Some("BAJA"),
                Some("PAGADO"),
                Some("DEUDA"),
                Some("PAGADO"),
                Some("BAJA"),
                Some("PAGADO"),
            ]),
            string_array(&[
                Some("CORDOBA"),
                Some("CORDOBA"),
                Some("CORDOBA"),
                Some("RIO CUARTO"),
                Some("VILLA MARIA"),
                Some("RIO CUARTO"),
                None,
                Some("VILLA MARIA"),
                Some("CORDOBA"),
                Some("CORDOBA"),
            ]),
        ],
    )
    .unwrap();
    table_from("recupero_localidad", Dataset::Recupero, vec![batch])
}

/// The inclusive range the view tests filter the fixtures to
#[must_use]
pub fn january_to_march() -> bdg_report::DateRange {
    bdg_report::DateRange::new(
        "2023-01-01".parse().unwrap(),
        "2023-03-31".parse().unwrap(),
    )
    .unwrap()
}

/// January..February 2023, the recovery fixtures' main span
#[must_use]
pub fn january_to_february() -> bdg_report::DateRange {
    bdg_report::DateRange::new(
        "2023-01-01".parse().unwrap(),
        "2023-02-28".parse().unwrap(),
    )
    .unwrap()
}
