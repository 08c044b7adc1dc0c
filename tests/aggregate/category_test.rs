use std::sync::Arc;

use arrow::array::{Int64Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bdg_report::categories::{CategoryMap, recupero_map};
use bdg_report::filter::{DateRange, filter_by_date_range};
use bdg_report::{count_by_category, filter_record_batch};

use crate::utils::{day_ms, january_to_february, recupero_table};

/// Test the filtered bucket counts end to end on a three-row table:
/// two January forms with statuses 1 and 3, one February form with
/// status 1, filtered to January and bucketed as A=[1], B=[3].
#[test]
fn test_filter_then_bucket_counts() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(
            "FEC_FORM",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ),
        Field::new("ID_ESTADO_PRESTAMO", DataType::Int64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(TimestampMillisecondArray::from(vec![
                Some(day_ms("2023-01-05")),
                Some(day_ms("2023-01-20")),
                Some(day_ms("2023-02-01")),
            ])),
            Arc::new(Int64Array::from(vec![Some(1), Some(3), Some(1)])),
        ],
    )
    .unwrap();
    let january = DateRange::new(
        "2023-01-01".parse().unwrap(),
        "2023-01-31".parse().unwrap(),
    )
    .unwrap();
    let map = CategoryMap::new(
        "cards",
        1,
        vec![CategoryMap::entry("A", &[1]), CategoryMap::entry("B", &[3])],
    );

    let filtered = filter_by_date_range(&[batch], "FEC_FORM", january).unwrap();
    let rows: usize = filtered.iter().map(RecordBatch::num_rows).sum();
    assert_eq!(rows, 2);

    let counts = count_by_category(&filtered, "ID_ESTADO_PRESTAMO", &map).unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!((counts[0].label.as_str(), counts[0].count), ("A", 1));
    assert_eq!((counts[1].label.as_str(), counts[1].count), ("B", 1));
}

/// Test that the recovery buckets count shared codes in every bucket
/// that lists them, so the bucket total exceeds the row count
#[test]
fn test_recovery_buckets_overlap() {
    let table = recupero_table();
    let filtered =
        filter_by_date_range(&table.batches, "FECHA_INGRESO", january_to_february()).unwrap();
    let rows: usize = filtered.iter().map(RecordBatch::num_rows).sum();

    let counts =
        count_by_category(&filtered, "ID_ESTADO_PRESTAMO", &recupero_map()).unwrap();

    let by_label = |label: &str| {
        counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap()
    };
    // Codes in range: 13 x3, 21 x2, 7, 15, 22.
    assert_eq!(by_label("Pagados"), 6);
    assert_eq!(by_label("Créditos con Deuda"), 2);
    assert_eq!(by_label("Impagos/Bajas"), 2);
    assert_eq!(by_label("Finalizados"), 1);

    let total: u64 = counts.iter().map(|c| c.count).sum();
    assert!(total as usize > rows);
}

/// Test that bucket labels stay present when an empty mask leaves no rows
#[test]
fn test_buckets_survive_empty_filter() {
    let table = recupero_table();
    let batch = &table.batches[0];
    let empty_mask = arrow::array::BooleanArray::from(vec![false; batch.num_rows()]);

    let empty = filter_record_batch(batch, &empty_mask).unwrap();
    let counts =
        count_by_category(&[empty], "ID_ESTADO_PRESTAMO", &recupero_map()).unwrap();

    assert_eq!(counts.len(), 4);
    assert!(counts.iter().all(|c| c.count == 0));
}
