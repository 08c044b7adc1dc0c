use std::sync::Arc;

use arrow::array::TimestampMillisecondArray;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bdg_report::count_by_month;

use crate::utils::{day_ms, nomina_table, time_ms};

/// Test that the monthly series sorts across a year boundary
#[test]
fn test_series_crosses_year_boundary() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "FEC_FORM",
        DataType::Timestamp(TimeUnit::Millisecond, None),
        true,
    )]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(TimestampMillisecondArray::from(vec![
            Some(day_ms("2023-01-09")),
            Some(day_ms("2022-12-28")),
            Some(time_ms("2023-01-31", 18, 5, 0)),
            None,
        ]))],
    )
    .unwrap();

    let months = count_by_month(&[batch], "FEC_FORM").unwrap();

    let labels: Vec<(String, u64)> = months.iter().map(|m| (m.label(), m.count)).collect();
    assert_eq!(
        labels,
        vec![("2022-12".to_string(), 1), ("2023-01".to_string(), 2)]
    );
}

/// Test the series over the application fixture, where the null form
/// date contributes to no month
#[test]
fn test_series_over_fixture_table() {
    let table = nomina_table();

    let months = count_by_month(&table.batches, "FEC_FORM").unwrap();

    let total: u64 = months.iter().map(|m| m.count).sum();
    assert_eq!(total, 7);
    assert_eq!(months.first().unwrap().label(), "2023-01");
    assert_eq!(months.last().unwrap().label(), "2023-12");
}
