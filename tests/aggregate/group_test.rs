use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bdg_report::filter::filter_by_date_range;
use bdg_report::{GroupKey, GroupOrder, group_count, top_n_within_group};

use crate::utils::{january_to_february, recupero_table};

fn single_column_batch(column: &str, values: &[Option<&str>]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new(column, DataType::Utf8, true)]));
    RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(values.to_vec()))]).unwrap()
}

/// Test that first appearance breaks count ties across batch boundaries
#[test]
fn test_tie_break_spans_batches() {
    let first = single_column_batch("N_LOCALIDAD", &[Some("BELL VILLE"), Some("BELL VILLE")]);
    let second = single_column_batch("N_LOCALIDAD", &[Some("ALTA GRACIA"), Some("ALTA GRACIA")]);

    let groups = group_count(&[first, second], "N_LOCALIDAD", GroupOrder::CountDesc).unwrap();

    // Both count 2; BELL VILLE was seen first even though ALTA GRACIA
    // sorts first alphabetically.
    assert_eq!(groups[0].key, GroupKey::Str("BELL VILLE".into()));
    assert_eq!(groups[1].key, GroupKey::Str("ALTA GRACIA".into()));
}

/// Test the full locality ranking of the recovery fixture
#[test]
fn test_locality_ranking() {
    let table = recupero_table();
    let filtered =
        filter_by_date_range(&table.batches, "FECHA_INGRESO", january_to_february()).unwrap();

    let groups = group_count(&filtered, "N_LOCALIDAD", GroupOrder::CountDesc).unwrap();

    let ranking: Vec<(String, u64)> = groups
        .iter()
        .map(|g| (g.key.to_string(), g.count))
        .collect();
    assert_eq!(
        ranking,
        vec![
            ("CORDOBA".to_string(), 3),
            ("RIO CUARTO".to_string(), 2),
            ("VILLA MARIA".to_string(), 2),
            ("(sin dato)".to_string(), 1),
        ]
    );

    let rows: usize = filtered.iter().map(RecordBatch::num_rows).sum();
    let total: u64 = groups.iter().map(|g| g.count).sum();
    assert_eq!(total as usize, rows);
}

/// Test that no outer group retains more than n inner groups
#[test]
fn test_top_n_cap_holds_for_every_group() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("N_ESTADO_PRESTAMO", DataType::Utf8, true),
        Field::new("N_LOCALIDAD", DataType::Utf8, true),
    ]));
    // One status spread over five localities, another over two.
    let estados: Vec<Option<&str>> = std::iter::repeat(Some("PAGADO"))
        .take(5)
        .chain(std::iter::repeat(Some("DEUDA")).take(2))
        .collect();
    let localities = vec![
        Some("A"),
        Some("B"),
        Some("C"),
        Some("D"),
        Some("E"),
        Some("A"),
        Some("B"),
    ];
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(estados)),
            Arc::new(StringArray::from(localities)),
        ],
    )
    .unwrap();

    let cross = top_n_within_group(&[batch], "N_ESTADO_PRESTAMO", "N_LOCALIDAD", 3).unwrap();

    for outer in [GroupKey::Str("PAGADO".into()), GroupKey::Str("DEUDA".into())] {
        let kept = cross.cells.iter().filter(|c| c.outer == outer).count();
        assert!(kept <= 3);
    }
    let pagado_kept = cross
        .cells
        .iter()
        .filter(|c| c.outer == GroupKey::Str("PAGADO".into()))
        .count();
    assert_eq!(pagado_kept, 3);
}

/// Test the dense pivot over the recovery fixture
#[test]
fn test_pivot_grid_is_dense_and_zero_filled() {
    let table = recupero_table();
    let filtered =
        filter_by_date_range(&table.batches, "FECHA_INGRESO", january_to_february()).unwrap();

    let pivot = top_n_within_group(&filtered, "N_ESTADO_PRESTAMO", "N_LOCALIDAD", 10)
        .unwrap()
        .to_pivot();

    // Every surviving status crosses every surviving locality.
    assert_eq!(pivot.values.len(), pivot.rows.len());
    for row in &pivot.values {
        assert_eq!(row.len(), pivot.columns.len());
    }

    // BAJA never appears in RIO CUARTO; the grid still has the cell.
    let baja = pivot
        .rows
        .iter()
        .position(|k| *k == GroupKey::Str("BAJA".into()))
        .unwrap();
    let rio_cuarto = pivot
        .columns
        .iter()
        .position(|k| *k == GroupKey::Str("RIO CUARTO".into()))
        .unwrap();
    assert_eq!(pivot.values[baja][rio_cuarto], 0);

    // PAGADO spreads one credit across each of the three localities.
    let pagado = pivot
        .rows
        .iter()
        .position(|k| *k == GroupKey::Str("PAGADO".into()))
        .unwrap();
    let pagado_total: u64 = pivot.values[pagado].iter().sum();
    assert_eq!(pagado_total, 3);
}
