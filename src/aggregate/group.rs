//! Group-by tallies, per-group top-N and the dense pivot

use std::fmt;

use arrow::array::Array;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::utils::arrow::{get_column_by_name, int64_column, string_column};

/// A single group-by key.
///
/// Tables mix integer-coded and free-text columns, so keys carry either
/// form. Rows with a null key are kept under [`GroupKey::Null`] so that the
/// group counts of a table always sum to its row count.
///
/// The derived ordering (integers, then strings, then null) is what
/// [`GroupOrder::ByKey`] and the pivot axes use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Int(i64),
    Str(String),
    Null,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value}"),
            Self::Null => write!(f, "(sin dato)"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Str(value) => serializer.serialize_str(value),
            Self::Null => serializer.serialize_none(),
        }
    }
}

/// Ordering of a group-by result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Largest groups first; groups with equal counts keep the order in
    /// which their key first appears in the data.
    CountDesc,
    /// Ascending by key.
    ByKey,
}

/// One group and its row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: GroupKey,
    pub count: u64,
}

/// Reads every row of `column` in `batch` as a [`GroupKey`].
///
/// Dispatch on the stored type keeps text columns textual: the integer
/// extractor would otherwise happily parse numeric-looking strings.
fn column_keys(batch: &RecordBatch, column: &str) -> Result<Vec<GroupKey>> {
    let array = get_column_by_name(batch, column)?;
    match array.data_type() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let values = int64_column(batch, column)?;
            let keys = (0..values.len())
                .map(|i| {
                    if values.is_null(i) {
                        GroupKey::Null
                    } else {
                        GroupKey::Int(values.value(i))
                    }
                })
                .collect();
            Ok(keys)
        }
        DataType::Utf8 | DataType::LargeUtf8 => {
            let values = string_column(batch, column)?;
            let keys = (0..values.len())
                .map(|i| {
                    if values.is_null(i) {
                        GroupKey::Null
                    } else {
                        GroupKey::Str(values.value(i).to_string())
                    }
                })
                .collect();
            Ok(keys)
        }
        other => Err(Error::InvalidDataType {
            column: column.to_string(),
            expected: format!("integer or string, found {other}"),
        }
        .into()),
    }
}

/// Counts rows per distinct value of `group_column`.
///
/// Null values form their own group, so the counts sum to the row count of
/// the input. Ties under [`GroupOrder::CountDesc`] resolve to the key that
/// appeared first in the data, which keeps the result stable across runs
/// over the same table.
///
/// # Errors
/// Returns an error if the column is missing or is neither integer nor
/// string typed.
pub fn group_count(
    batches: &[RecordBatch],
    group_column: &str,
    order: GroupOrder,
) -> Result<Vec<GroupCount>> {
    let mut tally: FxHashMap<GroupKey, (usize, u64)> = FxHashMap::default();
    for batch in batches {
        for key in column_keys(batch, group_column)? {
            let first_seen = tally.len();
            let entry = tally.entry(key).or_insert((first_seen, 0));
            entry.1 += 1;
        }
    }

    let mut groups: Vec<(GroupKey, usize, u64)> = tally
        .into_iter()
        .map(|(key, (first_seen, count))| (key, first_seen, count))
        .collect();
    match order {
        GroupOrder::CountDesc => {
            groups.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
        }
        GroupOrder::ByKey => groups.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    Ok(groups
        .into_iter()
        .map(|(key, _, count)| GroupCount { key, count })
        .collect())
}

/// One cell of a two-column cross tabulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossCell {
    pub outer: GroupKey,
    pub inner: GroupKey,
    pub count: u64,
}

/// Sparse result of [`top_n_within_group`]: only the surviving
/// (outer, inner) pairs, grouped by outer key in first-appearance order.
#[derive(Debug, Clone, Serialize)]
pub struct CrossTab {
    pub outer_column: String,
    pub inner_column: String,
    pub cells: Vec<CrossCell>,
}

/// Dense grid built from a [`CrossTab`], with both axes sorted ascending
/// by key and absent combinations filled with zero.
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    pub rows: Vec<GroupKey>,
    pub columns: Vec<GroupKey>,
    pub values: Vec<Vec<u64>>,
}

impl CrossTab {
    /// Expands the sparse cells into a zero-filled grid keyed by
    /// `rows[i]` / `columns[j]`. An inner key dropped for one outer group
    /// but kept for another reappears as a zero cell, never as a hole.
    #[must_use]
    pub fn to_pivot(&self) -> PivotTable {
        let rows: Vec<GroupKey> = self
            .cells
            .iter()
            .map(|cell| cell.outer.clone())
            .sorted()
            .dedup()
            .collect();
        let columns: Vec<GroupKey> = self
            .cells
            .iter()
            .map(|cell| cell.inner.clone())
            .sorted()
            .dedup()
            .collect();

        let index: FxHashMap<(&GroupKey, &GroupKey), u64> = self
            .cells
            .iter()
            .map(|cell| ((&cell.outer, &cell.inner), cell.count))
            .collect();
        let values = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| index.get(&(row, column)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        PivotTable {
            rows,
            columns,
            values,
        }
    }
}

/// Counts rows per (outer, inner) pair and keeps at most `n` inner groups
/// per outer group, the largest first.
///
/// Ties between inner groups resolve to the pair that appeared first in
/// the data. Outer groups with fewer than `n` inner values keep all of
/// them. The cells come back grouped by outer key in first-appearance
/// order; [`CrossTab::to_pivot`] turns them into a dense grid.
///
/// # Errors
/// Returns an error if either column is missing or has an unsupported
/// type.
pub fn top_n_within_group(
    batches: &[RecordBatch],
    outer_column: &str,
    inner_column: &str,
    n: usize,
) -> Result<CrossTab> {
    let mut tally: FxHashMap<(GroupKey, GroupKey), (usize, u64)> = FxHashMap::default();
    let mut outer_order: FxHashMap<GroupKey, usize> = FxHashMap::default();

    for batch in batches {
        let outer_keys = column_keys(batch, outer_column)?;
        let inner_keys = column_keys(batch, inner_column)?;
        for (outer, inner) in outer_keys.into_iter().zip(inner_keys) {
            let next_outer = outer_order.len();
            outer_order.entry(outer.clone()).or_insert(next_outer);
            let next_pair = tally.len();
            let entry = tally.entry((outer, inner)).or_insert((next_pair, 0));
            entry.1 += 1;
        }
    }

    let mut per_outer: FxHashMap<GroupKey, Vec<(GroupKey, usize, u64)>> = FxHashMap::default();
    for ((outer, inner), (first_seen, count)) in tally {
        per_outer
            .entry(outer)
            .or_default()
            .push((inner, first_seen, count));
    }

    let outers: Vec<GroupKey> = outer_order
        .into_iter()
        .sorted_by_key(|(_, first_seen)| *first_seen)
        .map(|(key, _)| key)
        .collect();

    let mut cells = Vec::new();
    for outer in outers {
        let Some(mut inners) = per_outer.remove(&outer) else {
            continue;
        };
        inners.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
        inners.truncate(n);
        for (inner, _, count) in inners {
            cells.push(CrossCell {
                outer: outer.clone(),
                inner,
                count,
            });
        }
    }

    Ok(CrossTab {
        outer_column: outer_column.to_string(),
        inner_column: inner_column.to_string(),
        cells,
    })
}

/// Counts the distinct non-null inner values per outer group.
///
/// An outer group whose inner values are all null still appears, with a
/// count of zero.
///
/// # Errors
/// Returns an error if either column is missing or has an unsupported
/// type.
pub fn distinct_within_group(
    batches: &[RecordBatch],
    outer_column: &str,
    inner_column: &str,
    order: GroupOrder,
) -> Result<Vec<GroupCount>> {
    let mut sets: FxHashMap<GroupKey, (usize, FxHashSet<GroupKey>)> = FxHashMap::default();

    for batch in batches {
        let outer_keys = column_keys(batch, outer_column)?;
        let inner_keys = column_keys(batch, inner_column)?;
        for (outer, inner) in outer_keys.into_iter().zip(inner_keys) {
            let first_seen = sets.len();
            let entry = sets
                .entry(outer)
                .or_insert_with(|| (first_seen, FxHashSet::default()));
            if inner != GroupKey::Null {
                entry.1.insert(inner);
            }
        }
    }

    let mut groups: Vec<(GroupKey, usize, u64)> = sets
        .into_iter()
        .map(|(key, (first_seen, values))| (key, first_seen, values.len() as u64))
        .collect();
    match order {
        GroupOrder::CountDesc => {
            groups.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
        }
        GroupOrder::ByKey => groups.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    Ok(groups
        .into_iter()
        .map(|(key, _, count)| GroupCount { key, count })
        .collect())
}
