//! Named status-code buckets used by the report views
//!
//! The loan tables carry a numeric status code per row. The program office
//! reads those codes through named buckets ("A Pagar", "Impagos/Bajas",
//! and so on), and each view has its own bucket map. The maps live here as
//! versioned data so a revision of the office's code lists is a new
//! constructor, not an edit scattered through the views.

use smallvec::SmallVec;

/// Status codes of one bucket. The maps in use hold at most 16 codes per
/// bucket, so they stay inline.
pub type CodeSet = SmallVec<[i32; 16]>;

/// A named bucket and the status codes that fall into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub label: String,
    pub codes: CodeSet,
}

/// An ordered list of buckets, identified by name and revision.
///
/// Bucket order is the display order of the charts, so it is preserved
/// as declared. Buckets are independent counts, not a partition: a code
/// may appear in more than one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    name: String,
    version: u32,
    entries: Vec<CategoryEntry>,
}

impl CategoryMap {
    #[must_use]
    pub fn new(name: impl Into<String>, version: u32, entries: Vec<CategoryEntry>) -> Self {
        Self {
            name: name.into(),
            version,
            entries,
        }
    }

    /// Builds one bucket from a label and its code list.
    #[must_use]
    pub fn entry(label: &str, codes: &[i32]) -> CategoryEntry {
        CategoryEntry {
            label: label.to_string(),
            codes: SmallVec::from_slice(codes),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    /// The codes of the bucket with the given label, if present.
    #[must_use]
    pub fn codes_for(&self, label: &str) -> Option<&CodeSet> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.codes)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Buckets for the global view cards over `ID_ESTADO_PRESTAMO`.
#[must_use]
pub fn global_map() -> CategoryMap {
    CategoryMap::new(
        "global",
        1,
        vec![
            CategoryMap::entry("En Evaluación", &[1, 2, 5]),
            CategoryMap::entry("Rechazados", &[3, 6, 7, 15, 23]),
            CategoryMap::entry("A Pagar", &[4, 9, 10, 11, 12, 13, 19, 20]),
        ],
    )
}

/// Buckets for the recovery view cards, current revision.
///
/// Code 7 is counted under both "Pagados" and "Finalizados", and code 21
/// under both "Pagados" and "Créditos con Deuda". The overlap is carried
/// as the program office defined it, pending their confirmation.
#[must_use]
pub fn recupero_map() -> CategoryMap {
    CategoryMap::new(
        "recupero",
        2,
        vec![
            CategoryMap::entry("Pagados", &[13, 14, 16, 17, 18, 20, 21, 7]),
            CategoryMap::entry("Créditos con Deuda", &[21]),
            CategoryMap::entry("Impagos/Bajas", &[15, 22, 23]),
            CategoryMap::entry("Finalizados", &[7]),
        ],
    )
}

/// Previous revision of the recovery buckets, kept so reports generated
/// before the office widened "Pagados" can be reproduced.
#[must_use]
pub fn recupero_map_v1() -> CategoryMap {
    CategoryMap::new(
        "recupero",
        1,
        vec![
            CategoryMap::entry("Pagados", &[13, 14, 20]),
            CategoryMap::entry("Créditos con Deuda", &[16, 17, 18, 21]),
            CategoryMap::entry("Impagos/Bajas", &[23, 22, 15]),
            CategoryMap::entry("Finalizados", &[7]),
        ],
    )
}

/// Buckets for the rejection view cards over `ID_ESTADO_PRESTAMO`.
#[must_use]
pub fn rechazo_map() -> CategoryMap {
    CategoryMap::new(
        "rechazo",
        1,
        vec![
            CategoryMap::entry(
                "Rechazo",
                &[4, 13, 14, 17, 18, 20, 22, 28, 29, 30, 31, 32, 33, 35, 36],
            ),
            CategoryMap::entry("Impago", &[11, 12]),
            CategoryMap::entry("Desistido", &[6]),
        ],
    )
}
