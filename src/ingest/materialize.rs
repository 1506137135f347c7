//! Row materialization
//!
//! Applies a confirmed header mapping to each raw CSV row, producing typed
//! candidate records ready for reconciliation. Coercion and defaulting are
//! delegated to the field registry; when two headers map to the same field
//! the later column wins.

use std::collections::{BTreeMap, HashMap};
use ulid::Ulid;

use crate::catalog::{Field, FieldValue};
use crate::core::identity::TaskId;

use super::mapping::HeaderMapping;
use super::reader::CsvTable;
use super::ImportSource;

/// A typed partial task assembled from one CSV row
///
/// Transient: candidates are never persisted directly, only fed through
/// reconciliation. The token is a placeholder identity for display and
/// provenance; the reconciliation engine is the sole authority on final
/// identity.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    /// Zero-based data row index in the source file
    pub row: usize,

    /// Placeholder identity token, deterministic when a reference is present
    pub token: String,

    /// Internal id carried by the candidate, if the source supplied one.
    /// CSV uploads never do; migration batches may.
    pub id: Option<TaskId>,

    /// Mapped field values, keyed by field
    pub fields: BTreeMap<Field, FieldValue>,
}

impl CandidateRecord {
    /// The candidate's business reference, if one was materialized non-empty
    pub fn reference(&self) -> Option<&str> {
        match self.fields.get(&Field::TaskReference) {
            Some(FieldValue::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Convert every data row into a candidate record using the confirmed mapping
pub fn materialize(
    table: &CsvTable,
    mappings: &[HeaderMapping],
    source: ImportSource,
) -> Vec<CandidateRecord> {
    let by_header: HashMap<&str, Field> = mappings
        .iter()
        .filter_map(|m| m.field.map(|field| (m.csv_header.as_str(), field)))
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let mut fields = BTreeMap::new();
            for (col, header) in table.headers.iter().enumerate() {
                let Some(&field) = by_header.get(header.as_str()) else {
                    continue;
                };
                let raw = row.get(col).map(String::as_str).unwrap_or("");
                // later columns overwrite earlier ones for the same field
                fields.insert(field, field.kind().coerce(raw));
            }

            let mut candidate = CandidateRecord {
                row: row_idx,
                token: String::new(),
                id: None,
                fields,
            };
            candidate.token = match candidate.reference() {
                Some(reference) => format!("{}:{}:{}", source, row_idx, reference),
                None => Ulid::new().to_string(),
            };
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskStatus;
    use crate::ingest::mapping::ALIAS_CONFIDENCE;

    fn mapping(header: &str, field: Option<Field>) -> HeaderMapping {
        HeaderMapping {
            csv_header: header.to_string(),
            field,
            confidence: if field.is_some() { ALIAS_CONFIDENCE } else { 0.0 },
        }
    }

    #[test]
    fn test_materialize_types_and_defaults() {
        let table = CsvTable::parse(
            "TO Ref.,TO Status,Delay (days),Comments\nABC-1,Done,-5,\nABC-2,bogus,abc,late\n",
        )
        .unwrap();
        let mappings = vec![
            mapping("TO Ref.", Some(Field::TaskReference)),
            mapping("TO Status", Some(Field::Status)),
            mapping("Delay (days)", Some(Field::DelayDays)),
            mapping("Comments", Some(Field::Comments)),
        ];
        let candidates = materialize(&table, &mappings, ImportSource::CsvUpload);
        assert_eq!(candidates.len(), 2);

        assert_eq!(
            candidates[0].fields[&Field::Status],
            FieldValue::Status(TaskStatus::Done)
        );
        assert_eq!(
            candidates[0].fields[&Field::DelayDays],
            FieldValue::Number(Some(-5.0))
        );
        assert_eq!(
            candidates[0].fields[&Field::Comments],
            FieldValue::Text(String::new())
        );

        // invalid status falls back to the default member, bad number to null
        assert_eq!(
            candidates[1].fields[&Field::Status],
            FieldValue::Status(TaskStatus::Open)
        );
        assert_eq!(
            candidates[1].fields[&Field::DelayDays],
            FieldValue::Number(None)
        );
    }

    #[test]
    fn test_unmapped_columns_are_skipped() {
        let table = CsvTable::parse("TO Ref.,Noise\nABC-1,xyz\n").unwrap();
        let mappings = vec![
            mapping("TO Ref.", Some(Field::TaskReference)),
            mapping("Noise", None),
        ];
        let candidates = materialize(&table, &mappings, ImportSource::CsvUpload);
        assert_eq!(candidates[0].fields.len(), 1);
    }

    #[test]
    fn test_duplicate_field_later_column_wins() {
        let table = CsvTable::parse("Comments,Notes\nfirst,second\n").unwrap();
        let mappings = vec![
            mapping("Comments", Some(Field::Comments)),
            mapping("Notes", Some(Field::Comments)),
        ];
        let candidates = materialize(&table, &mappings, ImportSource::CsvUpload);
        assert_eq!(
            candidates[0].fields[&Field::Comments],
            FieldValue::Text("second".to_string())
        );
    }

    #[test]
    fn test_token_deterministic_with_reference() {
        let table = CsvTable::parse("TO Ref.\nABC-1\nABC-2\n").unwrap();
        let mappings = vec![mapping("TO Ref.", Some(Field::TaskReference))];
        let a = materialize(&table, &mappings, ImportSource::CsvUpload);
        let b = materialize(&table, &mappings, ImportSource::CsvUpload);
        assert_eq!(a[0].token, "csv-upload:0:ABC-1");
        assert_eq!(a[0].token, b[0].token);
        assert_ne!(a[0].token, a[1].token);
    }

    #[test]
    fn test_token_synthesized_without_reference() {
        let table = CsvTable::parse("Comments\nhello\nhello\n").unwrap();
        let mappings = vec![mapping("Comments", Some(Field::Comments))];
        let candidates = materialize(&table, &mappings, ImportSource::CsvUpload);
        assert!(!candidates[0].token.is_empty());
        assert_ne!(candidates[0].token, candidates[1].token);
    }

    #[test]
    fn test_csv_candidates_carry_no_internal_id() {
        let table = CsvTable::parse("TO Ref.\nABC-1\n").unwrap();
        let mappings = vec![mapping("TO Ref.", Some(Field::TaskReference))];
        let candidates = materialize(&table, &mappings, ImportSource::CsvUpload);
        assert!(candidates[0].id.is_none());
    }
}
