//! CSV history adapter: Implementation of `PredictionStore` over a flat file.
//!
//! The history is a comma-separated text file with a header row. It is
//! mutated only by appending rows, or by the explicit repair operation that
//! backfills columns added after older rows were written.
//!
//! # Format invariants
//!
//! Persisted values are numerics, fixed label strings, and fixed feature
//! names. None of them can contain commas or quotes, so the format needs no
//! quoting and rows are parsed by splitting on `,`.
//!
//! Appends never touch the existing header, even when it is stale: a
//! user-facing write must not fail because of schema drift, which is
//! resolved later by the explicit `repair` operation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{
    PatientFeatures, PredictionRecord, FACTOR_COLUMNS, FEATURE_NAMES, LABEL_COLUMN,
    MISSING_FACTOR, PROBABILITY_COLUMN,
};
use crate::ports::{PredictionStore, RawTable, RepairOutcome};

/// Error type for history storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to {op} history file {path:?}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history file {path:?} is empty (missing header row)")]
    MissingHeader { path: PathBuf },
}

/// CSV-file history store.
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    /// Create a store over the given file path. The file itself is created
    /// lazily by the first append.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current canonical header line.
    fn canonical_header() -> String {
        FEATURE_NAMES
            .iter()
            .copied()
            .chain([LABEL_COLUMN, PROBABILITY_COLUMN])
            .chain(FACTOR_COLUMNS.iter().copied())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Format one record as a canonical 13-field row.
    fn record_to_row(record: &PredictionRecord) -> String {
        let f = &record.features;
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            f.pregnancies,
            f.glucose,
            f.blood_pressure,
            f.skin_thickness,
            f.insulin,
            f.bmi,
            f.pedigree,
            f.age,
            record.label,
            record.probability,
            record.factors[0],
            record.factors[1],
            record.factors[2],
        )
    }

    fn io_err(op: &'static str, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Load the header and all well-formed rows.
    ///
    /// Rows whose field count disagrees with the header are skipped with a
    /// warning; a file that cannot be read at all is an error.
    fn load_table(&self) -> Result<RawTable, StorageError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Self::io_err("read", &self.path, e))?;

        let mut lines = content.lines().filter(|l| !l.trim().is_empty());
        let header: Vec<String> = match lines.next() {
            Some(line) => line.split(',').map(str::to_string).collect(),
            None => {
                return Err(StorageError::MissingHeader {
                    path: self.path.clone(),
                })
            }
        };

        let mut rows = Vec::new();
        for (lineno, line) in lines.enumerate() {
            let fields: Vec<String> = line.split(',').map(str::to_string).collect();
            if fields.len() != header.len() {
                tracing::warn!(
                    "Skipping malformed history row {} ({} fields, header has {})",
                    lineno + 2,
                    fields.len(),
                    header.len()
                );
                continue;
            }
            rows.push(fields);
        }

        Ok(RawTable { header, rows })
    }

    /// Convert one raw row into a typed record using the header's column
    /// positions. `None` means the row is malformed and should be skipped.
    fn row_to_record(table: &RawTable, row: &[String]) -> Option<PredictionRecord> {
        let get = |name: &str| table.column(name).map(|idx| row[idx].as_str());

        let mut features = [0.0f64; 8];
        for (slot, name) in features.iter_mut().zip(FEATURE_NAMES.iter()) {
            *slot = get(name)?.trim().parse().ok()?;
        }
        let features = PatientFeatures::from_row(&features).ok()?;

        let label = get(LABEL_COLUMN)?.to_string();
        let probability: f64 = get(PROBABILITY_COLUMN)?.trim().parse().ok()?;

        let factors = std::array::from_fn(|i| {
            get(FACTOR_COLUMNS[i])
                .map_or_else(|| MISSING_FACTOR.to_string(), str::to_string)
        });

        Some(PredictionRecord {
            features,
            label,
            probability,
            factors,
        })
    }
}

impl PredictionStore for CsvHistory {
    type Error = StorageError;

    fn append(&self, record: &PredictionRecord) -> Result<(), Self::Error> {
        let row = Self::record_to_row(record);

        if self.path.exists() {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&self.path)
                .map_err(|e| Self::io_err("open", &self.path, e))?;
            writeln!(file, "{row}").map_err(|e| Self::io_err("write", &self.path, e))?;
        } else {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| Self::io_err("create directory for", &self.path, e))?;
                }
            }
            let content = format!("{}\n{row}\n", Self::canonical_header());
            std::fs::write(&self.path, content)
                .map_err(|e| Self::io_err("write", &self.path, e))?;
        }

        tracing::debug!("Appended prediction record to {:?}", self.path);
        Ok(())
    }

    fn read(&self, limit: Option<usize>) -> Result<Vec<PredictionRecord>, Self::Error> {
        let table = self.load_table()?;

        let mut records: Vec<PredictionRecord> = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            match Self::row_to_record(&table, row) {
                Some(record) => records.push(record),
                None => tracing::warn!("Skipping history row with unparseable fields"),
            }
        }

        if let Some(limit) = limit {
            let skip = records.len().saturating_sub(limit);
            records.drain(..skip);
        }

        Ok(records)
    }

    fn read_raw(&self) -> Result<RawTable, Self::Error> {
        self.load_table()
    }

    fn repair(&self) -> Result<RepairOutcome, Self::Error> {
        let mut table = self.load_table()?;

        let missing: Vec<String> = FACTOR_COLUMNS
            .iter()
            .filter(|col| table.column(col).is_none())
            .map(|col| (*col).to_string())
            .collect();

        if missing.is_empty() {
            tracing::info!("History {:?} already carries all columns", self.path);
            return Ok(RepairOutcome::NothingToRepair);
        }

        table.header.extend(missing.iter().cloned());
        for row in &mut table.rows {
            row.extend(missing.iter().map(|_| MISSING_FACTOR.to_string()));
        }

        let mut content = table.header.join(",");
        content.push('\n');
        for row in &table.rows {
            content.push_str(&row.join(","));
            content.push('\n');
        }

        // Rewrite via a sibling temp file so a crash cannot truncate the log.
        let tmp_path = self.path.with_extension("csv.tmp");
        std::fs::write(&tmp_path, content).map_err(|e| Self::io_err("write", &tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| Self::io_err("rename", &self.path, e))?;

        tracing::info!("Repaired history {:?}: added columns {:?}", self.path, missing);
        Ok(RepairOutcome::Repaired(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record(glucose: u32, positive: bool) -> PredictionRecord {
        PredictionRecord {
            features: PatientFeatures {
                pregnancies: 1,
                glucose,
                blood_pressure: 70,
                skin_thickness: 20,
                insulin: 79,
                bmi: 28.5,
                pedigree: 0.5,
                age: 30,
            },
            label: if positive {
                "Positif Diabetes".to_string()
            } else {
                "Negatif Diabetes".to_string()
            },
            probability: if positive { 0.82 } else { 0.21 },
            factors: ["Glukosa", "BMI", "Usia"].map(String::from),
        }
    }

    #[test]
    fn test_append_creates_file_with_canonical_header() {
        let temp = tempdir().expect("tempdir");
        let store = CsvHistory::new(temp.path().join("hasil/hasil_prediksi.csv"));

        store.append(&sample_record(120, false)).expect("Should append");

        let content = std::fs::read_to_string(store.path()).expect("read file");
        let header = content.lines().next().expect("header line");
        assert!(header.starts_with("Jumlah_Kehamilan,Glukosa,"));
        assert!(header.ends_with("Faktor_Terkuat_1,Faktor_Terkuat_2,Faktor_Terkuat_3"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_append_then_read_last_roundtrips() {
        let temp = tempdir().expect("tempdir");
        let store = CsvHistory::new(temp.path().join("history.csv"));

        store.append(&sample_record(110, false)).expect("Should append");
        let appended = sample_record(155, true);
        store.append(&appended).expect("Should append");

        let records = store.read(Some(1)).expect("Should read");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], appended);
        assert_eq!(records[0].factors[0], "Glukosa");
    }

    #[test]
    fn test_append_leaves_legacy_header_untouched() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("history.csv");
        let legacy_header = "Jumlah_Kehamilan,Glukosa,Tekanan_Darah,Ketebalan_Kulit,Insulin,BMI,Riwayat_Keluarga,Usia,Prediksi,Probabilitas";
        std::fs::write(&path, format!("{legacy_header}\n")).expect("seed file");

        let store = CsvHistory::new(&path);
        store.append(&sample_record(120, true)).expect("Should append");

        let content = std::fs::read_to_string(&path).expect("read file");
        assert_eq!(content.lines().next(), Some(legacy_header));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_read_skips_malformed_rows() {
        let temp = tempdir().expect("tempdir");
        let store = CsvHistory::new(temp.path().join("history.csv"));

        store.append(&sample_record(100, false)).expect("Should append");
        store.append(&sample_record(180, true)).expect("Should append");

        // Inject a truncated row and a row with garbage numerics.
        let mut content = std::fs::read_to_string(store.path()).expect("read file");
        content.push_str("1,2,3\n");
        content.push_str("x,y,z,x,y,z,x,y,z,x,y,z,x\n");
        std::fs::write(store.path(), content).expect("write file");

        let records = store.read(None).expect("Should read");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].features.glucose, 100);
        assert_eq!(records[1].features.glucose, 180);
    }

    #[test]
    fn test_read_missing_file_is_storage_error() {
        let temp = tempdir().expect("tempdir");
        let store = CsvHistory::new(temp.path().join("absent.csv"));

        let err = store.read(None).expect_err("must fail");
        assert!(matches!(err, StorageError::Io { op: "read", .. }));
    }

    #[test]
    fn test_legacy_rows_read_with_sentinel_factors() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("history.csv");
        std::fs::write(
            &path,
            "Jumlah_Kehamilan,Glukosa,Tekanan_Darah,Ketebalan_Kulit,Insulin,BMI,Riwayat_Keluarga,Usia,Prediksi,Probabilitas\n\
             2,140,75,22,85,30.1,0.6,41,Positif Diabetes,0.77\n",
        )
        .expect("seed file");

        let store = CsvHistory::new(&path);
        let records = store.read(None).expect("Should read");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].factors, [MISSING_FACTOR; 3].map(String::from));
        assert_eq!(records[0].features.glucose, 140);
    }

    #[test]
    fn test_repair_adds_missing_columns_and_preserves_values() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("history.csv");
        std::fs::write(
            &path,
            "Jumlah_Kehamilan,Glukosa,Tekanan_Darah,Ketebalan_Kulit,Insulin,BMI,Riwayat_Keluarga,Usia,Prediksi,Probabilitas\n\
             2,140,75,22,85,30.1,0.6,41,Positif Diabetes,0.77\n\
             0,95,60,15,50,24.0,0.2,25,Negatif Diabetes,0.12\n",
        )
        .expect("seed file");

        let store = CsvHistory::new(&path);
        let outcome = store.repair().expect("Should repair");

        assert_eq!(
            outcome,
            RepairOutcome::Repaired(FACTOR_COLUMNS.map(String::from).to_vec())
        );

        let content = std::fs::read_to_string(&path).expect("read file");
        let mut lines = content.lines();
        assert!(lines
            .next()
            .expect("header")
            .ends_with("Probabilitas,Faktor_Terkuat_1,Faktor_Terkuat_2,Faktor_Terkuat_3"));
        assert_eq!(
            lines.next().expect("row"),
            "2,140,75,22,85,30.1,0.6,41,Positif Diabetes,0.77,-,-,-"
        );
        assert_eq!(
            lines.next().expect("row"),
            "0,95,60,15,50,24.0,0.2,25,Negatif Diabetes,0.12,-,-,-"
        );
    }

    #[test]
    fn test_repair_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("history.csv");
        std::fs::write(
            &path,
            "Jumlah_Kehamilan,Glukosa,Tekanan_Darah,Ketebalan_Kulit,Insulin,BMI,Riwayat_Keluarga,Usia,Prediksi,Probabilitas\n\
             2,140,75,22,85,30.1,0.6,41,Positif Diabetes,0.77\n",
        )
        .expect("seed file");

        let store = CsvHistory::new(&path);
        store.repair().expect("Should repair");
        let first = std::fs::read_to_string(&path).expect("read file");

        let outcome = store.repair().expect("Should repair again");
        let second = std::fs::read_to_string(&path).expect("read file");

        assert_eq!(outcome, RepairOutcome::NothingToRepair);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repair_on_canonical_file_reports_nothing() {
        let temp = tempdir().expect("tempdir");
        let store = CsvHistory::new(temp.path().join("history.csv"));
        store.append(&sample_record(120, false)).expect("Should append");

        assert_eq!(
            store.repair().expect("Should repair"),
            RepairOutcome::NothingToRepair
        );
    }
}
