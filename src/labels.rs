//! Label resolution and the frozen label encoding.
//!
//! Two label sources exist: filename-derived single labels (one exercise per
//! keypoint file) and per-frame-range tables (workout recordings where rows
//! of `start_frame, end_frame, label` mark exercise segments). Frames outside
//! any labeled range are excluded from the dataset, not defaulted to an
//! "unknown" class.
//!
//! The [`LabelEncoding`] is built once per assembly run from the sorted set
//! of all labels observed across all sources, which makes index assignment
//! reproducible regardless of file iteration order. After construction the
//! encoding is frozen: resolving a label that was absent at build time is a
//! fatal [`PipelineError::UnknownLabel`], never a silently minted index.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// One row of a frame-range label table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRow {
    /// First labeled frame, inclusive.
    pub start_frame: usize,
    /// One past the last labeled frame.
    pub end_frame: usize,
    /// Exercise label for the range.
    pub label: String,
}

/// A per-frame-range label table for one recording.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    rows: Vec<LabelRow>,
}

impl LabelTable {
    #[must_use]
    pub fn new(rows: Vec<LabelRow>) -> Self {
        Self { rows }
    }

    /// Parse a headerless CSV label table.
    ///
    /// Accepts the mm-fit layout `start_frame,end_frame,reps,exercise`
    /// (the rep count is ignored) as well as the plain three-column
    /// `start_frame,end_frame,label` form.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Csv`] on malformed CSV and
    /// [`PipelineError::Format`] on rows with bad frame numbers or column
    /// counts.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let (start, end, label) = match record.len() {
                3 => (&record[0], &record[1], &record[2]),
                4 => (&record[0], &record[1], &record[3]),
                n => {
                    return Err(PipelineError::Format(format!(
                        "label table row {line} has {n} columns, expected 3 or 4"
                    )))
                }
            };
            let start_frame: usize = start.parse().map_err(|_| {
                PipelineError::Format(format!("label table row {line}: bad start frame '{start}'"))
            })?;
            let end_frame: usize = end.parse().map_err(|_| {
                PipelineError::Format(format!("label table row {line}: bad end frame '{end}'"))
            })?;
            if end_frame < start_frame {
                return Err(PipelineError::Format(format!(
                    "label table row {line}: end frame {end_frame} before start frame {start_frame}"
                )));
            }
            rows.push(LabelRow {
                start_frame,
                end_frame,
                label: label.to_string(),
            });
        }
        Ok(Self { rows })
    }

    /// Load a label table from a CSV file on disk.
    ///
    /// # Errors
    ///
    /// Propagates I/O and parse errors.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_csv(file)
    }

    /// Label for frame `i`, if it falls inside a `[start, end)` range.
    #[must_use]
    pub fn label_for_frame(&self, frame: usize) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| frame >= r.start_frame && frame < r.end_frame)
            .map(|r| r.label.as_str())
    }

    /// All distinct labels appearing in the table.
    #[must_use]
    pub fn distinct_labels(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r.label.as_str()).collect();
        set.into_iter().collect()
    }

    #[must_use]
    pub fn rows(&self) -> &[LabelRow] {
        &self.rows
    }
}

/// Derive a label from a keypoint file name.
///
/// The extraction step names files `<exercise>_keypoints.<ext>`, so the
/// label is the file stem minus that suffix.
#[must_use]
pub fn label_from_filename(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let label = stem.strip_suffix("_keypoints").unwrap_or(stem);
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Frozen bidirectional mapping between exercise names and dense indices.
///
/// Index order is the sorted order of the label names, and equals the
/// classifier's output order. The encoding must outlive the pipeline run:
/// it is persisted next to the trained artifact so that inference-time
/// lookups match training-time indices exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoding {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoding {
    /// Build the encoding from every label observed in the run.
    ///
    /// Duplicates collapse; indices are assigned in sorted order so repeated
    /// runs over identical input produce identical encodings.
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        let names: Vec<String> = set.into_iter().collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Resolve a label to its frozen index.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownLabel`] for labels absent at build
    /// time. The encoding never mints a new index after construction.
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| PipelineError::UnknownLabel(label.to_string()))
    }

    /// Map a classifier output index back to its exercise name.
    #[must_use]
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of distinct exercises.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    /// Label names in index order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Persist the encoding as a JSON list whose order matches classifier
    /// output indices, readable by any downstream component.
    ///
    /// # Errors
    ///
    /// Propagates I/O and serialization errors.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.names)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously persisted encoding.
    ///
    /// # Errors
    ///
    /// Propagates I/O and deserialization errors.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let names: Vec<String> = serde_json::from_str(&json)?;
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Ok(Self { names, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_table_from_mmfit_csv() {
        let csv = "120,450,10,squats\n500,780,12,lunges\n";
        let table = LabelTable::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.label_for_frame(120), Some("squats"));
        assert_eq!(table.label_for_frame(449), Some("squats"));
        // end_frame is exclusive.
        assert_eq!(table.label_for_frame(450), None);
        assert_eq!(table.label_for_frame(500), Some("lunges"));
    }

    #[test]
    fn test_table_from_three_column_csv() {
        let csv = "0,5,plank\n5,9,squat\n";
        let table = LabelTable::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.label_for_frame(4), Some("plank"));
        assert_eq!(table.label_for_frame(5), Some("squat"));
    }

    #[test]
    fn test_table_rejects_bad_rows() {
        assert!(LabelTable::from_csv("ten,20,squat\n".as_bytes()).is_err());
        assert!(LabelTable::from_csv("20,10,squat\n".as_bytes()).is_err());
        assert!(LabelTable::from_csv("1,2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_distinct_labels_sorted() {
        let csv = "0,5,squat\n5,9,lunge\n9,12,squat\n";
        let table = LabelTable::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.distinct_labels(), vec!["lunge", "squat"]);
    }

    #[test]
    fn test_label_from_filename() {
        assert_eq!(
            label_from_filename(&PathBuf::from("training/pushup_keypoints.json")),
            Some("pushup".to_string())
        );
        assert_eq!(
            label_from_filename(&PathBuf::from("plank.json")),
            Some("plank".to_string())
        );
        assert_eq!(label_from_filename(&PathBuf::from("_keypoints.json")), None);
    }

    #[test]
    fn test_encoding_sorted_order() {
        // Order of observation must not matter.
        let enc = LabelEncoding::from_labels(["squat", "lunge", "squat"]);
        assert_eq!(enc.num_classes(), 2);
        assert_eq!(enc.index_of("lunge").unwrap(), 0);
        assert_eq!(enc.index_of("squat").unwrap(), 1);

        let reversed = LabelEncoding::from_labels(["lunge", "squat"]);
        assert_eq!(enc, reversed);
    }

    #[test]
    fn test_encoding_frozen() {
        let enc = LabelEncoding::from_labels(["squat"]);
        let err = enc.index_of("burpee").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownLabel(_)));
    }

    #[test]
    fn test_encoding_name_lookup() {
        let enc = LabelEncoding::from_labels(["squat", "lunge"]);
        assert_eq!(enc.name_of(0), Some("lunge"));
        assert_eq!(enc.name_of(1), Some("squat"));
        assert_eq!(enc.name_of(2), None);
    }

    #[test]
    fn test_encoding_save_load_roundtrip() {
        let enc = LabelEncoding::from_labels(["squat", "lunge", "pushup"]);
        let path = std::env::temp_dir().join("pose_dataset_test_labels.json");
        enc.save(&path).unwrap();
        let loaded = LabelEncoding::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(enc, loaded);
    }
}
