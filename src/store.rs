// src/store.rs
//! Persisted dataset: one CSV file, header + one row per record, ascending.
//!
//! Loading is strict. A file we cannot fully account for is a fatal error,
//! since rewriting it would silently drop history.

use std::{fs, io, path::Path};

use tracing::debug;

use crate::calendar::CalendarMonth;
use crate::config::consts::{DATASET_HEADERS, DATASET_SEP};
use crate::csv::{parse_rows, write_row};
use crate::data::{Dataset, Record};
use crate::error::Error;
use crate::file::{ensure_parent, write_atomic};

/// Missing or empty file → empty dataset.
pub fn load_dataset(path: &Path) -> Result<Dataset, Error> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no dataset yet");
            return Ok(Dataset::new());
        }
        Err(source) => return Err(Error::DatasetRead { path: path.to_path_buf(), source }),
    };
    parse_dataset(&text, path)
}

/// Parse dataset text. `path` is only used in error messages.
pub fn parse_dataset(text: &str, path: &Path) -> Result<Dataset, Error> {
    let corrupt = |line: usize, reason: String| Error::CorruptDataset {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut rows = parse_rows(text, DATASET_SEP).into_iter();
    let mut ds = Dataset::new();

    let Some(header) = rows.next() else { return Ok(ds); };
    // Fields are trimmed here and in every data row alike.
    if header.fields.iter().map(|f| f.trim()).ne(DATASET_HEADERS) {
        return Err(corrupt(header.line, format!("unexpected header {:?}", header.fields)));
    }

    for row in rows {
        let [cal, pd, diff] = row.fields.as_slice() else {
            return Err(corrupt(row.line, format!("expected 3 fields, found {}", row.fields.len())));
        };
        let cal: CalendarMonth = cal.trim().parse().map_err(|e| corrupt(row.line, format!("{e}")))?;
        let pd: CalendarMonth = pd.trim().parse().map_err(|e| corrupt(row.line, format!("{e}")))?;
        let diff: i32 = diff
            .trim()
            .parse()
            .map_err(|_| corrupt(row.line, format!("time difference '{diff}' is not an integer")))?;
        let rec = Record::from_parts(cal, pd, diff).map_err(|e| corrupt(row.line, e))?;
        if !ds.insert_new(rec) {
            return Err(corrupt(row.line, format!("duplicate calendar date {cal}")));
        }
    }
    Ok(ds)
}

/// The exact bytes `save_dataset` writes.
pub fn render_dataset(ds: &Dataset) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_row(&mut buf, &DATASET_HEADERS, DATASET_SEP);
    for rec in ds {
        let _ = write_row(&mut buf, &rec.to_row(), DATASET_SEP);
    }
    buf
}

/// Atomically replace the dataset file; the old file survives any failure.
pub fn save_dataset(path: &Path, ds: &Dataset) -> Result<(), Error> {
    let write_err = |source| Error::DatasetWrite { path: path.to_path_buf(), source };
    ensure_parent(path).map_err(write_err)?;
    write_atomic(path, &render_dataset(ds)).map_err(write_err)?;
    debug!(path = %path.display(), records = ds.len(), "dataset saved");
    Ok(())
}
