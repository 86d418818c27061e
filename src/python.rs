//! Python bindings for readprep

use pyo3::prelude::*;
use pyo3::{create_exception, wrap_pyfunction};

use crate::config::ProcessingConfig;
use crate::filter::ProcessedRecord;
use crate::pipeline::{export_fasta as rs_export_fasta, preprocess as rs_preprocess};

create_exception!(readprep, ReadprepError, pyo3::exceptions::PyException);

// Avoid some boilerplate with the error handling
macro_rules! py_try {
    ($call:expr) => {
        $call.map_err(|e| PyErr::new::<ReadprepError, _>(format!("{}", e)))?
    };
}

#[pyclass]
#[derive(Clone)]
pub struct Record {
    #[pyo3(get)]
    id: String,
    #[pyo3(get)]
    sequence: String,
    #[pyo3(get)]
    length: usize,
    #[pyo3(get)]
    quality: Option<String>,
    #[pyo3(get)]
    avg_error: Option<f64>,
}

impl From<ProcessedRecord> for Record {
    fn from(rec: ProcessedRecord) -> Self {
        Self {
            id: rec.id,
            sequence: rec.sequence,
            length: rec.length,
            quality: rec.quality,
            avg_error: rec.avg_error,
        }
    }
}

impl From<Record> for ProcessedRecord {
    fn from(rec: Record) -> Self {
        Self {
            id: rec.id,
            sequence: rec.sequence,
            length: rec.length,
            quality: rec.quality,
            avg_error: rec.avg_error,
        }
    }
}

/// Sequences over 40 characters shown as their first 34 and last 3
fn preview(seq: &str) -> String {
    let n = seq.chars().count();
    if n <= 40 {
        return seq.to_string();
    }
    let start: String = seq.chars().take(34).collect();
    let end: String = seq.chars().skip(n - 3).collect();
    format!("{}...{}", start, end)
}

#[pymethods]
impl Record {
    pub fn has_quality(&self) -> bool {
        self.quality.is_some()
    }

    pub fn __eq__(&self, other: &Record) -> bool {
        self.id == other.id && self.sequence == other.sequence && self.quality == other.quality
    }

    pub fn __len__(&self) -> usize {
        self.length
    }

    pub fn __str__(&self) -> String {
        format!(">{}\n{}", self.id, self.sequence)
    }

    fn __repr__(&self) -> String {
        let seq_preview = preview(&self.sequence);
        match self.avg_error {
            Some(avg_error) => format!(
                "Record(id={}, sequence={}, avg_error={})",
                self.id, seq_preview, avg_error
            ),
            None => format!("Record(id={}, sequence={})", self.id, seq_preview),
        }
    }
}

#[pyfunction]
#[pyo3(signature = (
    content,
    filename,
    const5p = "",
    const3p = "",
    min_length = 10,
    max_length = 100,
    max_error = 0.005
))]
#[allow(clippy::too_many_arguments)]
fn preprocess(
    content: &[u8],
    filename: &str,
    const5p: &str,
    const3p: &str,
    min_length: usize,
    max_length: usize,
    max_error: f64,
) -> PyResult<Vec<Record>> {
    let config = py_try!(ProcessingConfig::new(min_length, max_length, max_error))
        .with_const5p(const5p)
        .with_const3p(const3p);
    let records = py_try!(rs_preprocess(content, filename, &config));
    Ok(records.into_iter().map(Record::from).collect())
}

#[pyfunction]
fn export_fasta(records: Vec<Record>) -> PyResult<String> {
    let records: Vec<ProcessedRecord> = records.into_iter().map(ProcessedRecord::from).collect();
    Ok(py_try!(rs_export_fasta(&records)))
}

#[pymodule]
fn readprep(py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Record>()?;
    m.add_wrapped(wrap_pyfunction!(preprocess))?;
    m.add_wrapped(wrap_pyfunction!(export_fasta))?;
    m.add("ReadprepError", py.get_type_bound::<ReadprepError>())?;

    Ok(())
}
