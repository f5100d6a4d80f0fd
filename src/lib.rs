//! Legal risk core - clause detection, risk scoring and document comparison
//!
//! This crate scores cleaned contract text against a weighted rule table and
//! compares two analyzed documents clause by clause. Entity extraction and
//! summarization are pluggable collaborators; the Python bindings accept their
//! output from the host application.

pub mod types;
pub mod error;
pub mod config;
pub mod patterns;
pub mod similarity;
pub mod matcher;
pub mod entities;
pub mod summary;
pub mod scorer;
pub mod comparator;
pub mod critical;
pub mod overall;
pub mod analyzer;

pub use types::*;
pub use error::{AnalyzerError, Result};
pub use config::*;
pub use similarity::*;
pub use matcher::*;
pub use entities::*;
pub use summary::*;
pub use scorer::*;
pub use comparator::*;
pub use critical::*;
pub use overall::*;
pub use analyzer::*;

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn legal_risk_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyLegalAnalyzer>()?;
    m.add_function(wrap_pyfunction!(py_calculate_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(py_init_logging, m)?)?;
    Ok(())
}
