//! Python bindings for legal risk core using PyO3

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyFrozenSet, PyInt, PyList, PySet, PyString, PyTuple};
use serde_json::{Map, Number, Value};

use crate::analyzer::LegalAnalyzer;
use crate::config::AnalyzerConfig;
use crate::entities::EntityCollection;
use crate::error::AnalyzerError;
use crate::similarity::text_similarity;
use crate::types::AnalysisResult;

impl From<AnalyzerError> for PyErr {
    fn from(error: AnalyzerError) -> Self {
        PyValueError::new_err(error.to_string())
    }
}

/// Calculate similarity between two strings (Python function)
#[pyfunction]
#[pyo3(name = "calculate_similarity")]
pub fn py_calculate_similarity(a: &str, b: &str) -> f64 {
    text_similarity(a, b)
}

/// Install a console tracing subscriber. Later calls are no-ops.
#[pyfunction]
#[pyo3(name = "init_logging", signature = (filter = None))]
pub fn py_init_logging(filter: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// Python wrapper for the analyzer. Results cross the boundary as JSON strings.
#[pyclass(name = "LegalAnalyzer")]
pub struct PyLegalAnalyzer {
    analyzer: LegalAnalyzer,
}

#[pymethods]
impl PyLegalAnalyzer {
    #[new]
    #[pyo3(signature = (config_json = None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => AnalyzerConfig::from_json_str(json)?,
            None => AnalyzerConfig::default(),
        };
        Ok(Self {
            analyzer: LegalAnalyzer::new(config)?,
        })
    }

    /// Analyze text with the built-in entity extractor and summarizer
    fn analyze(&self, py: Python<'_>, text: &str) -> PyResult<String> {
        let result = py.allow_threads(|| self.analyzer.analyze(text));
        to_json(&result)
    }

    /// Analyze text with entities (dict of category -> iterable of str) and a
    /// summary produced by the host application
    fn analyze_with(
        &self,
        py: Python<'_>,
        text: &str,
        entities: &Bound<'_, PyAny>,
        summary: &str,
    ) -> PyResult<String> {
        let entities = extract_entities(entities)?;
        let result = py.allow_threads(|| self.analyzer.analyze_with(text, entities, summary));
        to_json(&result)
    }

    /// Compare two analysis results previously returned by `analyze`
    fn compare(&self, py: Python<'_>, doc1_json: &str, doc2_json: &str) -> PyResult<String> {
        let doc1 = parse_analysis(doc1_json)?;
        let doc2 = parse_analysis(doc2_json)?;
        let comparison = py.allow_threads(|| self.analyzer.compare(&doc1, &doc2));
        to_json(&comparison)
    }
}

/// Entities cross into Rust as JSON so `EntityCollection::from_json` is the
/// one place their shape is validated.
fn extract_entities(entities: &Bound<'_, PyAny>) -> Result<EntityCollection, AnalyzerError> {
    let value = to_json_value(entities)
        .map_err(|e| AnalyzerError::MalformedInput(format!("entities: {}", e)))?;
    EntityCollection::from_json(&value)
}

fn to_json_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    // bool before int: Python bools are ints
    if let Ok(flag) = obj.downcast::<PyBool>() {
        return Ok(Value::Bool(flag.is_true()));
    }
    if let Ok(text) = obj.downcast::<PyString>() {
        return Ok(Value::String(text.to_cow()?.into_owned()));
    }
    if obj.is_instance_of::<PyInt>() {
        return Ok(Value::from(obj.extract::<i64>()?));
    }
    if let Ok(number) = obj.downcast::<PyFloat>() {
        return Ok(Number::from_f64(number.value()).map_or(Value::Null, Value::Number));
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        let mut object = Map::new();
        for (key, item) in dict.iter() {
            let key = key
                .downcast::<PyString>()
                .map_err(|_| PyValueError::new_err("keys must be strings"))?
                .to_cow()?
                .into_owned();
            object.insert(key, to_json_value(&item)?);
        }
        return Ok(Value::Object(object));
    }
    if obj.is_instance_of::<PyList>()
        || obj.is_instance_of::<PyTuple>()
        || obj.is_instance_of::<PySet>()
        || obj.is_instance_of::<PyFrozenSet>()
    {
        let items = obj
            .iter()?
            .map(|item| item.and_then(|item| to_json_value(&item)))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(Value::Array(items));
    }
    Err(PyValueError::new_err(format!(
        "unsupported value of type {}",
        obj.get_type().name()?
    )))
}

fn parse_analysis(json: &str) -> Result<AnalysisResult, AnalyzerError> {
    serde_json::from_str(json).map_err(|e| AnalyzerError::MalformedInput(e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("Failed to serialize result: {}", e)))
}
