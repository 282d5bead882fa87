//! Python bindings for `ebnflint`.
//!
//! Both functions return the result document as a JSON string; unknown
//! level or depth names raise `ValueError`.
use ebnflint::{AnalysisDepth, ValidationLevel};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Validates grammar text and returns the verdict as JSON.
#[pyfunction]
#[pyo3(signature = (text, level = "strict"))]
fn validate(text: &str, level: &str) -> PyResult<String> {
    let level: ValidationLevel = level
        .parse()
        .map_err(|e: ebnflint::LintError| PyValueError::new_err(e.to_string()))?;
    Ok(facet_json::to_string(&ebnflint::validate(text, level)))
}

/// Analyzes grammar text and returns the report as JSON.
#[pyfunction]
#[pyo3(signature = (text, depth = "comprehensive"))]
fn analyze(text: &str, depth: &str) -> PyResult<String> {
    let depth: AnalysisDepth = depth
        .parse()
        .map_err(|e: ebnflint::LintError| PyValueError::new_err(e.to_string()))?;
    Ok(facet_json::to_string(&ebnflint::analyze(text, depth)))
}

#[pymodule]
fn _ebnflint(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(validate, m)?)?;
    m.add_function(wrap_pyfunction!(analyze, m)?)?;
    Ok(())
}
