// Tynne PyO3-innpakninger rundt JSON-inngangene i `crate::api`.
// Alle tar og returnerer JSON-strenger; feil blir ValueError.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::api;

fn to_py_err(e: crate::error::ApiError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyfunction]
fn recommend_pressure_json(json_in: &str) -> PyResult<String> {
    api::recommend_pressure_json(json_in).map_err(to_py_err)
}

#[pyfunction]
fn compensate_json(json_in: &str) -> PyResult<String> {
    api::compensate_json(json_in).map_err(to_py_err)
}

#[pyfunction]
fn recommend_headings_json(json_in: &str) -> PyResult<String> {
    api::recommend_headings_json(json_in).map_err(to_py_err)
}

#[pyfunction]
fn wind_components_json(json_in: &str) -> PyResult<String> {
    api::wind_components_json(json_in).map_err(to_py_err)
}

#[pyfunction]
fn compass16(deg: f64) -> &'static str {
    crate::wind::compass16(deg)
}

/// Prometheus-tekst for prosessens globale tellere
#[pyfunction]
fn metrics_text() -> PyResult<String> {
    match &*crate::metrics::GLOBAL {
        Some(m) => m.render().map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(String::new()),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn ridetune_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(recommend_pressure_json, m)?)?;
    m.add_function(wrap_pyfunction!(compensate_json, m)?)?;
    m.add_function(wrap_pyfunction!(recommend_headings_json, m)?)?;
    m.add_function(wrap_pyfunction!(wind_components_json, m)?)?;
    m.add_function(wrap_pyfunction!(compass16, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
