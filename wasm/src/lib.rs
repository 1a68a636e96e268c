//! Peso Coach WASM bindings
//!
//! Lets a browser run the engine on its locally stored state. Inputs and
//! outputs are JSON strings in the same shape the backend exports; failures
//! surface as JS exceptions.

use chrono::NaiveDate;
use peso_coach_shared::moving_average::simple_moving_average;
use peso_coach_shared::{run_projection, summarize, CoachState};
use wasm_bindgen::prelude::*;

fn parse_date(date_iso: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_iso, "%Y-%m-%d").map_err(|e| format!("invalid date {:?}: {}", date_iso, e))
}

fn parse_state(state_json: &str) -> Result<CoachState, String> {
    serde_json::from_str(state_json).map_err(|e| format!("invalid state: {}", e))
}

fn summarize_inner(state_json: &str, date_iso: &str) -> Result<String, String> {
    let state = parse_state(state_json)?;
    let summary = summarize(&state.logs, &state.settings, parse_date(date_iso)?).map_err(|e| e.to_string())?;
    serde_json::to_string(&summary).map_err(|e| e.to_string())
}

fn project_inner(state_json: &str, today_iso: &str) -> Result<String, String> {
    let state = parse_state(state_json)?;
    let run = run_projection(&state.logs, &state.settings, parse_date(today_iso)?).map_err(|e| e.to_string())?;
    serde_json::to_string(&run).map_err(|e| e.to_string())
}

/// Week summary for `date_iso` (YYYY-MM-DD) over a `{logs, settings}` state
#[wasm_bindgen(js_name = summarizeJson)]
pub fn summarize_json(state_json: &str, date_iso: &str) -> Result<String, JsError> {
    summarize_inner(state_json, date_iso).map_err(|e| JsError::new(&e))
}

/// Projection run from the latest logged state
#[wasm_bindgen(js_name = projectJson)]
pub fn project_json(state_json: &str, today_iso: &str) -> Result<String, JsError> {
    project_inner(state_json, today_iso).map_err(|e| JsError::new(&e))
}

/// Partial-window moving average
#[wasm_bindgen(js_name = movingAverage)]
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>, JsError> {
    simple_moving_average(values, window).map_err(|e| JsError::new(&e.to_string()))
}
