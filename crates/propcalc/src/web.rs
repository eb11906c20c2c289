//! Browser entry point.
//!
//! Exposes the comparison controller to JavaScript as [`ScenarioComparison`].
//! The page owns the calculator form and pushes its values in with
//! [`ScenarioComparison::set_form`]; everything else crosses the boundary as
//! JSON strings.

use std::sync::Once;

use jiff::Timestamp;
use propcalc_core::{CalculatorType, Comparison, ParamValue, Params, ScenarioId};
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::bridge::{ComparisonView, FormBridge};
use crate::config::AppConfig;
use crate::controller::{ComparisonController, Preview};
use crate::platform::web::LocalStoragePersistence;

static INIT: Once = Once::new();

/// Route panics and `tracing` output to the browser console
fn init_logging_web() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
        tracing::info!("propcalc web starting");
    });
}

/// Form values last pushed by the page
#[derive(Debug, Default)]
struct PageForm {
    calculator: CalculatorType,
    params: Params,
}

impl FormBridge for PageForm {
    fn capture_current_params(&self) -> Params {
        self.params.clone()
    }

    fn calculator_type(&self) -> CalculatorType {
        self.calculator
    }
}

/// Keeps the serialized comparison for the page to pick up
#[derive(Debug, Default)]
struct JsonView {
    json: Option<String>,
}

impl ComparisonView for JsonView {
    fn render_comparison(&mut self, comparison: &Comparison) {
        self.json = serde_json::to_string(comparison)
            .map_err(|e| tracing::error!(error = %e, "Failed to serialize comparison"))
            .ok();
    }

    fn clear_comparison(&mut self) {
        self.json = None;
    }
}

fn js_error(message: impl std::fmt::Display) -> JsError {
    JsError::new(&message.to_string())
}

#[wasm_bindgen]
pub struct ScenarioComparison {
    controller: ComparisonController<LocalStoragePersistence, PageForm>,
}

#[wasm_bindgen]
impl ScenarioComparison {
    /// Create the controller. `config_yaml` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_yaml: &str) -> Result<ScenarioComparison, JsError> {
        init_logging_web();

        let config = if config_yaml.trim().is_empty() {
            AppConfig::default()
        } else {
            AppConfig::from_yaml(config_yaml).map_err(js_error)?
        };

        Ok(Self {
            controller: ComparisonController::new(
                LocalStoragePersistence::new(),
                PageForm::default(),
                &config,
            ),
        })
    }

    /// Replace the form snapshot. `params_json` is an object of field values
    /// in form order; numbers may also arrive as user-typed text.
    #[wasm_bindgen(js_name = setForm)]
    pub fn set_form(&mut self, calculator: &str, params_json: &str) -> Result<(), JsError> {
        let raw: Params = serde_json::from_str(params_json).map_err(js_error)?;
        let params = raw
            .iter()
            .filter_map(|(key, value)| match value {
                ParamValue::Text(text) if text.trim().is_empty() => None,
                ParamValue::Text(text) => Some((key, ParamValue::from_input(text))),
                other => Some((key, other.clone())),
            })
            .collect();

        let form = self.controller.form_mut();
        form.calculator = CalculatorType::from_tag_lossy(calculator);
        form.params = params;
        self.controller.field_edited(Instant::now());
        Ok(())
    }

    /// Add the current form as a scenario. Returns the new id, or `undefined`
    /// when it was rejected (see [`notification`](Self::notification)).
    #[wasm_bindgen(js_name = addCurrent)]
    pub fn add_current(&mut self, name: &str) -> Option<u64> {
        self.controller.add_current(name).map(|id| id.0)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        self.controller.remove(ScenarioId(id))
    }

    /// Clear every scenario. The page asks the user before calling this.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) {
        if self.controller.request_clear() {
            self.controller.confirm_clear();
        }
    }

    /// Advance timers; returns whether the page should re-read its state
    pub fn tick(&mut self) -> bool {
        self.controller.tick(Instant::now())
    }

    /// Stored scenarios as a JSON array
    #[wasm_bindgen(js_name = scenariosJson)]
    pub fn scenarios_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.controller.store().list()).map_err(js_error)
    }

    /// The comparison as JSON, or `undefined` with fewer than two scenarios
    #[wasm_bindgen(js_name = comparisonJson)]
    pub fn comparison_json(&self) -> Option<String> {
        let mut view = JsonView::default();
        self.controller.present(&mut view);
        view.json
    }

    /// Live metrics of the form as a JSON object, or `undefined`
    #[wasm_bindgen(js_name = previewJson)]
    pub fn preview_json(&self) -> Option<String> {
        match self.controller.preview() {
            Preview::Ready(results) => serde_json::to_string(&results.to_metric_map()).ok(),
            Preview::Empty | Preview::Invalid(_) => None,
        }
    }

    /// Why the form produces no metrics, if it doesn't
    #[wasm_bindgen(js_name = previewError)]
    pub fn preview_error(&self) -> Option<String> {
        match self.controller.preview() {
            Preview::Invalid(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Current notification message
    pub fn notification(&self) -> Option<String> {
        self.controller.notification().map(|n| n.message.clone())
    }

    #[wasm_bindgen(js_name = dismissNotification)]
    pub fn dismiss_notification(&mut self) {
        self.controller.dismiss_notification();
    }

    /// Pretty JSON export of every scenario
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&mut self) -> Option<String> {
        self.controller
            .export_json(Timestamp::now())
            .map(|file| file.contents)
    }

    /// CSV export of the comparison table
    #[wasm_bindgen(js_name = exportCsv)]
    pub fn export_csv(&mut self) -> Option<String> {
        self.controller
            .export_csv(Timestamp::now())
            .map(|file| file.contents)
    }

    /// Suggested download name for an export taken now
    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(extension: &str) -> String {
        propcalc_core::export::export_file_name(Timestamp::now(), extension)
    }
}
