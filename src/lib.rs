pub mod catalog;
pub mod datapackage;
pub mod graph;
pub mod measure;
pub mod session;
pub mod summary;
pub mod ui;

use wasm_bindgen::prelude::*;

use catalog::Dataset;
use datapackage::ImportMode;
use session::Session;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Explorer state held by the page between uploads.
#[wasm_bindgen]
pub struct Explorer {
    session: Session,
}

#[wasm_bindgen]
impl Explorer {
    /// `mode` is `"filter"` (default) or `"resynthesize"`.
    #[wasm_bindgen(constructor)]
    pub fn new(mode: Option<String>) -> Result<Explorer, String> {
        let mode = import_mode(mode.as_deref())?;
        let bundled = Dataset::bundled().map_err(|e| e.to_string())?;
        Ok(Explorer {
            session: Session::new(bundled, mode),
        })
    }

    /// Graph elements for the renderer: `{nodes: [{data}], edges: [{data}]}`.
    pub fn graph(&self) -> Result<JsValue, String> {
        let json = self.session.graph().to_json().map_err(|e| e.to_string())?;
        to_js(&json)
    }

    pub fn focal(&self) -> String {
        self.session.focal().to_string()
    }

    #[wasm_bindgen(js_name = "setFocal")]
    pub fn set_focal(&mut self, name: &str) -> bool {
        self.session.set_focal(name)
    }

    /// Import the text of an uploaded `datapackage.json`. The error is the
    /// message to show the user; the previous graph stays valid.
    pub fn upload(&mut self, text: &str) -> Result<(), String> {
        self.session.upload(text).map_err(|e| e.to_string())
    }

    /// Enablement of the given table links and of every category checkbox.
    #[wasm_bindgen(js_name = "uiState")]
    pub fn ui_state(&self, link_targets: Vec<String>) -> Result<JsValue, String> {
        let state = self.session.ui_state(&link_targets);
        let json = serde_json::to_string(&state).map_err(|e| e.to_string())?;
        to_js(&json)
    }

    /// Documentation of a table, or `undefined` when it is not in the dataset.
    pub fn describe(&self, name: &str) -> Result<JsValue, String> {
        match self.session.describe(name) {
            Some(schema) => {
                let json = serde_json::to_string(schema).map_err(|e| e.to_string())?;
                to_js(&json)
            }
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}

fn import_mode(mode: Option<&str>) -> Result<ImportMode, String> {
    match mode {
        Some(s) => ImportMode::from_str(s).ok_or_else(|| format!("Unknown import mode: {}", s)),
        None => Ok(ImportMode::default()),
    }
}

fn to_js(json: &str) -> Result<JsValue, String> {
    js_sys::JSON::parse(json).map_err(|e| format!("{:?}", e))
}

/// Graph JSON for a datapackage without keeping any state.
#[wasm_bindgen(js_name = "datapackageToGraph")]
pub fn datapackage_to_graph(text: &str, mode: Option<String>) -> Result<String, String> {
    let mode = import_mode(mode.as_deref())?;
    let bundled = Dataset::bundled().map_err(|e| e.to_string())?;

    let import = datapackage::import_datapackage(text, mode, &bundled).map_err(|e| e.to_string())?;
    let edges = import.dataset.renderable_predicates();
    graph::build_graph_data(&import.dataset.schemas, &edges)
        .to_json()
        .map_err(|e| e.to_string())
}
