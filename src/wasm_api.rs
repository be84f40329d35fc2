//! WASM API exports for JavaScript interop
//!
//! Lets a page build a pool from JSON, query cell descriptions and start the
//! Bevy app on a canvas. Only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use parking_lot::Mutex;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::claims::ClaimRecord;
use crate::core::PoolConfig;
use crate::grid::CellId;
use crate::hover::HoverReporter;
use crate::runtime::run_pool;

/// JavaScript-accessible pool wrapper
#[wasm_bindgen]
pub struct JsBetCube {
    config: Arc<Mutex<PoolConfig>>,
    canvas_id: String,
    started: bool,
}

#[wasm_bindgen]
impl JsBetCube {
    /// Create a pool from (possibly partial) JSON config
    ///
    /// # Arguments
    /// * `json` - JSON string for `PoolConfig`; `"{}"` gives the defaults
    /// * `canvas_id` - HTML canvas element ID (without #)
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, canvas_id: &str) -> Result<JsBetCube, JsValue> {
        let config = PoolConfig::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse pool config: {e:?}")))?;

        Ok(JsBetCube {
            config: Arc::new(Mutex::new(config)),
            canvas_id: canvas_id.to_string(),
            started: false,
        })
    }

    /// Start the Bevy render loop. Claims set after this point are not
    /// picked up by the running app.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        if self.started {
            web_sys::console::warn_1(&"Bet cube already started".into());
            return;
        }
        let config = self.config.lock().clone();
        self.started = true;
        run_pool(config, &self.canvas_id);
    }

    /// Tooltip text for a cell id
    #[wasm_bindgen]
    pub fn describe(&self, id: u32) -> Result<String, JsValue> {
        let config = self.config.lock();
        let indexer = config.indexer();
        let claims = config.claim_book();
        HoverReporter::new(&indexer, &claims)
            .describe(CellId(id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record a claim before starting
    #[wasm_bindgen]
    pub fn claim(&mut self, id: u32, owner: &str) -> Result<(), JsValue> {
        let mut config = self.config.lock();
        let total = config.dims.total();
        if id >= total {
            return Err(JsValue::from_str(&format!(
                "cell {id} is outside the grid of {total} cells"
            )));
        }
        config.claims.insert(id, ClaimRecord::claimed_by(owner));
        Ok(())
    }

    /// Total number of cells
    #[wasm_bindgen(getter)]
    pub fn total_cells(&self) -> u32 {
        self.config.lock().dims.total()
    }

    /// Current config as JSON
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.config
            .lock()
            .to_json()
            .map_err(|e| JsValue::from_str(&format!("{e:?}")))
    }
}
