//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::JsCast;

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// JavaScript error from web-sys (including `QuotaExceededError`)
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Browser API missing in this context (e.g. no `window` in a worker)
    #[error("Browser API unavailable: {0}")]
    Unavailable(String),
}

impl WasmError {
    /// Wrap a thrown JavaScript value, prefixing the failing operation
    pub fn from_js(context: &str, js_value: wasm_bindgen::JsValue) -> Self {
        match WasmError::from(js_value) {
            WasmError::JavaScript(msg) => WasmError::JavaScript(format!("{context}: {msg}")),
            other => other,
        }
    }
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::Unavailable(what) => BridgeError::NotAvailable(what),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<wasm_bindgen::JsValue> for WasmError {
    fn from(js_value: wasm_bindgen::JsValue) -> Self {
        let msg = if js_value.is_string() {
            js_value
                .as_string()
                .unwrap_or_else(|| "Unknown error".to_string())
        } else if let Some(error) = js_value.dyn_ref::<js_sys::Error>() {
            error.message().into()
        } else {
            format!("{:?}", js_value)
        };
        WasmError::JavaScript(msg)
    }
}
