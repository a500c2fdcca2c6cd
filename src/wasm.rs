//! WASM bindings for in-browser section folding.
//!
//! This module exposes the retrofit pipeline to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::fold;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Fold the section region of an HTML document into disclosure widgets.
///
/// Takes the document markup and returns the rewritten markup, using the
/// default region selector and separator class. Markup without the
/// region comes back unchanged.
#[wasm_bindgen]
pub fn fold_html(html: &str) -> Result<String, JsValue> {
    let summary = fold::fold_html(html, &Config::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(summary.html)
}

/// Like [`fold_html`], but the produced widgets start collapsed.
#[wasm_bindgen]
pub fn fold_html_closed(html: &str) -> Result<String, JsValue> {
    let config = Config {
        default_open: false,
        ..Config::default()
    };
    let summary =
        fold::fold_html(html, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(summary.html)
}
