//! Byte loading for sprite assets: the filesystem natively, `fetch` on the web

use galaxy_core::{GalaxyError, Result};

/// Read the raw bytes behind `path`
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| GalaxyError::texture_load(path, e))
}

/// Fetch the raw bytes behind `path`, relative to the page
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |reason: String| GalaxyError::texture_load(path, reason);

    let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fail(format!("fetch failed: {:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fail("fetch did not return a Response".to_string()))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fail(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fail(format!("body read failed: {:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
