use wasm_bindgen::prelude::*;

use crate::options::ParseOptions;
use crate::ply_points_core::{
    parse_point_cloud_core, parse_point_cloud_core_with_opts, PointCloudBuffersCore,
};

#[wasm_bindgen]
pub struct PointCloudBuffers {
    inner: PointCloudBuffersCore,
}

#[wasm_bindgen]
impl PointCloudBuffers {
    #[wasm_bindgen(getter)]
    pub fn count(&self) -> u32 {
        self.inner.count
    }

    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> js_sys::Float32Array {
        unsafe { js_sys::Float32Array::view(&self.inner.positions) }
    }

    #[wasm_bindgen(getter)]
    pub fn colors(&self) -> js_sys::Float32Array {
        unsafe { js_sys::Float32Array::view(&self.inner.colors) }
    }

    #[wasm_bindgen(getter, js_name = bboxMin)]
    pub fn bbox_min(&self) -> js_sys::Float32Array {
        unsafe { js_sys::Float32Array::view(&self.inner.bbox_min) }
    }

    #[wasm_bindgen(getter, js_name = bboxMax)]
    pub fn bbox_max(&self) -> js_sys::Float32Array {
        unsafe { js_sys::Float32Array::view(&self.inner.bbox_max) }
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform.scale
    }

    #[wasm_bindgen(getter)]
    pub fn center(&self) -> js_sys::Float64Array {
        unsafe { js_sys::Float64Array::view(&self.inner.transform.center) }
    }

    #[wasm_bindgen(getter)]
    pub fn rejected(&self) -> u32 {
        self.inner.stats.rejected as u32
    }

    #[wasm_bindgen(getter)]
    pub fn filtered(&self) -> u32 {
        self.inner.stats.filtered as u32
    }
}

#[wasm_bindgen]
pub fn parse_point_cloud(bytes: &[u8]) -> Result<PointCloudBuffers, JsValue> {
    let inner = parse_point_cloud_core(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(PointCloudBuffers { inner })
}

#[wasm_bindgen]
pub fn parse_point_cloud_with_opts(
    bytes: &[u8],
    max_coord: f64,
    target_span: f64,
) -> Result<PointCloudBuffers, JsValue> {
    let opts = ParseOptions {
        max_coord,
        target_span,
    };
    let inner = parse_point_cloud_core_with_opts(bytes, &opts)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(PointCloudBuffers { inner })
}
