use crate::interop::{new_obj, set_kv, to_js};
use roofquote::{ApiError, ConfigError, FlowError};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

/// `ok` envelope around any serializable value.
pub fn ok_ser<T: Serialize + ?Sized>(v: &T) -> JsValue {
    match to_js(v) {
        Ok(js) => ok(js),
        Err(e) => err("serialize", e.to_string(), None),
    }
}

pub fn err(code: &str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_index(kind: &str, index: usize) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "index", &JsValue::from_f64(index as f64));
    err("invalid_index", format!("invalid {} index", kind), Some(d.into()))
}

#[inline]
pub fn validation(message: impl Into<String>) -> JsValue { err("validation", message, None) }

pub fn from_config(e: &ConfigError) -> JsValue {
    match e {
        ConfigError::OutOfRange { param, min, max, got } => out_of_range(param, *min, *max, *got),
        other => err(other.code(), other.to_string(), None),
    }
}

pub fn from_api(e: &ApiError) -> JsValue {
    match e {
        ApiError::Status { status, .. } => {
            let d = new_obj(); set_kv(&d, "status", &JsValue::from_f64(*status as f64));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        _ => err(e.code(), e.to_string(), None),
    }
}

pub fn from_flow(e: &FlowError) -> JsValue {
    match e {
        FlowError::Api { message, source } => {
            let d = new_obj(); set_kv(&d, "detail", &JsValue::from_str(&source.to_string()));
            err(e.code(), message.clone(), Some(d.into()))
        }
        _ => err(e.code(), e.to_string(), None),
    }
}
