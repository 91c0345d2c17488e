use js_sys::{Reflect, JSON};
use roofquote_wasm::{init_logging, RoofQuoteApp};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn is_err(v: &JsValue, code: &str) -> bool {
    if get(v, "ok").as_bool() != Some(false) {
        return false;
    }
    get(&get(v, "error"), "code").as_string().map_or(false, |c| c == code)
}

fn app() -> RoofQuoteApp {
    RoofQuoteApp::new(None, JsValue::UNDEFINED).expect("default config is valid")
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected_with_typed_error() {
    let bad = JSON::parse(r#"{"canvas_width": 0}"#).unwrap();
    let e = RoofQuoteApp::new(None, bad).err().expect("zero width rejected");
    assert!(is_err(&e, "out_of_range"));
    assert_eq!(get(&get(&get(&e, "error"), "data"), "param").as_string().as_deref(), Some("canvas_width"));

    let bad = JSON::parse(r#"{"api_base_url": "ftp://example"}"#).unwrap();
    assert!(is_err(&RoofQuoteApp::new(None, bad).err().unwrap(), "invalid_config"));

    let bad = JSON::parse(r#"{"debounce_ms": 4000000000}"#).unwrap();
    assert!(is_err(&RoofQuoteApp::new(None, bad).err().unwrap(), "out_of_range"));

    let bad = JSON::parse(r#"{"satellite_zoom": "close"}"#).unwrap();
    assert!(is_err(&RoofQuoteApp::new(None, bad).err().unwrap(), "invalid_config"));
}

#[wasm_bindgen_test]
fn partial_config_keeps_defaults() {
    let cfg = JSON::parse(r#"{"api_base_url": "https://api.example.com/", "debounce_ms": 50}"#).unwrap();
    let app = RoofQuoteApp::new(None, cfg).unwrap();
    let c = get(&app.config(), "value");
    assert_eq!(get(&c, "api_base_url").as_string().as_deref(), Some("https://api.example.com/"));
    assert_eq!(get(&c, "debounce_ms").as_f64(), Some(50.0));
    assert_eq!(get(&c, "canvas_width").as_f64(), Some(800.0));
}

#[wasm_bindgen_test]
fn numeric_inputs_are_checked() {
    let app = app();
    assert!(is_err(&app.set_scale_factor_res(f64::NAN), "non_finite"));
    assert!(is_err(&app.set_scale_factor_res(-1.0), "out_of_range"));
    assert!(is_err(&app.click_res(f64::INFINITY, 1.0), "non_finite"));
    assert!(is_err(&app.move_point_res(0, 1.0, 1.0), "invalid_index"));
    let ok = app.set_scale_factor_res(0.5);
    assert_eq!(get(&ok, "ok").as_bool(), Some(true));
    assert_eq!(get(&app.state(), "scale_factor").as_f64(), Some(0.5));
}

#[wasm_bindgen_test]
fn unknown_log_level_is_a_validation_error() {
    assert!(is_err(&init_logging("loud"), "validation"));
    assert_eq!(get(&init_logging("warn"), "value").as_string().as_deref(), Some("warn"));
}

#[wasm_bindgen_test]
async fn flow_validation_needs_no_network() {
    let app = app();
    // Blank address
    let r = JsFuture::from(app.submit_address()).await.unwrap();
    assert!(is_err(&r, "validation"));
    // Nothing to calculate before an address is located
    let r = JsFuture::from(app.calculate()).await.unwrap();
    assert!(is_err(&r, "validation"));
    assert_eq!(get(&app.state(), "phase").as_string().as_deref(), Some("address_entry"));
}
