use crate::{error, interop, timer, Inner, RoofQuoteApp, StateView};
use js_sys::Promise;
use roofquote::editor::PointerInput;
use roofquote::geometry::limits;
use roofquote::{Config, Key, KeyOutcome, Point};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `log` output to the browser console. `level` is one of
/// off/error/warn/info/debug/trace.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> JsValue {
    match crate::console::parse_level(level) {
        Some(filter) => {
            crate::console::install(filter);
            error::ok(JsValue::from_str(&filter.to_string().to_lowercase()))
        }
        None => error::validation(format!("unknown log level '{}'", level)),
    }
}

fn read_config(v: JsValue) -> Result<Config, JsValue> {
    let config: Config = if interop::is_nullish(&v) {
        Config::default()
    } else {
        serde_wasm_bindgen::from_value(v).map_err(|e| error::err("invalid_config", e.to_string(), None))?
    };
    config.validate().map_err(|e| error::from_config(&e))?;
    Ok(config)
}

fn context_2d(canvas: &HtmlCanvasElement, config: &Config) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas.set_width(config.canvas_width);
    canvas.set_height(config.canvas_height);
    canvas
        .get_context("2d")?
        .ok_or_else(|| error::err("invalid_canvas", "canvas has no 2d context", None))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| error::err("invalid_canvas", "canvas has no 2d context", None))
}

fn point(x: f64, y: f64) -> Result<Point, JsValue> {
    if !x.is_finite() {
        return Err(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Err(error::non_finite("y"));
    }
    Ok(Point::new(x, y))
}

#[wasm_bindgen]
impl RoofQuoteApp {
    /// `canvas` may be omitted for headless use. `config` is a partial
    /// config object; missing fields take their defaults. Throws an error
    /// envelope on invalid config.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: Option<HtmlCanvasElement>, config: JsValue) -> Result<RoofQuoteApp, JsValue> {
        let config = read_config(config)?;
        let ctx = canvas.map(|c| context_2d(&c, &config)).transpose()?;
        let inner = Inner::new(config, ctx);
        inner.redraw();
        Ok(RoofQuoteApp { inner })
    }

    /// `f(kind, value)` is called with `"state"` after every applied state
    /// change and with `"autocomplete"` whenever the dropdown changes.
    pub fn set_on_change(&self, f: Option<js_sys::Function>) {
        self.inner.set_on_change(f);
    }

    pub fn config(&self) -> JsValue {
        error::ok_ser(self.inner.estimator.config())
    }
    pub fn state(&self) -> JsValue {
        self.inner
            .estimator
            .with_state(|s| interop::to_js(&StateView::of(s)).unwrap_or(JsValue::NULL))
    }
    pub fn points(&self) -> JsValue {
        self.inner
            .estimator
            .with_state(|s| interop::to_js(&s.points).unwrap_or(JsValue::NULL))
    }
    pub fn redraw(&self) {
        self.inner.redraw();
    }

    // Form inputs
    pub fn set_address(&self, address: &str) -> bool {
        self.inner.estimator.set_address(address)
    }
    pub fn set_has_damage(&self, v: bool) -> bool {
        self.inner.estimator.set_has_damage(v)
    }
    pub fn set_user_notes(&self, notes: Option<String>) -> bool {
        self.inner.estimator.set_user_notes(notes)
    }
    pub fn set_scale_factor(&self, f: f64) -> bool {
        self.inner.estimator.set_scale_factor(f)
    }
    pub fn set_scale_factor_res(&self, f: f64) -> JsValue {
        if !f.is_finite() {
            return error::non_finite("scale_factor");
        }
        if !limits::in_scale_bounds(f) {
            return error::out_of_range("scale_factor", 0.0, limits::SCALE_FACTOR_MAX, f);
        }
        error::ok(JsValue::from_bool(self.inner.estimator.set_scale_factor(f)))
    }

    // Flow. Promises always resolve, to an `{ok, value}` or `{ok: false, error}` envelope.
    pub fn submit_address(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            Ok(match inner.estimator.submit_address().await {
                Ok(phase) => error::ok_ser(&phase),
                Err(e) => error::from_flow(&e),
            })
        })
    }
    pub fn calculate(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            Ok(match inner.estimator.calculate().await {
                Ok(phase) => error::ok_ser(&phase),
                Err(e) => error::from_flow(&e),
            })
        })
    }
    pub fn clear(&self) -> bool {
        self.inner.estimator.clear()
    }
    pub fn reset(&self) -> bool {
        self.inner.estimator.reset()
    }

    // Canvas pointer events, in canvas pixel coordinates
    pub fn pointer_down(&self, x: f64, y: f64) -> bool {
        self.inner.pointer(PointerInput::Down(Point::new(x, y)))
    }
    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.inner.pointer(PointerInput::Move(Point::new(x, y)))
    }
    pub fn pointer_up(&self, x: f64, y: f64) -> bool {
        self.inner.pointer(PointerInput::Up(Point::new(x, y)))
    }
    pub fn pointer_leave(&self) -> bool {
        self.inner.pointer(PointerInput::Leave)
    }
    pub fn click(&self, x: f64, y: f64) -> bool {
        self.inner.pointer(PointerInput::Click(Point::new(x, y)))
    }
    pub fn click_res(&self, x: f64, y: f64) -> JsValue {
        match point(x, y) {
            Ok(p) => error::ok(JsValue::from_bool(self.inner.pointer(PointerInput::Click(p)))),
            Err(e) => e,
        }
    }
    pub fn dragging(&self) -> Option<u32> {
        self.inner.editor.borrow().dragging().map(|i| i as u32)
    }
    pub fn move_point_res(&self, index: u32, x: f64, y: f64) -> JsValue {
        let p = match point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let index = index as usize;
        if index >= self.inner.estimator.with_state(|s| s.points.len()) {
            return error::invalid_index("point", index);
        }
        error::ok(JsValue::from_bool(self.inner.estimator.move_point(index, p)))
    }

    // Address autocomplete
    /// Records typed text and resolves to whether the dropdown was refreshed
    /// once the debounce window passes. Superseded inputs resolve to false.
    pub fn autocomplete_input(&self, text: &str) -> Promise {
        let ticket = self.inner.autocomplete.borrow_mut().input(text);
        self.inner.estimator.set_address(text);
        self.inner.emit_autocomplete();
        let inner = self.inner.clone();
        future_to_promise(async move {
            let wait = inner.autocomplete.borrow().debounce_ms();
            timer::sleep(wait).await?;
            let refreshed = inner.estimator.refresh_suggestions(&inner.autocomplete, ticket).await;
            if refreshed {
                inner.emit_autocomplete();
            }
            Ok(JsValue::from_bool(refreshed))
        })
    }
    /// Handles a `KeyboardEvent.key`. Returns true when the page should
    /// prevent the default action.
    pub fn autocomplete_key(&self, key: &str) -> bool {
        let Some(key) = Key::from_name(key) else { return false };
        let outcome = self.inner.autocomplete.borrow_mut().key(key);
        match outcome {
            KeyOutcome::Ignored => false,
            KeyOutcome::Committed(address) => {
                self.inner.commit_address(&address);
                true
            }
            KeyOutcome::Highlighted(_) | KeyOutcome::Consumed | KeyOutcome::Closed => {
                self.inner.emit_autocomplete();
                true
            }
        }
    }
    pub fn autocomplete_hover(&self, index: u32) {
        self.inner.autocomplete.borrow_mut().hover(index as usize);
        self.inner.emit_autocomplete();
    }
    pub fn autocomplete_select(&self, index: u32) -> bool {
        let picked = self.inner.autocomplete.borrow_mut().select(index as usize);
        match picked {
            Some(address) => {
                self.inner.commit_address(&address);
                true
            }
            None => false,
        }
    }
    pub fn autocomplete_close(&self) {
        self.inner.autocomplete.borrow_mut().click_outside();
        self.inner.emit_autocomplete();
    }
    pub fn autocomplete_focus(&self) {
        self.inner.autocomplete.borrow_mut().focus();
        self.inner.emit_autocomplete();
    }
    pub fn autocomplete_state(&self) -> JsValue {
        interop::to_js(&self.inner.autocomplete.borrow().view()).unwrap_or(JsValue::NULL)
    }

    // Auxiliary endpoints
    pub fn pricing_defaults(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            Ok(match inner.estimator.pricing_defaults().await {
                Ok(v) => error::ok_ser(&v),
                Err(e) => error::from_api(&e),
            })
        })
    }
    pub fn health(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            Ok(match inner.estimator.health().await {
                Ok(v) => error::ok_ser(&v),
                Err(e) => error::from_api(&e),
            })
        })
    }
}
