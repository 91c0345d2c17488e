//! Browser bindings for the roof estimator. The host page owns the DOM and
//! forwards input, pointer and keyboard events into [`RoofQuoteApp`].

use roofquote::editor::render::{render, Scene};
use roofquote::editor::{PointerInput, PolygonEditor};
use roofquote::{Autocomplete, Config, Estimator, Phase, State};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

mod api;
mod console;
mod error;
mod http;
mod interop;
mod render2d;
mod timer;

pub use api::{init_logging, set_panic_hook};
pub use http::HttpBackend;

#[wasm_bindgen]
pub struct RoofQuoteApp { pub(crate) inner: Rc<Inner> }

pub(crate) struct Inner {
    pub(crate) estimator: Estimator<HttpBackend>,
    pub(crate) editor: RefCell<PolygonEditor>,
    pub(crate) autocomplete: RefCell<Autocomplete>,
    ctx: Option<CanvasRenderingContext2d>,
    satellite: RefCell<Option<SatelliteLayer>>,
    on_change: RefCell<Option<js_sys::Function>>,
}

/// Decoded satellite image for the current state, keyed by the base64 it was
/// built from.
struct SatelliteLayer {
    source: Rc<str>,
    element: HtmlImageElement,
    broken: Rc<Cell<bool>>,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl SatelliteLayer {
    fn load(source: Rc<str>, owner: Weak<Inner>) -> Result<SatelliteLayer, JsValue> {
        let element = HtmlImageElement::new()?;
        let broken = Rc::new(Cell::new(false));
        let onload = {
            let owner = owner.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(inner) = owner.upgrade() {
                    inner.redraw();
                }
            })
        };
        let onerror = {
            let broken = broken.clone();
            Closure::<dyn FnMut()>::new(move || {
                log::warn!("satellite image could not be decoded, keeping placeholder");
                broken.set(true);
                if let Some(inner) = owner.upgrade() {
                    inner.redraw();
                }
            })
        };
        element.set_onload(Some(onload.as_ref().unchecked_ref()));
        element.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        element.set_src(&roofquote::backend::data_url(&source));
        Ok(SatelliteLayer { source, element, broken, _onload: onload, _onerror: onerror })
    }

    fn ready(&self) -> Option<&HtmlImageElement> {
        (self.element.complete() && self.element.natural_width() > 0).then_some(&self.element)
    }
}

impl Drop for SatelliteLayer {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}

/// State as handed to JavaScript, with the derived flags the page renders from.
#[derive(Serialize)]
pub(crate) struct StateView<'a> {
    #[serde(flatten)]
    state: &'a State,
    display_address: &'a str,
    canvas_status: &'static str,
    can_calculate: bool,
    show_results: bool,
    has_image: bool,
}

impl<'a> StateView<'a> {
    pub(crate) fn of(state: &'a State) -> StateView<'a> {
        StateView {
            state,
            display_address: state.display_address(),
            canvas_status: state.canvas_status(),
            can_calculate: state.can_calculate(),
            show_results: state.show_results(),
            has_image: state.image_base64.is_some(),
        }
    }
}

impl Inner {
    pub(crate) fn new(config: Config, ctx: Option<CanvasRenderingContext2d>) -> Rc<Inner> {
        let inner = Rc::new(Inner {
            autocomplete: RefCell::new(Autocomplete::from_config(&config)),
            estimator: Estimator::new(HttpBackend::new(config.clone()), config),
            editor: RefCell::new(PolygonEditor::new()),
            ctx,
            satellite: RefCell::new(None),
            on_change: RefCell::new(None),
        });
        let owner = Rc::downgrade(&inner);
        inner.estimator.subscribe(move |s| {
            if let Some(inner) = owner.upgrade() {
                inner.on_state(s);
            }
        });
        inner
    }

    fn on_state(self: &Rc<Self>, s: &State) {
        self.sync_satellite(s);
        if !s.phase.is_drawing() {
            self.editor.borrow_mut().reset();
        }
        self.redraw();
        match interop::to_js(&StateView::of(s)) {
            Ok(v) => self.emit("state", &v),
            Err(e) => log::error!("state snapshot not serializable: {e}"),
        }
    }

    fn sync_satellite(self: &Rc<Self>, s: &State) {
        let mut slot = self.satellite.borrow_mut();
        let Some(source) = &s.image_base64 else {
            *slot = None;
            return;
        };
        if slot.as_ref().is_some_and(|l| Rc::ptr_eq(&l.source, source)) {
            return;
        }
        *slot = match SatelliteLayer::load(source.clone(), Rc::downgrade(self)) {
            Ok(layer) => Some(layer),
            Err(e) => {
                log::warn!("satellite image element unavailable: {e:?}");
                None
            }
        };
    }

    pub(crate) fn redraw(&self) {
        let Some(ctx) = &self.ctx else { return };
        let (width, height) = self.estimator.config().canvas_size();
        let satellite = self.satellite.borrow();
        let image = satellite.as_ref().and_then(SatelliteLayer::ready);
        let broken = satellite.as_ref().is_some_and(|l| l.broken.get());
        self.estimator.with_state(|s| {
            let status = s.placeholder_status(broken);
            let scene = Scene { width, height, image, points: &s.points, status };
            render(&mut render2d::Ctx2d::new(ctx), &scene);
        });
    }

    pub(crate) fn emit(&self, kind: &str, value: &JsValue) {
        let callback = self.on_change.borrow().clone();
        if let Some(f) = callback {
            if let Err(e) = f.call2(&JsValue::NULL, &JsValue::from_str(kind), value) {
                log::error!("on_change handler threw: {e:?}");
            }
        }
    }

    pub(crate) fn emit_autocomplete(&self) {
        let view = interop::to_js(&self.autocomplete.borrow().view());
        match view {
            Ok(v) => self.emit("autocomplete", &v),
            Err(e) => log::error!("autocomplete snapshot not serializable: {e}"),
        }
    }

    pub(crate) fn set_on_change(&self, f: Option<js_sys::Function>) {
        *self.on_change.borrow_mut() = f;
    }

    /// Routes one pointer event through the editor. Returns true when the
    /// polygon changed.
    pub(crate) fn pointer(&self, input: PointerInput) -> bool {
        if self.estimator.with_state(|s| s.phase) != Phase::Drawing {
            self.editor.borrow_mut().reset();
            return false;
        }
        let t = self.estimator.with_state(|s| self.editor.borrow_mut().handle(input, &s.points));
        let changed = t.event.is_some_and(|e| self.estimator.apply_editor_event(e));
        if t.redraw && !changed {
            self.redraw();
        }
        changed
    }

    /// A committed suggestion becomes the address to submit.
    pub(crate) fn commit_address(&self, address: &str) {
        self.estimator.set_address(address);
        self.emit_autocomplete();
    }
}
