use roofquote::editor::render::Surface;
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Canvas 2D target for the editor render pass. Canvas calls that can throw
/// (image not decoded yet, detached context) are skipped.
pub struct Ctx2d<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> Ctx2d<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Ctx2d<'a> {
        Ctx2d { ctx }
    }
}

#[allow(deprecated)]
impl Surface for Ctx2d<'_> {
    type Image = HtmlImageElement;

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }
    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) {
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height);
    }
    fn set_fill_style(&mut self, css: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(css));
    }
    fn set_stroke_style(&mut self, css: &str) {
        self.ctx.set_stroke_style(&JsValue::from_str(css));
    }
    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }
    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }
    fn center_text(&mut self) {
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
    }
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }
    fn close_path(&mut self) {
        self.ctx.close_path();
    }
    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
    }
    fn fill(&mut self) {
        self.ctx.fill();
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}
