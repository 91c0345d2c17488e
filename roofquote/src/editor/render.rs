use crate::geometry::tolerance::{OUTLINE_WIDTH, VERTEX_DOT_RADIUS, VERTEX_RING_RADIUS};
use crate::model::Point;

pub mod palette {
    pub const PLACEHOLDER_BG: &str = "#1a1a22";
    pub const STATUS_TEXT: &str = "#6b7280";
    pub const STATUS_FONT: &str = "16px Inter";
    pub const OUTLINE: &str = "#6366f1";
    pub const FILL: &str = "rgba(99, 102, 241, 0.25)";
    pub const FIRST_VERTEX: &str = "#10b981";
    pub const VERTEX: &str = "#6366f1";
    pub const RING: &str = "#ffffff";
    pub const LABEL: &str = "#ffffff";
    pub const LABEL_FONT: &str = "bold 10px Inter";
}

/// The subset of a Canvas 2D context the editor draws with. Styles are CSS
/// strings; arcs are full circles.
pub trait Surface {
    type Image;

    fn clear(&mut self, width: f64, height: f64);
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, width: f64, height: f64);
    fn set_fill_style(&mut self, css: &str);
    fn set_stroke_style(&mut self, css: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);
    /// Centers subsequent text horizontally and vertically on its anchor.
    fn center_text(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn circle(&mut self, x: f64, y: f64, radius: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
}

pub struct Scene<'a, I> {
    pub width: f64,
    pub height: f64,
    pub image: Option<&'a I>,
    pub points: &'a [Point],
    /// Shown centered on the placeholder when no image is available.
    pub status: &'a str,
}

pub fn render<S: Surface>(s: &mut S, scene: &Scene<'_, S::Image>) {
    s.clear(scene.width, scene.height);
    match scene.image {
        Some(img) => s.draw_image(img, 0.0, 0.0, scene.width, scene.height),
        None => draw_placeholder(s, scene),
    }
    if scene.points.is_empty() {
        return;
    }
    draw_outline(s, scene.points);
    for (i, p) in scene.points.iter().enumerate() {
        draw_vertex(s, i, *p);
    }
}

fn draw_placeholder<S: Surface>(s: &mut S, scene: &Scene<'_, S::Image>) {
    s.set_fill_style(palette::PLACEHOLDER_BG);
    s.fill_rect(0.0, 0.0, scene.width, scene.height);
    s.set_fill_style(palette::STATUS_TEXT);
    s.set_font(palette::STATUS_FONT);
    s.center_text();
    s.fill_text(scene.status, scene.width / 2.0, scene.height / 2.0);
}

fn draw_outline<S: Surface>(s: &mut S, points: &[Point]) {
    s.begin_path();
    s.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        s.line_to(p.x, p.y);
    }
    if points.len() >= 3 {
        s.close_path();
    }
    s.set_fill_style(palette::FILL);
    s.fill();
    s.set_stroke_style(palette::OUTLINE);
    s.set_line_width(OUTLINE_WIDTH);
    s.stroke();
}

fn draw_vertex<S: Surface>(s: &mut S, index: usize, p: Point) {
    s.begin_path();
    s.circle(p.x, p.y, VERTEX_RING_RADIUS);
    s.set_fill_style(palette::RING);
    s.fill();

    s.begin_path();
    s.circle(p.x, p.y, VERTEX_DOT_RADIUS);
    s.set_fill_style(if index == 0 { palette::FIRST_VERTEX } else { palette::VERTEX });
    s.fill();

    s.set_fill_style(palette::LABEL);
    s.set_font(palette::LABEL_FONT);
    s.center_text();
    s.fill_text(&(index + 1).to_string(), p.x, p.y);
}
