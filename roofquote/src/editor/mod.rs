pub mod picking;
pub mod render;

use crate::geometry::limits::in_coord_bounds;
use crate::model::Point;
use picking::pick_vertex;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum PointerState {
    #[default]
    Idle,
    Dragging(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(Point),
    Move(Point),
    Up(Point),
    Click(Point),
    /// Pointer left the surface; any drag ends without a trailing click.
    Leave,
}

/// Mutations reported to the owner of the polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorEvent {
    PointAdded(Point),
    PointMoved { index: usize, point: Point },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pointer {
    pub state: PointerState,
    // Set by a drag release so the browser's synthetic click is swallowed
    pub suppress_click: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub next: Pointer,
    pub event: Option<EditorEvent>,
    pub redraw: bool,
}

impl Transition {
    fn stay(p: Pointer) -> Transition {
        Transition { next: p, event: None, redraw: false }
    }
}

fn usable(p: Point) -> bool {
    in_coord_bounds(p.x) && in_coord_bounds(p.y)
}

/// Pure pointer transition over the current polygon.
pub fn step(p: Pointer, input: PointerInput, points: &[Point]) -> Transition {
    match input {
        PointerInput::Down(at) => {
            if !usable(at) {
                return Transition::stay(p);
            }
            match pick_vertex(points, at) {
                Some(index) => Transition {
                    next: Pointer { state: PointerState::Dragging(index), suppress_click: false },
                    event: None,
                    redraw: true,
                },
                None => Transition {
                    next: Pointer { state: PointerState::Idle, suppress_click: false },
                    event: None,
                    redraw: p.state != PointerState::Idle,
                },
            }
        }
        PointerInput::Move(at) => match p.state {
            PointerState::Dragging(index) if index < points.len() && usable(at) => Transition {
                next: p,
                event: Some(EditorEvent::PointMoved { index, point: at }),
                redraw: true,
            },
            // Polygon shrank under the drag (cleared or reset)
            PointerState::Dragging(index) if index >= points.len() => Transition {
                next: Pointer::default(),
                event: None,
                redraw: true,
            },
            _ => Transition::stay(p),
        },
        PointerInput::Up(_) => match p.state {
            PointerState::Dragging(_) => Transition {
                next: Pointer { state: PointerState::Idle, suppress_click: true },
                event: None,
                redraw: true,
            },
            PointerState::Idle => Transition::stay(p),
        },
        PointerInput::Click(at) => {
            if p.suppress_click {
                return Transition::stay(Pointer { suppress_click: false, ..p });
            }
            if p.state != PointerState::Idle || !usable(at) || pick_vertex(points, at).is_some() {
                return Transition::stay(p);
            }
            Transition { next: p, event: Some(EditorEvent::PointAdded(at)), redraw: true }
        }
        PointerInput::Leave => match p.state {
            PointerState::Dragging(_) => Transition { next: Pointer::default(), event: None, redraw: true },
            PointerState::Idle => Transition::stay(Pointer::default()),
        },
    }
}

/// Local drag bookkeeping for one canvas. The polygon itself is owned by the
/// caller and passed in on every event.
#[derive(Clone, Debug, Default)]
pub struct PolygonEditor {
    pointer: Pointer,
}

impl PolygonEditor {
    pub fn new() -> PolygonEditor {
        PolygonEditor::default()
    }
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }
    pub fn dragging(&self) -> Option<usize> {
        match self.pointer.state {
            PointerState::Dragging(i) => Some(i),
            PointerState::Idle => None,
        }
    }
    pub fn handle(&mut self, input: PointerInput, points: &[Point]) -> Transition {
        let t = step(self.pointer, input, points);
        self.pointer = t.next;
        t
    }
    pub fn pointer_down(&mut self, points: &[Point], x: f64, y: f64) -> Transition {
        self.handle(PointerInput::Down(Point::new(x, y)), points)
    }
    pub fn pointer_move(&mut self, points: &[Point], x: f64, y: f64) -> Transition {
        self.handle(PointerInput::Move(Point::new(x, y)), points)
    }
    pub fn pointer_up(&mut self, points: &[Point], x: f64, y: f64) -> Transition {
        self.handle(PointerInput::Up(Point::new(x, y)), points)
    }
    pub fn click(&mut self, points: &[Point], x: f64, y: f64) -> Transition {
        self.handle(PointerInput::Click(Point::new(x, y)), points)
    }
    pub fn leave(&mut self, points: &[Point]) -> Transition {
        self.handle(PointerInput::Leave, points)
    }
    pub fn reset(&mut self) {
        self.pointer = Pointer::default();
    }
}
