//! Roof estimation front-end core: state store, polygon editor, address
//! autocomplete and the flow that sequences backend calls. Browser bindings
//! live in the `roofquote-wasm` crate.

pub mod autocomplete;
pub mod backend;
pub mod config;
pub mod editor;
pub mod flow;
pub mod model;
pub mod store;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}

pub use autocomplete::{Autocomplete, Key, KeyOutcome, Ticket};
pub use backend::{ApiError, Backend};
pub use config::{Config, ConfigError};
pub use editor::{EditorEvent, PolygonEditor, PointerInput, PointerState};
pub use flow::{Estimator, FlowError};
pub use model::Point;
pub use store::{Action, Phase, RequestToken, State, Store};
