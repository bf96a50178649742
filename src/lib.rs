#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas_texture;
pub mod engine;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod state;
pub mod surface;
pub mod tools;
pub mod util;

pub use app::SketchApp;
pub use engine::DrawingEngine;
pub use error::SaveError;
pub use event::{EventBus, SurfaceListeners};
pub use gesture::GestureState;
pub use history::SnapshotHistory;
pub use input::{EventTarget, PointerEvent, PointerPhase, PointerSample};
pub use persistence::{PictureRecord, PictureStore};
pub use state::{DrawingState, SketchSettings};
pub use surface::Surface;
pub use tools::{Style, Tool, ToolSelection};
