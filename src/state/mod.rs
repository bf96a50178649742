mod drawing_state;
mod settings;

pub use drawing_state::DrawingState;
pub use settings::{PICTURES_DIR_ENV, SketchSettings};
