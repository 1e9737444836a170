mod component;
mod render;
mod state;
mod types;

pub use component::TopologyCanvas;
pub use types::CanvasEvent;
