mod file_io;
mod inspector;
mod network_diagram;
mod toast;
mod toolbar;
pub mod topology_canvas;

pub use network_diagram::NetworkDiagram;
