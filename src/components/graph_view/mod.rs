mod camera;
mod component;
mod layering;
mod layout;
mod loader;
mod model;
mod parser;
mod render;
mod sample;
mod schedule;
mod state;
mod types;

pub use component::GraphViewerCanvas;
pub use layout::LayoutConfig;
pub use loader::DataSource;
