pub mod renderer;

pub use renderer::{Overlay, RenderView, Renderer};
