mod renderer;
mod text;

pub use renderer::{Renderer, Viewport};
