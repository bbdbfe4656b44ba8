//! Terminal-facing output.
//!
//! Orchestration code talks to [`RenderSink`]; [`Renderer`] is the crossterm
//! implementation used by the binary.

pub mod render;
pub mod renderer;

pub use render::RenderSink;
pub use renderer::Renderer;
