//! Answer template rendering

mod renderer;

pub use renderer::{RenderOutput, TemplateRenderer};
