// Adapters layer: concrete implementations for external systems.

pub mod gemini;
pub mod render;
