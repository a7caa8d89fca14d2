//! Terminal output: formatting and the typewriter effect.

pub mod console;
pub mod reveal;
