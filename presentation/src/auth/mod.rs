//! Login and signup prompts.

mod screen;

pub use screen::{AuthMode, AuthScreen, MaskedTerminal, SecretInput};
