//! Text-generation collaborator: the generator trait, the Gemini client and
//! retry logic.

pub mod gemini;
pub mod generator;
pub mod retry;

pub use gemini::{DEFAULT_MODEL, GeminiClient};
pub use generator::TextGenerator;
