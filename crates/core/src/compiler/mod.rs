//! Deterministic compilation from a `BusinessConfig` into the artifacts the
//! remote agent provider consumes: the system prompt, the knowledge-base
//! document, the callable tool schemas, and the voice selection.
//!
//! Everything here is pure text work. No I/O, no clock, no randomness, and
//! no panics: malformed optional fields degrade to empty strings or are
//! skipped rather than raising.

mod knowledge;
mod prompt;
mod tools;
mod voice;

pub use knowledge::compile_knowledge_base;
pub use prompt::compile_system_prompt;
pub use tools::{compile_tools, ToolSchema};
pub use voice::{select_voice, VoiceId};
