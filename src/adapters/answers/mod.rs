//! Answer Source Adapters.
//!
//! - `PromptAnswerSource` - Interactive terminal prompt
//! - `ScriptedAnswerSource` - Prepared answers for automation and tests

mod prompt_answer_source;
mod scripted_answer_source;

pub use prompt_answer_source::{parse_reply, render_prompt, PromptAnswerSource};
pub use scripted_answer_source::ScriptedAnswerSource;
