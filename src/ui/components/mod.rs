mod input;
mod key_result;
mod prompt;

pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use prompt::{Prompt, PromptEvent};
