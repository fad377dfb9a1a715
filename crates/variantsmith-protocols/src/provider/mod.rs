//! LLM Provider protocol definitions.
//!
//! Providers connect to LLM APIs (Anthropic, OpenAI) and turn one canonical
//! completion request into one provider call.

mod traits;
mod request;
mod response;
mod model;
mod settings;

pub use traits::*;
pub use request::*;
pub use response::*;
pub use model::*;
pub use settings::*;
