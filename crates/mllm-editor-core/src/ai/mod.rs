pub mod openai;

pub use openai::{OpenAICompatClient, UpstreamError};
