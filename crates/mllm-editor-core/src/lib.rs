pub mod ai;
pub mod config;
pub mod content;
pub mod document;
pub mod extract;
pub mod image;
pub mod merge;
pub mod session;
pub mod transcript;
pub mod transport;

// Re-export main types for convenience
pub use ai::{OpenAICompatClient, UpstreamError};
pub use config::Config;
pub use content::{ContentItem, ContentSequence, ImageUrl};
pub use document::{DocumentTree, Fragment, NodeKind};
pub use extract::{extract_content, extract_raw};
pub use image::{data_url_from_file, ImageError};
pub use merge::merge_text_items;
pub use session::{SendError, SendState, Session};
pub use transcript::{ChatMessage, ChatRole, Transcript};
pub use transport::{BackendClient, ChatReply, ChatRequest, Transport, TransportError};
pub use url::Url;
