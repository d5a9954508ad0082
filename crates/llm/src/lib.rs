//! Unified LLM exchange types and plumbing.
//!
//! This crate holds everything shared by the backend adapters: the
//! conversation model (`Conversation`, `Message`), the model selection,
//! tool descriptors, the normalized `StreamEvent`/`AiResponse` types, the
//! per-framing stream reassemblers, the `Dispatcher` HTTP transport and the
//! `exchange` driver that folds a backend stream into one `AiResponse`.

pub use accumulate::{ResponseAccumulator, UsageReporting};
pub use adapter::{Adapter, StatusPolicy};
pub use error::{Cancelled, Error};
pub use event::{Events, StreamEvent};
pub use exchange::{Observer, exchange};
pub use frame::{Frame, Framing, Reassembler};
pub use http::Dispatcher;
pub use message::{Conversation, Image, Message, Role, Turn};
pub use reqwest::{self, Client};
pub use response::{AiResponse, TokenUsage};
pub use selection::{ExtraParams, ModelSelection};
pub use tokio_util::sync::CancellationToken;
pub use tool::{ToolDescriptor, ToolFormat, ToolManager, ToolSchema, ToolSet};

mod accumulate;
mod adapter;
mod error;
mod event;
mod exchange;
pub mod frame;
mod http;
mod message;
mod response;
mod selection;
mod tool;
