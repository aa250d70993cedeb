//! Request, response, and document types

pub mod chat;
pub mod document;
pub mod response;

pub use chat::{AskRequest, ChatTurn, Role};
pub use document::{Chunk, DocumentInfo};
pub use response::{AskResponse, GreetResponse, UploadResponse};
