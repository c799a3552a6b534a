//! Domain types and pure logic shared by the stagecraft server and client.
//!
//! Nothing in this crate performs I/O: it holds identifiers, the chat
//! message model, prompt construction, the script block parser, and input
//! validation.

pub mod chat;
pub mod error;
pub mod prompts;
pub mod script_blocks;
pub mod types;
pub mod validation;
