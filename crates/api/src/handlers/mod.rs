pub mod auth;
pub mod character;
pub mod chat;
pub mod conversation;
pub mod rehearsal;
pub mod script;
