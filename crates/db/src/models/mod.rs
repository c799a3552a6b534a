//! Entity structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct as stored and returned by the API
//! - A `Deserialize` create DTO
//! - A `Deserialize` update DTO (all `Option` fields) for partial updates
//!
//! JSON field names are camelCase to match the web client.

pub mod character;
pub mod conversation;
pub mod rehearsal;
pub mod script;
pub mod user;
