//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument and return owned copies.

pub mod character_repo;
pub mod conversation_repo;
pub mod rehearsal_repo;
pub mod script_repo;
pub mod user_repo;

pub use character_repo::CharacterRepo;
pub use conversation_repo::ConversationRepo;
pub use rehearsal_repo::RehearsalRepo;
pub use script_repo::ScriptRepo;
pub use user_repo::UserRepo;
