/// All entity ids are allocated from a single monotonic counter.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque user identity (the mocked identity provider hands out strings).
pub type UserId = String;

/// Request header carrying the caller's user id. The server falls back to
/// its configured identity when absent.
pub const USER_ID_HEADER: &str = "x-user-id";
