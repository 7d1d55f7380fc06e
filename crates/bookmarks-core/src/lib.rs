pub mod bookmark;
pub mod error;
pub mod id;
pub mod time;

pub use bookmark::{Bookmark, BookmarkPatch, LINK_MAX_LEN, LISTED_FIELDS};
pub use error::{CoreError, Result};
pub use id::{generate_guid, is_uuid_v4, parse_guid};
pub use time::now_millis;
