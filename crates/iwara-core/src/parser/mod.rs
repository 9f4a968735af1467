//! HTML parsers for iwara pages
//!
//! Every parser takes the raw page body and returns a typed model or an
//! [`IwaraError`](crate::IwaraError). Fields the UI cannot work without are
//! required, decorative ones fall back to empty values.

mod comment;
mod dom;
mod form;
mod image;
mod listing;
mod user;
mod video;

pub use comment::{CLIENT_MARKER, parse_comment_list};
pub use image::parse_image_detail;
pub use listing::{ListingKind, parse_media_list};
pub use user::{parse_self, parse_user};
pub use video::{PRIVATE_MARKER, SITE_NAME, parse_video_detail};
