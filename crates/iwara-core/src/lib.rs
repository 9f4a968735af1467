//! Iwara Scraper Core Library
//!
//! Provides an async API over the server-rendered pages of iwara: listings,
//! video and image detail, comments, user profiles, plus likes, follows and
//! comment posting.
//!
//! # Overview
//!
//! The site has no public JSON API for most of its content, so this crate:
//! - Fetches pages with the caller's session token attached
//! - Parses the HTML into typed models
//! - Retries read operations a bounded number of times
//! - Wraps every outcome in a [`Response`] instead of returning errors
//!
//! # Example
//!
//! ```no_run
//! use iwara_core::{IwaraApi, MediaQueryParam, MediaType, Response, Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = IwaraApi::new()?;
//!
//!     let session = match api.login("me@example.com", "hunter2").await {
//!         Response::Success(session) => session,
//!         Response::Failure(message) => {
//!             eprintln!("login failed: {}", message);
//!             Session::guest()
//!         }
//!     };
//!
//!     let list = api
//!         .get_media_list(&session, MediaType::Video, 0, &MediaQueryParam::default())
//!         .await;
//!     if let Response::Success(list) = list {
//!         for item in &list.items {
//!             println!("{} ({} likes)", item.title, item.likes);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Private and deleted videos
//!
//! [`IwaraApi::get_video_page_detail`] reports friends-only and removed
//! videos as successful [`VideoDetailOutcome::Private`] and
//! [`VideoDetailOutcome::Deleted`] values, not as failures.

pub mod action;
mod api;
mod client;
mod error;
pub mod parser;
mod response;
pub mod retry;
mod session;
pub mod types;
pub mod url;

// Re-export main API
pub use api::IwaraApi;

// Re-export client types
pub use client::{Channel, ClientConfig, IwaraClient};

// Re-export error types
pub use error::{IwaraError, Result};

// Re-export envelope and session
pub use response::Response;
pub use session::Session;

// Re-export data types
pub use types::{
    Comment, CommentList, CommentPostParam, CommentPosterType, FlagResponse, FollowResponse,
    ImageDetail, LikeResponse, MediaList, MediaPreview, MediaType, MoreVideo, SelfProfile,
    SortType, SubscriptionList, UserData, UserFriendState, VideoDetail, VideoDetailOutcome,
};

// Re-export URL helpers for convenience
pub use url::{MEDIA_FILTERS, MediaFilter, MediaQueryParam};
