//! Core data types for the iwara scraper
//!
//! Every value here is created fresh by one extraction pass and owned by the
//! caller. Counters such as likes and watches stay as the display text the
//! site renders (it abbreviates large numbers), so they are `String`s.

use serde::{Deserialize, Serialize};

/// Kind of media a page or preview refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
}

impl MediaType {
    /// Path segment used by the site ("videos" / "images")
    pub fn path(self) -> &'static str {
        match self {
            MediaType::Video => "videos",
            MediaType::Image => "images",
        }
    }

    /// Guess the media type from a relative link like `/videos/abc`
    pub fn from_link(link: &str) -> Self {
        if link.trim_start_matches('/').starts_with("video") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// Sort key for listing and search pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Date,
    Views,
    Likes,
}

impl SortType {
    /// Value of the `sort` query parameter
    pub fn value(self) -> &'static str {
        match self {
            SortType::Date => "date",
            SortType::Views => "views",
            SortType::Likes => "likes",
        }
    }
}

/// One row of a listing page (subscriptions, media list, search, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPreview {
    pub title: String,
    pub author: String,
    /// Absolute thumbnail URL
    pub preview_pic: String,
    /// Raw display text, e.g. "1.2k"
    pub likes: String,
    /// Raw display text
    pub watches: String,
    pub media_type: MediaType,
    pub media_id: String,
    /// Row is rendered as a private (friends only) video
    pub private: bool,
    /// Submission date as displayed, empty when the row has none
    pub created_at: String,
}

/// One page of media previews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaList {
    pub current_page: u32,
    pub has_next: bool,
    pub items: Vec<MediaPreview>,
}

/// The subscription feed has the same shape as any other listing
pub type SubscriptionList = MediaList;

/// Small card in the "more from author" / "recommended" blocks of a video page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoreVideo {
    pub id: String,
    pub title: String,
    pub pic: String,
    pub likes: String,
    pub watches: String,
}

/// Hidden form values the site requires to accept a comment
///
/// Only valid for the page fetch that produced it; harvest it again after
/// every detail-page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPostParam {
    pub anti_bot_key: String,
    pub form_id: String,
    pub form_token: String,
    pub form_build_id: String,
    pub honeypot_time: String,
}

/// Everything shown on a video page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetail {
    pub id: String,
    /// Internal numeric node id, needed to post comments
    pub nid: i64,
    pub title: String,
    pub likes: String,
    pub watches: String,
    pub post_date: String,
    /// Plain text; inline links are kept as `<a href="...">text</a>`
    pub description: String,
    pub author_id: String,
    pub author_name: String,
    pub author_pic: String,
    /// Comment count from the comments heading
    pub comments: u32,
    pub more_videos: Vec<MoreVideo>,
    pub recommended_videos: Vec<MoreVideo>,
    /// Absolute poster image URL, empty when the player has none
    pub preview: String,
    pub is_liked: bool,
    /// Opaque flag link used by [`like`](crate::IwaraApi::like)
    pub like_link: String,
    pub is_following: bool,
    /// Opaque flag link used by [`follow`](crate::IwaraApi::follow)
    pub follow_link: String,
    /// `None` when the page has no comment form (guests)
    pub comment_post_param: Option<CommentPostParam>,
}

/// Result of loading a video page
///
/// `Private` and `Deleted` are successful outcomes: the page was fetched, it
/// just does not carry a video the viewer can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "video", rename_all = "lowercase")]
pub enum VideoDetailOutcome {
    Found(Box<VideoDetail>),
    Private,
    Deleted,
}

impl VideoDetailOutcome {
    /// The detail, when the video is visible
    pub fn found(&self) -> Option<&VideoDetail> {
        match self {
            VideoDetailOutcome::Found(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Everything shown on an image page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDetail {
    pub id: String,
    pub title: String,
    /// Full-resolution image URLs in page order
    pub image_links: Vec<String>,
    pub description: String,
    pub author_id: String,
    pub author_name: String,
    pub author_pic: String,
    pub watches: String,
}

/// Who wrote a comment, relative to the page and the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentPosterType {
    #[default]
    Normal,
    /// Author of the media the comment is on
    Owner,
    /// The logged-in viewer
    Viewer,
}

/// A comment and its replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author_id: String,
    pub author_name: String,
    pub author_pic: String,
    pub poster_type: CommentPosterType,
    pub nid: i64,
    pub comment_id: i64,
    pub content: String,
    pub date: String,
    /// Content carries the marker this client appends to posted comments
    pub from_this_client: bool,
    pub replies: Vec<Comment>,
}

/// One page of top-level comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentList {
    pub total: u32,
    pub page: u32,
    pub has_next: bool,
    pub comments: Vec<Comment>,
    /// Token bundle harvested from the same page, when it has a comment form
    pub post_param: Option<CommentPostParam>,
}

/// Profile of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfProfile {
    pub id: String,
    pub num_id: i64,
    pub nickname: String,
    pub profile_pic: String,
    pub about: String,
    pub friend_requests: u32,
    pub messages: u32,
}

/// Friendship between the viewer and another user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserFriendState {
    #[default]
    NotFriend,
    Pending,
    Already,
}

/// Public profile page of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Slug-like id used in `/users/{id}`
    pub user_id: String,
    pub username: String,
    /// Numeric id used by `/users/{id}/videos` and friend queries
    pub user_id_media: String,
    /// Numeric id from the follow flag link, 0 when not shown
    pub id: i64,
    pub pic: String,
    pub about: String,
    pub join_date: String,
    pub last_seen: String,
    pub follow: bool,
    pub follow_link: String,
    pub friend: UserFriendState,
    /// Node id comments on this profile are posted to, 0 when not shown
    pub comment_nid: i64,
    pub comment_post_param: Option<CommentPostParam>,
}

/// JSON acknowledgement of the flag (like / follow) endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlagResponse {
    pub status: bool,
    pub flag_name: String,
    pub flag_status: String,
    pub new_link: String,
    pub flag_success: bool,
}

pub type LikeResponse = FlagResponse;
pub type FollowResponse = FlagResponse;
