//! URL helper functions for iwara
//!
//! Every remote path the core requests is built here, including the site's
//! `f[i]=` filter encoding. Paths are relative; the client joins them onto the
//! configured base URL.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{MediaType, SortType};

/// Default site root for HTML pages
pub const BASE_URL: &str = "https://ecchi.iwara.tv";

/// Default root of the JSON API (login)
pub const API_URL: &str = "https://api.iwara.tv";

/// Login endpoint, relative to the API root
pub const LOGIN_PATH: &str = "/user/login";

/// Sort key plus filter codes for listing and search pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQueryParam {
    pub sort: SortType,
    /// Opaque `type:value` codes, e.g. `created:2021`
    pub filters: BTreeSet<String>,
}

impl MediaQueryParam {
    pub fn new(sort: SortType) -> Self {
        Self {
            sort,
            filters: BTreeSet::new(),
        }
    }

    pub fn with_filter(mut self, code: impl Into<String>) -> Self {
        self.filters.insert(code.into());
        self
    }
}

/// A family of filter codes the site understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFilter {
    pub kind: &'static str,
    pub values: &'static [&'static str],
}

impl MediaFilter {
    /// Filter codes in `kind:value` form
    pub fn codes(&self) -> impl Iterator<Item = String> + '_ {
        self.values.iter().map(move |v| format!("{}:{}", self.kind, v))
    }
}

/// Filters offered by the listing and search pages
pub const MEDIA_FILTERS: &[MediaFilter] = &[
    MediaFilter {
        kind: "created",
        values: &["2022", "2022-09", "2022-08", "2021", "2020", "2019", "2018"],
    },
    MediaFilter {
        kind: "field_categories",
        values: &[
            "1", "6", "7", "8", "33", "34", "16104", "16105", "16190", "31263", "31264", "31265",
        ],
    },
];

/// Encodes filter codes as `f[0]=a&f[1]=b`
///
/// Codes are emitted in sorted order so the same set always yields the same URL.
///
/// # Example
/// ```
/// use std::collections::BTreeSet;
/// use iwara_core::url::encode_filters;
/// let filters: BTreeSet<String> = ["created:2021".to_string()].into();
/// assert_eq!(encode_filters(&filters), "f[0]=created%3A2021");
/// ```
pub fn encode_filters(filters: &BTreeSet<String>) -> String {
    filters
        .iter()
        .enumerate()
        .map(|(index, code)| format!("f[{}]={}", index, urlencoding::encode(code)))
        .collect::<Vec<_>>()
        .join("&")
}

fn with_filters(mut path: String, filters: &BTreeSet<String>) -> String {
    if !filters.is_empty() {
        path.push('&');
        path.push_str(&encode_filters(filters));
    }
    path
}

/// Profile page of the logged-in user
pub fn self_path() -> String {
    "/user".to_string()
}

/// Subscription feed
pub fn subscriptions_path(page: u32) -> String {
    format!("/subscriptions?page={}", page)
}

/// Image detail page
pub fn image_path(image_id: &str) -> String {
    format!("/images/{}", urlencoding::encode(image_id))
}

/// Video detail page
///
/// # Example
/// ```
/// use iwara_core::url::video_path;
/// assert_eq!(video_path("abc"), "/videos/abc?language=en");
/// ```
pub fn video_path(video_id: &str) -> String {
    format!("/videos/{}?language=en", urlencoding::encode(video_id))
}

/// Comment page of a video or image
pub fn comments_path(media_type: MediaType, media_id: &str, page: u32) -> String {
    format!(
        "/{}/{}?language=en&page={}",
        media_type.path(),
        urlencoding::encode(media_id),
        page
    )
}

/// Site-wide video or image listing
///
/// # Example
/// ```
/// use iwara_core::types::{MediaType, SortType};
/// use iwara_core::url::{media_list_path, MediaQueryParam};
/// let query = MediaQueryParam::new(SortType::Views);
/// assert_eq!(media_list_path(MediaType::Video, 2, &query), "/videos?page=2&sort=views");
/// ```
pub fn media_list_path(media_type: MediaType, page: u32, query: &MediaQueryParam) -> String {
    let path = format!(
        "/{}?page={}&sort={}",
        media_type.path(),
        page,
        query.sort.value()
    );
    with_filters(path, &query.filters)
}

/// Public profile of a user
pub fn user_path(user_id: &str) -> String {
    format!("/users/{}?language=en", urlencoding::encode(user_id))
}

/// Media uploaded by a user, addressed by the numeric media id
pub fn user_media_path(user_id_media: &str, media_type: MediaType, page: u32) -> String {
    format!(
        "/users/{}/{}?page={}",
        urlencoding::encode(user_id_media),
        media_type.path(),
        page
    )
}

/// Comment wall on a user's profile
pub fn user_comments_path(user_id: &str, page: u32) -> String {
    format!(
        "/users/{}?language=en&page={}",
        urlencoding::encode(user_id),
        page
    )
}

/// Full-text search
///
/// # Example
/// ```
/// use iwara_core::url::{search_path, MediaQueryParam};
/// let path = search_path("miku dance", 0, &MediaQueryParam::default());
/// assert_eq!(path, "/search?query=miku%20dance&sort=date&page=0");
/// ```
pub fn search_path(query: &str, page: u32, params: &MediaQueryParam) -> String {
    let path = format!(
        "/search?query={}&sort={}&page={}",
        urlencoding::encode(query),
        params.sort.value(),
        page
    );
    with_filters(path, &params.filters)
}

/// Videos and images the logged-in user liked
pub fn like_page_path(page: u32) -> String {
    format!("/user/liked?page={}", page)
}

/// Flag toggle endpoint for an opaque flag link
///
/// `link` is used verbatim; it already carries the site's token query.
pub fn flag_path(kind: &str, apply: bool, link: &str) -> String {
    let action = if apply { "flag" } else { "unflag" };
    format!("/flag/{}/{}/{}", action, kind, link.trim_start_matches('/'))
}

/// Comment submission endpoint, optionally replying to a comment
pub fn comment_reply_path(nid: i64, parent_comment_id: Option<i64>) -> String {
    match parent_comment_id {
        Some(parent) => format!("/comment/reply/{}/{}", nid, parent),
        None => format!("/comment/reply/{}", nid),
    }
}

/// Last path segment of a link, ignoring any query string
///
/// # Example
/// ```
/// use iwara_core::url::last_path_segment;
/// assert_eq!(last_path_segment("/videos/abc?page=1"), "abc");
/// ```
pub fn last_path_segment(link: &str) -> &str {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    let path = path.trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}

/// Makes an `src`/`href` from the page absolute
///
/// Protocol-relative links get `https:`, root-relative ones get `base_url`.
pub fn absolute_url(base_url: &str, link: &str) -> String {
    let link = link.trim();
    if link.is_empty() {
        String::new()
    } else if let Some(rest) = link.strip_prefix("//") {
        format!("https://{}", rest)
    } else if link.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), link)
    } else {
        link.to_string()
    }
}
