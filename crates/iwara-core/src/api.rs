//! Public API for iwara
//!
//! [`IwaraApi`] ties the HTTP client, the page parsers and the retry policy
//! together. Every operation returns a [`Response`]; nothing here returns an
//! error or panics on remote input.

use tracing::{debug, info, warn};

use crate::action::{FlagKind, comment_form, flag_form};
use crate::client::{Channel, ClientConfig, IwaraClient};
use crate::error::{IwaraError, Result};
use crate::parser::{
    ListingKind, parse_comment_list, parse_image_detail, parse_media_list, parse_self,
    parse_user, parse_video_detail,
};
use crate::response::Response;
use crate::retry::{DEFAULT_MAX_ATTEMPTS, MEDIA_LIST_MAX_ATTEMPTS, retry};
use crate::session::Session;
use crate::types::{
    CommentList, CommentPostParam, FlagResponse, FollowResponse, ImageDetail, LikeResponse,
    MediaList, MediaType, SelfProfile, SubscriptionList, UserData, VideoDetailOutcome,
};
use crate::url::{
    MediaQueryParam, comment_reply_path, comments_path, flag_path, image_path, like_page_path,
    media_list_path, search_path, self_path, subscriptions_path, user_comments_path, user_media_path,
    user_path, video_path,
};

/// Main API for iwara
///
/// Combines the HTTP client, HTML parsers and bounded retries behind one
/// method per site operation. The struct is `Send + Sync`; share it by
/// reference between tasks.
pub struct IwaraApi {
    client: IwaraClient,
}

impl IwaraApi {
    /// Create a new API with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: IwaraClient::new()?,
        })
    }

    /// Create a new API with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: IwaraClient::with_config(config)?,
        })
    }

    /// Site root requests are sent to
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Log in with email and password
    ///
    /// A rejected password yields `Failure("Invalid username or password")`.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> iwara_core::Result<()> {
    /// use iwara_core::IwaraApi;
    /// let api = IwaraApi::new()?;
    /// let session = api.login("me@example.com", "hunter2").await;
    /// if let Some(session) = session.ok() {
    ///     println!("token: {}", session.token);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(&self, email: &str, password: &str) -> Response<Session> {
        info!("Logging in");
        finish("login", self.client.login(email, password).await)
    }

    /// Profile of the logged-in account
    pub async fn get_self(&self, session: &Session) -> Response<SelfProfile> {
        finish("get_self", self.load_self(session).await)
    }

    /// Newest uploads of followed users
    pub async fn get_subscription_list(
        &self,
        session: &Session,
        page: u32,
    ) -> Response<SubscriptionList> {
        let path = subscriptions_path(page);
        retry(DEFAULT_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "get_subscription_list",
                    self.load_listing(Channel::Standard, &path, page, ListingKind::Nodes, session)
                        .await,
                )
            }
        })
        .await
    }

    /// Detail page of an image post
    pub async fn get_image_page_detail(
        &self,
        session: &Session,
        image_id: &str,
    ) -> Response<ImageDetail> {
        if let Err(error) = validate_id(image_id, "Image ID") {
            return finish("get_image_page_detail", Err(error));
        }
        retry(DEFAULT_MAX_ATTEMPTS, move || async move {
            finish(
                "get_image_page_detail",
                self.load_image(image_id, session).await,
            )
        })
        .await
    }

    /// Detail page of a video
    ///
    /// Friends-only and deleted videos are successes carrying
    /// [`VideoDetailOutcome::Private`] and [`VideoDetailOutcome::Deleted`].
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> iwara_core::Result<()> {
    /// use iwara_core::{IwaraApi, Session, VideoDetailOutcome};
    /// let api = IwaraApi::new()?;
    /// match api.get_video_page_detail(&Session::guest(), "abcdef").await.ok() {
    ///     Some(VideoDetailOutcome::Found(video)) => println!("{}", video.title),
    ///     Some(other) => println!("unavailable: {:?}", other),
    ///     None => println!("request failed"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_video_page_detail(
        &self,
        session: &Session,
        video_id: &str,
    ) -> Response<VideoDetailOutcome> {
        if let Err(error) = validate_id(video_id, "Video ID") {
            return finish("get_video_page_detail", Err(error));
        }
        retry(DEFAULT_MAX_ATTEMPTS, move || async move {
            finish(
                "get_video_page_detail",
                self.load_video(video_id, session).await,
            )
        })
        .await
    }

    /// Like (`true`) or unlike (`false`) a video through its opaque like link
    pub async fn like(&self, session: &Session, like: bool, like_link: &str) -> Response<LikeResponse> {
        finish(
            "like",
            self.toggle_flag(session, FlagKind::Like, like, like_link)
                .await,
        )
    }

    /// Follow (`true`) or unfollow (`false`) a user through its opaque follow link
    pub async fn follow(
        &self,
        session: &Session,
        follow: bool,
        follow_link: &str,
    ) -> Response<FollowResponse> {
        finish(
            "follow",
            self.toggle_flag(session, FlagKind::Follow, follow, follow_link)
                .await,
        )
    }

    /// One page of comments under a video or image
    pub async fn get_comment_list(
        &self,
        session: &Session,
        media_type: MediaType,
        media_id: &str,
        page: u32,
    ) -> Response<CommentList> {
        if let Err(error) = validate_id(media_id, "Media ID") {
            return finish("get_comment_list", Err(error));
        }
        let path = comments_path(media_type, media_id, page);
        retry(DEFAULT_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "get_comment_list",
                    self.load_comments(&path, page, session).await,
                )
            }
        })
        .await
    }

    /// Site-wide video or image listing
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> iwara_core::Result<()> {
    /// use iwara_core::{IwaraApi, MediaQueryParam, MediaType, Session, SortType};
    /// let api = IwaraApi::new()?;
    /// let query = MediaQueryParam::new(SortType::Likes).with_filter("created:2021");
    /// let list = api
    ///     .get_media_list(&Session::guest(), MediaType::Video, 0, &query)
    ///     .await;
    /// for item in list.ok().map(|l| l.items).unwrap_or_default() {
    ///     println!("{} by {}", item.title, item.author);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_media_list(
        &self,
        session: &Session,
        media_type: MediaType,
        page: u32,
        query: &MediaQueryParam,
    ) -> Response<MediaList> {
        let path = media_list_path(media_type, page, query);
        retry(MEDIA_LIST_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "get_media_list",
                    self.load_listing(Channel::Media, &path, page, ListingKind::Nodes, session)
                        .await,
                )
            }
        })
        .await
    }

    /// Public profile of a user
    pub async fn get_user(&self, session: &Session, user_id: &str) -> Response<UserData> {
        if let Err(error) = validate_id(user_id, "User ID") {
            return finish("get_user", Err(error));
        }
        retry(DEFAULT_MAX_ATTEMPTS, move || async move {
            finish("get_user", self.load_user(user_id, session).await)
        })
        .await
    }

    /// Uploads of a user, addressed by [`UserData::user_id_media`]
    pub async fn get_user_media_list(
        &self,
        session: &Session,
        user_id_media: &str,
        media_type: MediaType,
        page: u32,
    ) -> Response<MediaList> {
        if let Err(error) = validate_id(user_id_media, "User media ID") {
            return finish("get_user_media_list", Err(error));
        }
        let path = user_media_path(user_id_media, media_type, page);
        retry(DEFAULT_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "get_user_media_list",
                    self.load_listing(Channel::Media, &path, page, ListingKind::Nodes, session)
                        .await,
                )
            }
        })
        .await
    }

    /// Comment wall on a user's profile
    pub async fn get_user_page_comment(
        &self,
        session: &Session,
        user_id: &str,
        page: u32,
    ) -> Response<CommentList> {
        if let Err(error) = validate_id(user_id, "User ID") {
            return finish("get_user_page_comment", Err(error));
        }
        let path = user_comments_path(user_id, page);
        retry(DEFAULT_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "get_user_page_comment",
                    self.load_comments(&path, page, session).await,
                )
            }
        })
        .await
    }

    /// Full-text search over videos and images
    pub async fn search(
        &self,
        session: &Session,
        query: &str,
        page: u32,
        params: &MediaQueryParam,
    ) -> Response<MediaList> {
        let query = query.trim();
        if query.is_empty() {
            return finish(
                "search",
                Err(IwaraError::InvalidId(
                    "Search query cannot be empty".to_string(),
                )),
            );
        }
        let path = search_path(query, page, params);
        retry(DEFAULT_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "search",
                    self.load_listing(Channel::Media, &path, page, ListingKind::Search, session)
                        .await,
                )
            }
        })
        .await
    }

    /// Videos and images the logged-in user liked
    pub async fn get_like_page(&self, session: &Session, page: u32) -> Response<MediaList> {
        let path = like_page_path(page);
        retry(DEFAULT_MAX_ATTEMPTS, move || {
            let path = path.clone();
            async move {
                finish(
                    "get_like_page",
                    self.load_listing(Channel::Standard, &path, page, ListingKind::Nodes, session)
                        .await,
                )
            }
        })
        .await
    }

    /// Post a comment on node `nid`, optionally as a reply to `parent_comment_id`
    ///
    /// `param` must come from a page fetched with the same session, see
    /// [`VideoDetail::comment_post_param`](crate::VideoDetail::comment_post_param).
    /// Success means the site accepted the request, not that the comment is
    /// visible yet.
    pub async fn post_comment(
        &self,
        session: &Session,
        nid: i64,
        parent_comment_id: Option<i64>,
        content: &str,
        param: &CommentPostParam,
    ) -> Response<()> {
        finish(
            "post_comment",
            self.submit_comment(session, nid, parent_comment_id, content, param)
                .await,
        )
    }

    async fn fetch(&self, channel: Channel, path: &str, session: &Session) -> Result<String> {
        self.client.get_page(channel, path, session).await
    }

    async fn load_self(&self, session: &Session) -> Result<SelfProfile> {
        let html = self.fetch(Channel::Standard, &self_path(), session).await?;
        parse_self(&html, self.base_url())
    }

    async fn load_image(&self, image_id: &str, session: &Session) -> Result<ImageDetail> {
        let html = self
            .fetch(Channel::Standard, &image_path(image_id), session)
            .await?;
        parse_image_detail(&html, image_id, self.base_url())
    }

    async fn load_video(&self, video_id: &str, session: &Session) -> Result<VideoDetailOutcome> {
        let html = self
            .fetch(Channel::Standard, &video_path(video_id), session)
            .await?;
        parse_video_detail(&html, video_id, self.base_url())
    }

    async fn load_user(&self, user_id: &str, session: &Session) -> Result<UserData> {
        let html = self
            .fetch(Channel::Standard, &user_path(user_id), session)
            .await?;
        parse_user(&html, user_id, self.base_url())
    }

    async fn load_listing(
        &self,
        channel: Channel,
        path: &str,
        page: u32,
        kind: ListingKind,
        session: &Session,
    ) -> Result<MediaList> {
        let html = self.fetch(channel, path, session).await?;
        let list = parse_media_list(&html, page, kind, self.base_url())?;
        debug!(path, items = list.items.len(), has_next = list.has_next, "Parsed listing");
        Ok(list)
    }

    async fn load_comments(&self, path: &str, page: u32, session: &Session) -> Result<CommentList> {
        let html = self.fetch(Channel::Standard, path, session).await?;
        parse_comment_list(&html, page, self.base_url())
    }

    async fn toggle_flag(
        &self,
        session: &Session,
        kind: FlagKind,
        apply: bool,
        link: &str,
    ) -> Result<FlagResponse> {
        validate_id(link, "Flag link")?;
        info!(kind = kind.segment(), apply, "Toggling flag");
        let body = self
            .client
            .post_form(&flag_path(kind.segment(), apply, link), session, &flag_form())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn submit_comment(
        &self,
        session: &Session,
        nid: i64,
        parent_comment_id: Option<i64>,
        content: &str,
        param: &CommentPostParam,
    ) -> Result<()> {
        if nid <= 0 {
            return Err(IwaraError::InvalidId(format!(
                "Node ID must be positive, got {}",
                nid
            )));
        }
        info!(nid, ?parent_comment_id, "Posting comment");
        let path = comment_reply_path(nid, parent_comment_id);
        self.client
            .post_form(&path, session, &comment_form(content, param))
            .await?;
        Ok(())
    }
}

/// Converts an operation result into its [`Response`], logging failures
fn finish<T>(operation: &str, result: Result<T>) -> Response<T> {
    if let Err(error) = &result {
        warn!(operation, error = %error, "Operation failed");
    }
    Response::from(result)
}

fn validate_id(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IwaraError::InvalidId(format!("{} cannot be empty", label)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_api() -> IwaraApi {
        // Nothing listens on port 9; tests below never reach the network
        IwaraApi::with_config(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_api_creation() {
        let api = IwaraApi::new();
        assert!(api.is_ok());
        assert_eq!(api.unwrap().base_url(), "https://ecchi.iwara.tv");
    }

    #[test]
    fn test_api_with_custom_config() {
        let api = IwaraApi::with_config(ClientConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_api_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IwaraApi>();
    }

    #[tokio::test]
    async fn test_video_detail_empty_id() {
        let api = offline_api();
        let response = api.get_video_page_detail(&Session::guest(), "").await;
        assert_eq!(
            response,
            Response::Failure("Invalid ID: Video ID cannot be empty".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_whitespace_query() {
        let api = offline_api();
        let response = api
            .search(&Session::guest(), "   ", 0, &MediaQueryParam::default())
            .await;
        match response {
            Response::Failure(message) => assert!(message.contains("empty")),
            _ => panic!("Expected failure"),
        }
    }

    #[tokio::test]
    async fn test_user_whitespace_id() {
        let api = offline_api();
        let response = api.get_user(&Session::guest(), "  ").await;
        assert!(response.is_failure());
        let response = api.get_user_page_comment(&Session::guest(), "", 0).await;
        assert!(response.is_failure());
    }

    #[tokio::test]
    async fn test_like_empty_link() {
        let api = offline_api();
        let response = api.like(&Session::new("t"), true, "").await;
        assert_eq!(
            response.message(),
            Some("Invalid ID: Flag link cannot be empty")
        );
    }

    #[tokio::test]
    async fn test_post_comment_rejects_non_positive_nid() {
        let api = offline_api();
        let param = CommentPostParam {
            anti_bot_key: "k".to_string(),
            form_id: "f".to_string(),
            form_token: "t".to_string(),
            form_build_id: "b".to_string(),
            honeypot_time: "h".to_string(),
        };
        let response = api
            .post_comment(&Session::new("t"), 0, None, "hello", &param)
            .await;
        assert!(response.is_failure());
    }
}
