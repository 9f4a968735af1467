use iwara_core::{
    ClientConfig, CommentPostParam, IwaraApi, MediaQueryParam, MediaType, Response, Session,
    SortType, VideoDetailOutcome,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> IwaraApi {
    IwaraApi::with_config(ClientConfig {
        base_url: server.uri(),
        api_url: server.uri(),
        timeout_secs: 5,
        ..ClientConfig::default()
    })
    .unwrap()
}

const LISTING_PAGE: &str = r#"
    <html><body>
    <div class="view-content">
        <div id="node-aaa" class="node node-video">
            <div class="field-item even"><a href="/videos/aaa"><img src="//i.iwara.tv/aaa.jpg"></a></div>
            <h3 class="title"><a href="/videos/aaa">First</a></h3>
            <a class="username" href="/users/alice">alice</a>
            <div class="left-icon">10</div><div class="right-icon">2</div>
        </div>
    </div>
    <ul class="pager"><li class="pager-next"><a href="?page=1">next</a></li></ul>
    </body></html>
"#;

const SEARCH_PAGE: &str = r#"
    <html><body>
    <div class="views-row">
        <div class="views-column views-column-first">
            <div class="field-item even"><img src="//i.iwara.tv/v.jpg"></div>
            <h3 class="title"><a href="/videos/vid123">Found video</a></h3>
            <div class="video-info">3,400 120</div>
            <div class="submitted">by <a href="/users/dan">dan</a> 2020-12-24 20:15</div>
        </div>
        <div class="views-column views-column-last">
            <div class="field-item even"><img src="//i.iwara.tv/i.jpg"></div>
            <h1 class="title">Found image</h1>
            <div class="node-views">77</div>
            <div class="submitted"><a href="/images">Images</a> by <a href="/users/eve">eve</a></div>
            <div class="share-icons">
                <a class="symbol" href="https://twitter.com/share?url=https%3A%2F%2Fecchi.iwara.tv%2Fimages%2Fimg456">t</a>
            </div>
        </div>
    </div>
    </body></html>
"#;

fn comment_entry(author: &str, nid: i64, cid: i64) -> String {
    format!(
        r#"<div class="comment clearfix">
            <div class="submitted"><a class="username" href="/users/{author}">{author}</a> 2021-05-06 07:08</div>
            <div class="content"><p>from {author}</p></div>
            <ul class="links inline"><li class="comment-reply first last"><a href="/comment/reply/{nid}/{cid}">reply</a></li></ul>
        </div>"#
    )
}

fn comment_page(nid: i64) -> String {
    format!(
        r#"<html><body>
        <div id="comments" class="comment-wrapper">
            <h2 class="title">2 Comments</h2>
            {root}
            <div class="indented">{reply}</div>
        </div>
        </body></html>"#,
        root = comment_entry("owner", nid, 1),
        reply = comment_entry("fan", nid, 2),
    )
}

#[tokio::test]
async fn login_maps_400_to_credential_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let response = api_for(&server).login("me@example.com", "wrong").await;
    assert_eq!(
        response,
        Response::Failure("Invalid username or password".to_string())
    );
}

#[tokio::test]
async fn login_returns_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_string_contains("me@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"token":"abc"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server).login("me@example.com", "pw").await;
    assert_eq!(response, Response::Success(Session::new("abc")));
}

#[tokio::test]
async fn friends_only_video_is_private_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/secret"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Iwara</title></head><body>
            <section id="content"><div class="content">
            The author has chosen to restrict this video to users on their friends list.
            </div></section></body></html>"#,
        ))
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_video_page_detail(&Session::new("t"), "secret")
        .await;
    assert_eq!(response, Response::Success(VideoDetailOutcome::Private));
}

#[tokio::test]
async fn media_list_is_retried_three_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_media_list(
            &Session::guest(),
            MediaType::Video,
            0,
            &MediaQueryParam::default(),
        )
        .await;
    assert_eq!(
        response,
        Response::Failure("Unexpected HTTP status: 500".to_string())
    );
}

#[tokio::test]
async fn transient_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("sort", "likes"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_media_list(
            &Session::guest(),
            MediaType::Video,
            0,
            &MediaQueryParam::new(SortType::Likes),
        )
        .await;
    let list = response.ok().unwrap();
    assert_eq!(list.current_page, 0);
    assert!(list.has_next);
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].media_id, "aaa");
}

#[tokio::test]
async fn detail_reads_are_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/x"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_image_page_detail(&Session::guest(), "x")
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn mutating_calls_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .like(&Session::new("t"), true, "12?destination=videos/x&token=y")
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_subscription_list(&Session::new("s3cret"), 0)
        .await;
    assert!(response.is_success());
}

#[tokio::test]
async fn like_decodes_flag_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/flag/flag/like/12"))
        .and(body_string_contains("js=true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":true,"flagName":"like","flagStatus":"flagged","newLink":"<a>Unlike</a>","flagSuccess":true,"contentId":12}"#,
        ))
        .mount(&server)
        .await;

    let reply = api_for(&server)
        .like(&Session::new("t"), true, "12")
        .await
        .ok()
        .unwrap();
    assert!(reply.status);
    assert!(reply.flag_success);
    assert_eq!(reply.flag_name, "like");
    assert_eq!(reply.flag_status, "flagged");
}

#[tokio::test]
async fn comment_post_submits_form_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/comment/reply/4321/77"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let param = CommentPostParam {
        anti_bot_key: "abk".to_string(),
        form_id: "comment_node_video_form".to_string(),
        form_token: "tok".to_string(),
        form_build_id: "form-1".to_string(),
        honeypot_time: "1650000000".to_string(),
    };
    let response = api_for(&server)
        .post_comment(&Session::new("t"), 4321, Some(77), "nice", &param)
        .await;
    assert_eq!(response, Response::Success(()));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    for expected in [
        "form_build_id=form-1",
        "form_token=tok",
        "antibot_key=abk",
        "form_id=comment_node_video_form",
        "honeypot_time=1650000000",
        "nice%5Babbr%3Diwara-rs%5D%5B%2Fabbr%5D",
    ] {
        assert!(body.contains(expected), "missing {} in {}", expected, body);
    }
}

#[tokio::test]
async fn self_profile_is_attempted_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server).get_self(&Session::new("t")).await;
    assert_eq!(
        response,
        Response::Failure("Unexpected HTTP status: 500".to_string())
    );
}

#[tokio::test]
async fn comment_post_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/comment/reply/10"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let param = CommentPostParam {
        anti_bot_key: "abk".to_string(),
        form_id: "comment_node_video_form".to_string(),
        form_token: "tok".to_string(),
        form_build_id: "form-1".to_string(),
        honeypot_time: "1650000000".to_string(),
    };
    let response = api_for(&server)
        .post_comment(&Session::new("t"), 10, None, "hello", &param)
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn search_is_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .search(&Session::guest(), "miku", 0, &MediaQueryParam::default())
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn search_parses_result_cells() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "miku"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let list = api_for(&server)
        .search(&Session::guest(), "miku", 1, &MediaQueryParam::default())
        .await
        .ok()
        .unwrap();
    assert_eq!(list.current_page, 1);
    assert!(!list.has_next);
    let items: Vec<(MediaType, &str)> = list
        .items
        .iter()
        .map(|item| (item.media_type, item.media_id.as_str()))
        .collect();
    assert_eq!(
        items,
        vec![(MediaType::Video, "vid123"), (MediaType::Image, "img456")]
    );
    assert_eq!(list.items[0].author, "dan");
}

#[tokio::test]
async fn comment_list_is_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/v1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_comment_list(&Session::guest(), MediaType::Video, "v1", 0)
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn comment_list_recovers_with_reply_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/i1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/i1"))
        .and(query_param("language", "en"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(comment_page(300)))
        .expect(1)
        .mount(&server)
        .await;

    let list = api_for(&server)
        .get_comment_list(&Session::guest(), MediaType::Image, "i1", 2)
        .await
        .ok()
        .unwrap();
    assert_eq!(list.total, 2);
    assert_eq!(list.page, 2);
    assert_eq!(list.comments.len(), 1);
    assert_eq!(list.comments[0].author_id, "owner");
    assert_eq!(list.comments[0].replies.len(), 1);
    assert_eq!(list.comments[0].replies[0].comment_id, 2);
}

#[tokio::test]
async fn user_page_comments_are_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_user_page_comment(&Session::guest(), "alice", 0)
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn user_page_comments_recover_with_reply_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .and(query_param("language", "en"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(comment_page(77)))
        .expect(1)
        .mount(&server)
        .await;

    let list = api_for(&server)
        .get_user_page_comment(&Session::guest(), "alice", 1)
        .await
        .ok()
        .unwrap();
    assert_eq!(list.comments.len(), 1);
    assert_eq!(list.comments[0].nid, 77);
    assert_eq!(list.comments[0].replies[0].author_id, "fan");
}

#[tokio::test]
async fn user_media_list_hits_numeric_user_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42/images"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let list = api_for(&server)
        .get_user_media_list(&Session::guest(), "42", MediaType::Image, 3)
        .await
        .ok()
        .unwrap();
    assert_eq!(list.current_page, 3);
    assert_eq!(list.items.len(), 1);
}

#[tokio::test]
async fn user_media_list_is_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42/videos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .get_user_media_list(&Session::guest(), "42", MediaType::Video, 0)
        .await;
    assert!(response.is_failure());
}

#[tokio::test]
async fn like_page_hits_liked_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/liked"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let list = api_for(&server)
        .get_like_page(&Session::new("t"), 2)
        .await
        .ok()
        .unwrap();
    assert_eq!(list.current_page, 2);
    assert_eq!(list.items[0].media_id, "aaa");
}

#[tokio::test]
async fn like_page_is_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/liked"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let response = api_for(&server).get_like_page(&Session::new("t"), 0).await;
    assert!(response.is_failure());
}
