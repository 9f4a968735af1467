//! Video page parser
//!
//! Decides first whether the page is a friends-only or deleted placeholder;
//! only a real video page goes through field extraction.

use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use super::dom::{ElementExt, Page, digits, extract_date};
use super::form::parse_comment_post_param;
use super::listing::node_rows;
use crate::error::{IwaraError, Result};
use crate::types::{MoreVideo, VideoDetail, VideoDetailOutcome};
use crate::url::{absolute_url, last_path_segment};

/// `<title>` of the page the site serves for removed content
pub const SITE_NAME: &str = "Iwara";

/// Body text shown instead of a friends-only video
pub const PRIVATE_MARKER: &str = "has chosen to restrict this video to users on their friends";

/// Parses a video page
///
/// # Arguments
/// * `html` - Raw HTML of `/videos/{id}`
/// * `video_id` - Id the page was requested for
/// * `base_url` - Site root used to absolutize relative links
///
/// # Returns
/// [`VideoDetailOutcome::Private`] or [`VideoDetailOutcome::Deleted`] for
/// placeholder pages, otherwise the extracted detail
///
/// # Errors
/// Returns `MissingField` if title, view counts or author are absent
pub fn parse_video_detail(html: &str, video_id: &str, base_url: &str) -> Result<VideoDetailOutcome> {
    let page = Page::parse(html);
    let root = page.root();

    let restricted = root
        .find_all("section#content div.content")?
        .iter()
        .any(|content| content.clean_text().contains(PRIVATE_MARKER));
    if restricted {
        debug!(video_id, "video is restricted to friends");
        return Ok(VideoDetailOutcome::Private);
    }

    if page.title()? == SITE_NAME {
        debug!(video_id, "video page is the bare site page, treating as deleted");
        return Ok(VideoDetailOutcome::Deleted);
    }

    let nid = extract_nid(html).unwrap_or_else(|| {
        warn!(video_id, "video nid not found, comments cannot be posted");
        0
    });

    let title = match root.find("h1.title")? {
        Some(heading) => heading.clean_text(),
        None => root.require(".title", "video title")?.clean_text(),
    };

    let views = root.require(".node-views", "video view counts")?.clean_text();
    let mut counters = views.split_whitespace();
    let likes = counters.next().unwrap_or_default().to_string();
    let watches = counters.next().unwrap_or_default().to_string();

    let author = root.require("a.username", "video author")?;
    let author_id = author
        .value()
        .attr("href")
        .map(|href| last_path_segment(href).to_string())
        .ok_or_else(|| IwaraError::missing("video author link"))?;

    let description = root
        .find(".field-name-body")?
        .map(|body| body.plain_text())
        .unwrap_or_default();

    let (is_liked, like_link) = flag_link(root, "like")?.unwrap_or_default();
    let like_link = urlencoding::decode(&like_link)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(like_link);
    let (is_following, follow_link) = flag_link(root, "follow")?.unwrap_or_default();

    let detail = VideoDetail {
        id: video_id.to_string(),
        nid,
        title,
        likes,
        watches,
        post_date: extract_date(&root.text_of("div.submitted")?),
        description,
        author_id,
        author_name: author.clean_text(),
        author_pic: absolute_url(
            base_url,
            &root.attr_of(".user-picture img", "src")?.unwrap_or_default(),
        ),
        comments: digits(&root.text_of("div#comments h2.title")?),
        more_videos: more_videos(root, "div#block-views-videos-block-1", base_url)?,
        recommended_videos: more_videos(root, "div#block-views-search-block-1", base_url)?,
        preview: absolute_url(
            base_url,
            &root.attr_of("video#video-player", "poster")?.unwrap_or_default(),
        ),
        is_liked,
        like_link,
        is_following,
        follow_link,
        comment_post_param: parse_comment_post_param(&page)?,
    };

    debug!(
        video_id,
        title = %detail.title,
        author = %detail.author_name,
        liked = detail.is_liked,
        following = detail.is_following,
        "parsed video detail"
    );

    Ok(VideoDetailOutcome::Found(Box::new(detail)))
}

/// Internal node id from the inline settings script
fn extract_nid(html: &str) -> Option<i64> {
    let re = Regex::new(r#""nid"\s*:\s*"?(\d+)"#).ok()?;
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First `/flag/.../{kind}/...` link under `scope`
///
/// Returns whether the flag is currently set (the link offers "unflag") and
/// the opaque remainder after `/{kind}/`.
pub(crate) fn flag_link(scope: ElementRef<'_>, kind: &str) -> Result<Option<(bool, String)>> {
    let marker = format!("/{}/", kind);
    for anchor in scope.find_all("a[href^=\"/flag/\"]")? {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(index) = href.find(&marker) {
            let flagged = href.starts_with("/flag/unflag/");
            return Ok(Some((flagged, href[index + marker.len()..].to_string())));
        }
    }
    Ok(None)
}

fn more_videos(root: ElementRef<'_>, block: &str, base_url: &str) -> Result<Vec<MoreVideo>> {
    let Some(content) = root.find(&format!("{} .view-content", block))? else {
        return Ok(Vec::new());
    };

    let mut videos = Vec::new();
    for row in node_rows(content)? {
        let Some(href) = row.attr_of("a", "href")? else {
            continue;
        };
        let image = row.find("img")?;
        let counter = |css: &str| -> Result<String> {
            let text = row.text_of(css)?;
            Ok(if text.is_empty() { "?".to_string() } else { text })
        };
        videos.push(MoreVideo {
            id: last_path_segment(&href).to_string(),
            title: image
                .and_then(|img| img.value().attr("title"))
                .unwrap_or_default()
                .to_string(),
            pic: absolute_url(
                base_url,
                image.and_then(|img| img.value().attr("src")).unwrap_or_default(),
            ),
            likes: counter(".right-icon")?,
            watches: counter(".left-icon")?,
        });
    }
    Ok(videos)
}
