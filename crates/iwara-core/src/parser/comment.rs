//! Comment thread parser
//!
//! The site renders a thread as a flat run of `div.comment` entries where the
//! replies to an entry live in the `div.indented` element right after it.

use scraper::ElementRef;
use tracing::debug;

use super::dom::{ElementExt, Page, digits};
use super::form::parse_comment_post_param;
use super::listing::has_next_page;
use crate::error::{IwaraError, Result};
use crate::types::{Comment, CommentList, CommentPosterType};
use crate::url::{absolute_url, last_path_segment};

/// Tag appended to comments posted through this library
pub const CLIENT_MARKER: &str = "iwara-rs";

/// Parses the comment section of a video, image or user page
///
/// # Errors
/// Returns `MissingField` if the page has no `div#comments` section or an
/// entry lacks its author, reply link, content or date
pub fn parse_comment_list(html: &str, page: u32, base_url: &str) -> Result<CommentList> {
    let document = Page::parse(html);
    let root = document.root();
    let section = root.require("div#comments", "comment section")?;

    let total = section
        .find("h2.title")?
        .map(|heading| digits(&heading.clean_text()))
        .unwrap_or(0);
    let has_next = has_next_page(section)?;
    let comments = parse_comments(section, base_url)?;
    let post_param = parse_comment_post_param(&document)?;

    debug!(total, page, has_next, roots = comments.len(), "Parsed comment list");

    Ok(CommentList {
        total,
        page,
        has_next,
        comments,
        post_param,
    })
}

/// Builds the comment tree below `container`
///
/// Each direct `div.comment` child becomes one entry. When its next element
/// sibling is a `div.indented`, that element is parsed the same way and
/// becomes the entry's replies.
pub(crate) fn parse_comments(container: ElementRef<'_>, base_url: &str) -> Result<Vec<Comment>> {
    let mut comments = Vec::new();

    for entry in container.element_children() {
        if entry.value().name() != "div" || !entry.has_class_name("comment") {
            continue;
        }

        let mut comment = parse_comment(entry, base_url)?;
        if let Some(indented) = entry
            .next_element()
            .filter(|sibling| sibling.value().name() == "div" && sibling.has_class_name("indented"))
        {
            comment.replies = parse_comments(indented, base_url)?;
        }
        comments.push(comment);
    }

    Ok(comments)
}

fn parse_comment(entry: ElementRef<'_>, base_url: &str) -> Result<Comment> {
    let author = entry.require("a.username", "comment author")?;
    let author_id = author
        .value()
        .attr("href")
        .map(|href| last_path_segment(href).to_string())
        .ok_or_else(|| IwaraError::missing("comment author link"))?;

    let reply_link = entry
        .attr_of("li[class^=\"comment-reply\"] a", "href")?
        .ok_or_else(|| IwaraError::missing("comment reply link"))?;
    let (nid, comment_id) = parse_reply_link(&reply_link)?;

    let poster_type = if entry.has_class_name("by-viewer") {
        CommentPosterType::Viewer
    } else if entry.has_class_name("by-node-author") {
        CommentPosterType::Owner
    } else {
        CommentPosterType::Normal
    };

    let body = entry.require("div.content", "comment content")?;
    let from_this_client = body.exists(&format!("abbr[title=\"{}\"]", CLIENT_MARKER))?;

    let date = entry.require("div.submitted", "comment date")?.own_text();

    Ok(Comment {
        author_id,
        author_name: author.clean_text(),
        author_pic: absolute_url(
            base_url,
            &entry
                .attr_of("div.user-picture img", "src")?
                .unwrap_or_default(),
        ),
        poster_type,
        nid,
        comment_id,
        content: body.plain_text(),
        date,
        from_this_client,
        replies: Vec::new(),
    })
}

/// Splits `/comment/reply/{nid}/{comment_id}` into its two ids
fn parse_reply_link(link: &str) -> Result<(i64, i64)> {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    let mut segments = path.trim_end_matches('/').rsplit('/');

    let parse = |segment: Option<&str>| -> Result<i64> {
        segment
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IwaraError::ParseError(format!("Malformed comment reply link: {}", link)))
    };

    let comment_id = parse(segments.next())?;
    let nid = parse(segments.next())?;
    Ok((nid, comment_id))
}
