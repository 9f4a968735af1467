//! Comment form token harvesting
//!
//! Pages that accept comments embed an antibot key in the inline settings
//! script in `<head>` and a handful of hidden inputs in the comment form.
//! All five values must be sent back with a new comment.

use regex::Regex;

use super::dom::{ElementExt, Page};
use crate::error::{IwaraError, Result};
use crate::types::CommentPostParam;

const COMMENT_FORM: &str = "form.comment-form.antibot";

/// Harvests the comment token bundle of a page
///
/// Returns `Ok(None)` when the page has no comment form (guests, closed
/// comments). A form that is present but incomplete is an error.
pub(crate) fn parse_comment_post_param(page: &Page) -> Result<Option<CommentPostParam>> {
    let Some(form) = page.root().find(COMMENT_FORM)? else {
        return Ok(None);
    };

    let input = |name: &str| -> Result<String> {
        form.attr_of(&format!("input[name=\"{}\"]", name), "value")?
            .ok_or_else(|| IwaraError::missing(format!("comment form input `{}`", name)))
    };

    let head = page.head_html()?;
    let anti_bot_key =
        extract_anti_bot_key(&head).ok_or_else(|| IwaraError::missing("antibot key"))?;

    Ok(Some(CommentPostParam {
        anti_bot_key,
        form_id: input("form_id")?,
        form_token: input("form_token")?,
        form_build_id: input("form_build_id")?,
        honeypot_time: input("honeypot_time")?,
    }))
}

/// Reads `"key":"..."` from the antibot settings blob
pub(crate) fn extract_anti_bot_key(head_html: &str) -> Option<String> {
    let re = Regex::new(r#"key"\s*:\s*"([^"]*)""#).ok()?;
    re.captures(head_html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Node id the page's comment form posts to (`"action":"\/comment\/reply\/123"`)
pub(crate) fn extract_comment_reply_nid(head_html: &str) -> Option<i64> {
    let re = Regex::new(r#""action"\s*:\s*"\\?/comment\\?/reply\\?/(\d+)"#).ok()?;
    re.captures(head_html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
