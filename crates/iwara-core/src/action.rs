//! Form bodies for the mutating endpoints
//!
//! Building the bodies is kept apart from sending them so the exact fields a
//! comment or flag toggle submits can be checked without a server.

use serde::{Deserialize, Serialize};

use crate::parser::CLIENT_MARKER;
use crate::types::CommentPostParam;

/// Submit button value the comment form expects in `op`
///
/// This is the English label, so tokens must come from a page fetched with
/// `language=en` (see [`crate::url::user_path`]).
const COMMENT_OP: &str = "Save";

/// Which flag a toggle applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    Like,
    Follow,
}

impl FlagKind {
    /// Path segment in `/flag/{flag|unflag}/{segment}/...`
    pub fn segment(self) -> &'static str {
        match self {
            FlagKind::Like => "like",
            FlagKind::Follow => "follow",
        }
    }
}

/// Body of a flag toggle request
pub fn flag_form() -> Vec<(String, String)> {
    vec![("js".to_string(), "true".to_string())]
}

/// Comment content with the client tag appended
pub fn marked_content(content: &str) -> String {
    format!("{}[abbr={}][/abbr]", content, CLIENT_MARKER)
}

/// Body of a comment submission
///
/// The five token fields must come from the same page load as the form,
/// otherwise the site rejects the post.
pub fn comment_form(content: &str, param: &CommentPostParam) -> Vec<(String, String)> {
    [
        ("op", COMMENT_OP.to_string()),
        ("comment_body[und][0][value]", marked_content(content)),
        ("form_build_id", param.form_build_id.clone()),
        ("form_token", param.form_token.clone()),
        ("antibot_key", param.anti_bot_key.clone()),
        ("form_id", param.form_id.clone()),
        ("honeypot_time", param.honeypot_time.clone()),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param() -> CommentPostParam {
        CommentPostParam {
            anti_bot_key: "abk".to_string(),
            form_id: "comment_node_video_form".to_string(),
            form_token: "tok".to_string(),
            form_build_id: "form-1".to_string(),
            honeypot_time: "1650000000|x".to_string(),
        }
    }

    fn field<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
        form.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_comment_form_carries_tokens_and_marked_content() {
        let form = comment_form("nice work", &param());
        assert_eq!(form.len(), 7);
        assert_eq!(field(&form, "op"), Some("Save"));
        assert_eq!(
            field(&form, "comment_body[und][0][value]"),
            Some("nice work[abbr=iwara-rs][/abbr]")
        );
        assert_eq!(field(&form, "form_build_id"), Some("form-1"));
        assert_eq!(field(&form, "form_token"), Some("tok"));
        assert_eq!(field(&form, "antibot_key"), Some("abk"));
        assert_eq!(field(&form, "form_id"), Some("comment_node_video_form"));
        assert_eq!(field(&form, "honeypot_time"), Some("1650000000|x"));
    }

    #[test]
    fn test_comment_form_follows_token_changes() {
        let original = comment_form("hi", &param());
        let mut refreshed = param();
        refreshed.form_token = "tok-2".to_string();
        let changed = comment_form("hi", &refreshed);
        assert_ne!(original, changed);
        assert_eq!(field(&changed, "form_token"), Some("tok-2"));
    }

    #[test]
    fn test_flag_kind_segments() {
        assert_eq!(FlagKind::Like.segment(), "like");
        assert_eq!(FlagKind::Follow.segment(), "follow");
        assert_eq!(flag_form(), vec![("js".to_string(), "true".to_string())]);
    }
}
