//! Profile page parsers: the logged-in account and public user pages

use scraper::ElementRef;
use tracing::debug;

use super::dom::{ElementExt, Page};
use super::form::{extract_comment_reply_nid, parse_comment_post_param};
use super::video::flag_link;
use crate::error::{IwaraError, Result};
use crate::types::{SelfProfile, UserData, UserFriendState};
use crate::url::absolute_url;

const CONNECT_BLOCK: &str = "div#block-mainblocks-user-connect";

/// Parses the `/user` page of the logged-in account
///
/// # Errors
/// Returns `MissingField` if the nickname or the media user id is absent,
/// which is also what a guest session gets back
pub fn parse_self(html: &str, base_url: &str) -> Result<SelfProfile> {
    let page = Page::parse(html);
    let root = page.root();

    let nickname = root.require(".views-field-name", "nickname")?.clean_text();
    let connect = root.require(CONNECT_BLOCK, "user connect block")?;
    let id = media_user_id(connect)?;

    let num_id = root
        .find_all("div.menu-bar ul.dropdown-menu")?
        .get(1)
        .map(|menu| menu.attr_of("li a", "href"))
        .transpose()?
        .flatten()
        .and_then(|href| href.split('/').nth(2).and_then(|s| s.parse().ok()))
        .unwrap_or(0);

    let links = root
        .find("div#user-links")?
        .map(|block| block.find_all("a"))
        .transpose()?
        .unwrap_or_default();
    let messages = links.get(1).map(counter).unwrap_or(0);
    let friend_requests = links
        .get(2)
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.starts_with("/user/friends"))
        })
        .map(counter)
        .unwrap_or(0);

    debug!(id = %id, num_id, friend_requests, messages, "Parsed self profile");

    Ok(SelfProfile {
        id,
        num_id,
        nickname,
        profile_pic: profile_pic(root, base_url)?,
        about: root.text_of(".views-field-field-about")?,
        friend_requests,
        messages,
    })
}

/// Parses a public `/users/{id}` page
///
/// # Errors
/// Returns `MissingField` if the name, the connect block or the media user id
/// is absent
pub fn parse_user(html: &str, user_id: &str, base_url: &str) -> Result<UserData> {
    let page = Page::parse(html);
    let root = page.root();

    let username = root.require(".views-field-name", "username")?.clean_text();
    let connect = root.require(CONNECT_BLOCK, "user connect block")?;
    let user_id_media = media_user_id(connect)?;

    let (follow, follow_link) = flag_link(connect, "follow")?.unwrap_or_default();
    let id = follow_link
        .split('?')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let friend = match connect.find("ul")? {
        Some(list) => list
            .find_all("li")?
            .get(2)
            .map(|item| friend_state(&item.clean_text()))
            .unwrap_or_default(),
        None => UserFriendState::NotFriend,
    };

    let comment_nid = extract_comment_reply_nid(&page.head_html()?).unwrap_or(0);

    debug!(user_id, id, user_id_media = %user_id_media, "Parsed user page");

    Ok(UserData {
        user_id: user_id.to_string(),
        username,
        user_id_media,
        id,
        pic: profile_pic(root, base_url)?,
        about: root.text_of(".views-field-field-about")?,
        join_date: field_value(root, "div.views-field-created")?,
        last_seen: field_value(root, "div.views-field-login")?,
        follow,
        follow_link,
        friend,
        comment_nid,
        comment_post_param: parse_comment_post_param(&page)?,
    })
}

/// Numeric id behind the "new message" link (`/messages/new?user=123`)
fn media_user_id(connect: ElementRef<'_>) -> Result<String> {
    connect
        .attr_of("ul.list-unstyled a", "href")?
        .and_then(|href| href.split_once("user=").map(|(_, id)| id.to_string()))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| IwaraError::missing("media user id"))
}

fn friend_state(label: &str) -> UserFriendState {
    if label.contains("pending") {
        UserFriendState::Pending
    } else if label.eq_ignore_ascii_case("friend") {
        UserFriendState::NotFriend
    } else {
        UserFriendState::Already
    }
}

fn profile_pic(root: ElementRef<'_>, base_url: &str) -> Result<String> {
    Ok(absolute_url(
        base_url,
        &root
            .attr_of(".views-field-picture img", "src")?
            .unwrap_or_default(),
    ))
}

/// Second child of a `label / value` views field
fn field_value(root: ElementRef<'_>, css: &str) -> Result<String> {
    Ok(root
        .find(css)?
        .and_then(|field| field.element_children().get(1).map(|value| value.clean_text()))
        .unwrap_or_default())
}

fn counter(anchor: &ElementRef<'_>) -> u32 {
    anchor.clean_text().parse().unwrap_or(0)
}
