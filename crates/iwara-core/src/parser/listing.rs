//! Listing page parser
//!
//! Subscriptions, the site-wide media lists, a user's uploads, the liked page
//! and search results all share this extractor. They differ only in how rows
//! are laid out, which [`ListingKind`] selects.

use regex::Regex;
use scraper::ElementRef;

use super::dom::{ElementExt, Page, extract_date};
use crate::error::{IwaraError, Result};
use crate::types::{MediaList, MediaPreview, MediaType};
use crate::url::{absolute_url, last_path_segment};

/// Placeholder thumbnail the site uses for rows without one
const DEFAULT_THUMBNAIL: &str = "/sites/all/themes/main/img/logo.png";

/// Row layout of a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// `div#node-<id>` teaser rows
    Nodes,
    /// `div.views-column` cells mixing videos and images
    Search,
}

/// Parses a listing page into a [`MediaList`]
///
/// # Arguments
/// * `html` - Raw HTML of the listing page
/// * `page` - Page number the HTML was fetched for
/// * `kind` - Row layout of the page
/// * `base_url` - Site root used to absolutize relative image links
///
/// # Errors
/// Returns `MissingField` if a row lacks its title or link
pub fn parse_media_list(
    html: &str,
    page: u32,
    kind: ListingKind,
    base_url: &str,
) -> Result<MediaList> {
    let document = Page::parse(html);
    let root = document.root();

    let items = match kind {
        ListingKind::Nodes => node_rows(root)?
            .into_iter()
            .map(|row| parse_node_row(row, base_url))
            .collect::<Result<Vec<_>>>()?,
        ListingKind::Search => root
            .find_all("div.views-column")?
            .into_iter()
            .map(|cell| parse_search_cell(cell, base_url))
            .collect::<Result<Vec<_>>>()?,
    };

    Ok(MediaList {
        current_page: page,
        has_next: has_next_page(root)?,
        items,
    })
}

/// True iff the first pager under `scope` has a "next" entry
///
/// A page without any pager has no next page.
pub(crate) fn has_next_page(scope: ElementRef<'_>) -> Result<bool> {
    match scope.find("ul.pager")? {
        Some(pager) => pager.exists(".pager-next"),
        None => Ok(false),
    }
}

/// `div` elements whose id is exactly `node-<alnum>`
pub(crate) fn node_rows<'a>(scope: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>> {
    let id_pattern = Regex::new(r"^node-[A-Za-z0-9]+$")
        .map_err(|e| IwaraError::ParseError(e.to_string()))?;
    Ok(scope
        .find_all("div[id^=\"node-\"]")?
        .into_iter()
        .filter(|row| row.value().id().is_some_and(|id| id_pattern.is_match(id)))
        .collect())
}

fn parse_node_row(row: ElementRef<'_>, base_url: &str) -> Result<MediaPreview> {
    let link = match row.attr_of(".field-item.even a", "href")? {
        Some(link) => link,
        None => row
            .attr_of("a", "href")?
            .ok_or_else(|| IwaraError::missing("listing row link"))?,
    };

    let title = row.text_of(".title")?;
    if title.is_empty() {
        return Err(IwaraError::missing("listing row title"));
    }

    let pic = row
        .attr_of(".field-item.even img", "src")?
        .unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string());

    Ok(MediaPreview {
        title,
        author: row.text_of(".username")?,
        preview_pic: absolute_url(base_url, &pic),
        likes: row.text_of(".right-icon")?,
        watches: row.text_of(".left-icon")?,
        media_type: MediaType::from_link(&link),
        media_id: last_path_segment(&link).to_string(),
        private: row.exists("div.private-video")?,
        created_at: extract_date(&row.text_of(".submitted")?),
    })
}

fn parse_search_cell(cell: ElementRef<'_>, base_url: &str) -> Result<MediaPreview> {
    let media_type = if cell.exists("h3.title")? {
        MediaType::Video
    } else {
        MediaType::Image
    };

    let title = match cell.find("h3.title")? {
        Some(heading) => heading.clean_text(),
        None => cell.require("h1.title", "search result title")?.clean_text(),
    };

    let authors = cell.find_all(".submitted a")?;
    let author = match media_type {
        MediaType::Video => authors.first(),
        MediaType::Image => authors.last(),
    }
    .map(|a| a.clean_text())
    .ok_or_else(|| IwaraError::missing("search result author"))?;

    let pic = cell
        .attr_of(".field-item.even img", "src")?
        .unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string());

    let (watches, likes, link) = match media_type {
        MediaType::Video => {
            let info = cell.text_of(".video-info")?;
            let mut parts = info.split_whitespace();
            let watches = parts.next().unwrap_or_default().to_string();
            let likes = parts.next().unwrap_or_default().to_string();
            let link = cell
                .attr_of("h3.title a", "href")?
                .ok_or_else(|| IwaraError::missing("search result link"))?;
            (watches, likes, link)
        }
        MediaType::Image => {
            let watches = cell.text_of(".node-views")?;
            // Image cells only link to themselves through the share buttons,
            // whose href carries the page path url-encoded at the end.
            let share = cell
                .attr_of(".share-icons a.symbol", "href")?
                .ok_or_else(|| IwaraError::missing("search result share link"))?;
            let link = match share.rfind("%2F") {
                Some(index) => share[index + 3..].to_string(),
                None => share,
            };
            (watches, String::new(), link)
        }
    };

    Ok(MediaPreview {
        title,
        author,
        preview_pic: absolute_url(base_url, &pic),
        likes,
        watches,
        media_type,
        media_id: last_path_segment(&link).to_string(),
        private: false,
        created_at: extract_date(&cell.text_of(".submitted")?),
    })
}
