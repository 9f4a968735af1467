//! Image page parser

use super::dom::{ElementExt, Page};
use crate::error::{IwaraError, Result};
use crate::types::ImageDetail;
use crate::url::{absolute_url, last_path_segment};

/// Parses an image page
///
/// # Errors
/// Returns `MissingField` if the title or author is absent
pub fn parse_image_detail(html: &str, image_id: &str, base_url: &str) -> Result<ImageDetail> {
    let page = Page::parse(html);
    let root = page.root();

    let title = match root.find("h1.title")? {
        Some(heading) => heading.clean_text(),
        None => root.require(".title", "image title")?.clean_text(),
    };

    let image_links = root
        .find_all(".field-name-field-images a")?
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(|href| absolute_url(base_url, href))
        .collect();

    let author = root.require("a.username", "image author")?;
    let author_id = author
        .value()
        .attr("href")
        .map(|href| last_path_segment(href).to_string())
        .ok_or_else(|| IwaraError::missing("image author link"))?;

    Ok(ImageDetail {
        id: image_id.to_string(),
        title,
        image_links,
        description: root
            .find(".field-name-body")?
            .map(|body| body.plain_text())
            .unwrap_or_default(),
        author_id,
        author_name: author.clean_text(),
        author_pic: absolute_url(
            base_url,
            &root.attr_of(".user-picture img", "src")?.unwrap_or_default(),
        ),
        watches: root.text_of(".node-views")?,
    })
}
