//! Gallery page generation.
//!
//! Renders one static HTML document for a bundle:
//!
//! ```text
//! title        (page.title)
//! message      (page.message)
//! download     link to the archive (page.download_label)
//! image        Resized/<name>, linking to Original/<name> in a new tab
//! image        ...
//! ```
//!
//! Images appear in ascending capture-time order. Equal times keep the order
//! the items were given in (enumeration order), since the sort is stable.
//!
//! ## Links
//!
//! Every link is relative to the page and built from path segments, each
//! percent-encoded on its own with [`encode_href`]. Original names may hold
//! spaces, `#`, `%` or non-ASCII characters; none of them survive unencoded.
//!
//! ## Determinism
//!
//! The page depends only on its inputs. It embeds no timestamps or generated
//! IDs, and the stylesheet is compiled in, so rebuilding the same directory
//! yields the same bytes. No external CSS or JS is referenced.
//!
//! Uses [maud](https://maud.lambda.xyz/) for templating; text content is
//! HTML-escaped automatically.

use crate::archive::partial_path;
use crate::config::{OutputConfig, PageConfig};
use chrono::NaiveDateTime;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS: &str = include_str!("../static/page.css");

/// One image on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryItem<'a> {
    /// Original name, used under both the original and resized directories.
    pub name: &'a str,
    pub taken: NaiveDateTime,
}

/// Items ordered by capture time; ties keep their input order.
pub fn sort_by_capture_time<'i, 'a>(items: &'i [GalleryItem<'a>]) -> Vec<&'i GalleryItem<'a>> {
    let mut ordered: Vec<_> = items.iter().collect();
    ordered.sort_by_key(|item| item.taken);
    ordered
}

/// Join path segments into a relative URL, percent-encoding each segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through; every other
/// byte of the UTF-8 encoding becomes `%XX`.
pub fn encode_href(segments: &[&str]) -> String {
    let mut href = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            href.push('/');
        }
        for byte in segment.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
                href.push(byte as char);
            } else {
                // Writing to a String cannot fail
                let _ = write!(href, "%{byte:02X}");
            }
        }
    }
    href
}

/// Render the gallery page.
pub fn render_page(items: &[GalleryItem], output: &OutputConfig, page: &PageConfig) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.title { (page.title) }
                div.message { (page.message) }
                div.download {
                    a href=(encode_href(&[output.archive_name.as_str()])) { (page.download_label) }
                }
                @for item in sort_by_capture_time(items) {
                    (render_image(item, output))
                }
            }
        }
    }
}

fn render_image(item: &GalleryItem, output: &OutputConfig) -> Markup {
    html! {
        div.image {
            a href=(encode_href(&[output.original_dir.as_str(), item.name])) target="_blank" {
                img src=(encode_href(&[output.resized_dir.as_str(), item.name])) alt=(item.name);
            }
        }
    }
}

/// Render the page and write it to `path`, replacing any existing file.
///
/// Like the archive, the page goes to `<name>.partial` first and is renamed
/// into place once fully written. On failure the partial file is removed.
pub fn write_page(
    path: &Path,
    items: &[GalleryItem],
    output: &OutputConfig,
    page: &PageConfig,
) -> Result<(), GenerateError> {
    let markup = render_page(items, output, page);
    let partial = partial_path(path);
    let result =
        fs::write(&partial, markup.into_string()).and_then(|()| fs::rename(&partial, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    tracing::info!(path = %path.display(), images = items.len(), "gallery page written");
    Ok(())
}
