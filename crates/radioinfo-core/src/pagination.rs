//! Paginated resource reader
//!
//! The schedule API splits every listing into pages. Each page carries a
//! `<pagination>` block:
//!
//! ```xml
//! <pagination>
//!   <page>1</page>
//!   <size>10</size>
//!   <totalhits>52</totalhits>
//!   <totalpages>6</totalpages>
//!   <nextpage>http://api.sr.se/api/v2/channels?page=2</nextpage>
//! </pagination>
//! ```
//!
//! [`PaginatedReader::pages`] turns a listing URL into a lazy stream of
//! parsed pages. The same reader serves the channel listing and every
//! per-channel schedule listing; only the item tag and extractor differ.

use std::pin::Pin;

use async_stream::try_stream;
use futures::Stream;
use roxmltree::{Document, Node};
use tracing::debug;

use crate::client::RadioClient;
use crate::error::{RadioInfoError, Result};
use crate::xml::{element_text, first_element, parse_count};

/// Pagination metadata of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Number of pages in the whole listing
    pub total_pages: Option<u32>,
    /// Number of items in the whole listing
    pub total_hits: Option<u32>,
    /// Absolute URL of the following page
    pub next_page: Option<String>,
}

/// One fetched and parsed page
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// 1-based position of the page in the listing
    pub number: u32,
    /// Pagination metadata found on this page
    pub info: PageInfo,
    /// Extracted items, in document order
    pub items: Vec<T>,
}

/// Lazy sequence of pages; ends after the last page or the first error
pub type PageStream<T> = Pin<Box<dyn Stream<Item = Result<Page<T>>> + Send>>;

/// Reads paginated listings page by page
#[derive(Debug, Clone)]
pub struct PaginatedReader {
    client: RadioClient,
}

impl PaginatedReader {
    pub fn new(client: RadioClient) -> Self {
        Self { client }
    }

    /// Stream the pages of the listing at `url`.
    ///
    /// Every element named `tag` on a page is handed to `extract`, and the
    /// results become that page's items. One request is made per page, only
    /// when the stream is polled for it.
    ///
    /// Traversal stops when a page has no `nextpage` link or when as many
    /// pages have been read as the first page's `totalpages` announces. The
    /// stream yields an error and then ends if a fetch fails, a page is not
    /// well-formed XML, a count is not numeric, or `extract` fails. It also
    /// fails when a page short of `totalpages` has no `nextpage`, and when a
    /// `nextpage` link appears without a `totalpages` bound on the first page.
    pub fn pages<T, F>(&self, url: impl Into<String>, tag: &'static str, extract: F) -> PageStream<T>
    where
        T: Send + 'static,
        F: Fn(Node<'_, '_>) -> Result<T> + Send + Sync + 'static,
    {
        let client = self.client.clone();
        let mut next = Some(url.into());

        Box::pin(try_stream! {
            let mut number = 0u32;
            let mut total_pages = None;

            while let Some(url) = next.take() {
                number += 1;
                let body = client.fetch(&url).await?;
                let page = read_page(&body, number, tag, &extract)?;
                debug!(
                    %url,
                    page = number,
                    total_pages = ?page.info.total_pages,
                    items = page.items.len(),
                    "read page"
                );

                if number == 1 {
                    total_pages = page.info.total_pages;
                }
                next = next_page_url(number, total_pages, &page.info)?;
                yield page;
            }
        })
    }
}

/// Parse one page body and extract its `tag` elements.
pub fn read_page<T, F>(body: &str, number: u32, tag: &str, extract: &F) -> Result<Page<T>>
where
    F: Fn(Node<'_, '_>) -> Result<T>,
{
    let document = Document::parse(body)?;
    let info = read_page_info(&document)?;
    let items = document
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == tag)
        .map(extract)
        .collect::<Result<Vec<T>>>()?;

    Ok(Page { number, info, items })
}

/// Pagination metadata of `document`; all fields absent without a
/// `<pagination>` element.
pub fn read_page_info(document: &Document<'_>) -> Result<PageInfo> {
    let Some(pagination) = first_element(document.root(), "pagination") else {
        return Ok(PageInfo::default());
    };

    let total_pages = element_text(pagination, "totalpages")
        .map(|value| parse_count("totalpages", &value))
        .transpose()?;
    let total_hits = element_text(pagination, "totalhits")
        .map(|value| parse_count("totalhits", &value))
        .transpose()?;
    let next_page = element_text(pagination, "nextpage").filter(|url| !url.is_empty());

    Ok(PageInfo {
        total_pages,
        total_hits,
        next_page,
    })
}

/// URL of the page after page `number`, or `None` once the listing is done.
fn next_page_url(number: u32, total_pages: Option<u32>, info: &PageInfo) -> Result<Option<String>> {
    if matches!(total_pages, Some(total) if number >= total) {
        return Ok(None);
    }

    match (&info.next_page, total_pages) {
        (Some(next), Some(_)) => Ok(Some(next.clone())),
        (Some(_), None) => Err(RadioInfoError::ParseError(format!(
            "page {number} has nextpage but no totalpages"
        ))),
        (None, Some(total)) => Err(RadioInfoError::ParseError(format!(
            "page {number} of {total} has no nextpage link"
        ))),
        (None, None) => Ok(None),
    }
}
