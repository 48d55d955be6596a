//! Pagination detection and next-page URL construction.
//!
//! Listing pages either paginate with a "Next" control, with numbered
//! page links, or not at all. Detection is advisory only: the pipeline's
//! hard page cap guarantees termination no matter what the page claims.

use scraper::{Html, Selector};

/// Inspects pagination controls on a listing page.
pub struct Paginator {
    pager_sel: Selector,
    link_sel: Selector,
}

impl Paginator {
    pub fn new() -> Self {
        Self {
            pager_sel: Selector::parse(
                "nav.pager, ul.pager, nav.pagination, ul.pagination, div.pagination",
            )
            .expect("static selector"),
            link_sel: Selector::parse("a").expect("static selector"),
        }
    }

    /// Whether the listing has a page after `current_page` (1-based).
    ///
    /// Checks for a non-disabled "Next" link first, then for numbered
    /// page links exceeding the current page. No pagination control
    /// means single page.
    pub fn has_next_page(&self, doc: &Html, current_page: u32) -> bool {
        let mut saw_pager = false;

        for pager in doc.select(&self.pager_sel) {
            saw_pager = true;
            for link in pager.select(&self.link_sel) {
                let text = link.text().collect::<String>();
                if !text.to_lowercase().contains("next") {
                    continue;
                }
                if Self::is_disabled(link) {
                    continue;
                }
                return true;
            }
        }

        if !saw_pager {
            return false;
        }

        // Numbered page links: a label beyond the current page means more
        // pages exist even without an explicit "Next".
        let max_label = doc
            .select(&self.pager_sel)
            .flat_map(|pager| pager.select(&self.link_sel))
            .filter_map(|link| link.text().collect::<String>().trim().parse::<u32>().ok())
            .max();
        matches!(max_label, Some(max) if max > current_page)
    }

    fn is_disabled(link: scraper::ElementRef<'_>) -> bool {
        let own_disabled = link
            .value()
            .attr("class")
            .is_some_and(|c| c.contains("disabled"));
        let parent_disabled = link
            .parent()
            .and_then(scraper::ElementRef::wrap)
            .and_then(|p| p.value().attr("class").map(|c| c.contains("disabled")))
            .unwrap_or(false);
        own_disabled || parent_disabled
    }

    /// URL for the given 1-based page ordinal.
    ///
    /// Page 1 is the bare listing URL; later pages append the zero-based
    /// `page` query parameter used by the common CMS.
    pub fn page_url(&self, listing_url: &str, page: u32) -> String {
        if page <= 1 {
            return listing_url.to_string();
        }
        let sep = if listing_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", listing_url, sep, page - 1)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}
