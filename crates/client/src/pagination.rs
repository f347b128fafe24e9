use pulse_core::ReportPage;

use crate::error::{ClientError, HandlerError, Result};

/// Explicit offset request for pages after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub start_index: u32,
    pub max_results: u32,
}

/// Drive `fetch` until a page arrives without a continuation indicator,
/// handing each page to `handler` in order.
///
/// The endpoint's forward cursor is unreliable, so the next offset is
/// recomputed from the page number and the page size after every delivered
/// page instead of following the continuation link.
pub(crate) fn paginate<F, H>(mut fetch: F, mut handler: H) -> Result<()>
where
    F: FnMut(Option<PageCursor>) -> Result<ReportPage>,
    H: FnMut(&ReportPage) -> std::result::Result<(), HandlerError>,
{
    let mut cursor = None;
    let mut page_number: u32 = 0;
    loop {
        let page = fetch(cursor)?;
        page_number += 1;
        handler(&page).map_err(ClientError::Handler)?;
        if !page.has_more {
            return Ok(());
        }
        cursor = Some(PageCursor {
            start_index: page_number * page.items_per_page + 1,
            max_results: page.items_per_page,
        });
    }
}
