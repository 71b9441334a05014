//! Draining paginated listings
//!
//! Every listing the caches depend on must be read to the end: a partial read
//! under-reports regions or offers. [`drain_pages`] either returns every item
//! of every page or an error, never a prefix.

use crate::aws::error::ServiceError;
use crate::aws::operations::Page;
use crate::error::PricingError;
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

/// Fetch pages until the continuation token runs out.
///
/// `fetch` is called with `None` first, then with each returned token. A
/// failure on any page, or a token that repeats (which would loop forever),
/// aborts the whole listing with [`PricingError::Pagination`].
pub async fn drain_pages<T, F, Fut>(operation: &'static str, mut fetch: F) -> Result<Vec<T>, PricingError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ServiceError>>,
{
    let mut items = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut next_token = None;
    let mut pages_read = 0usize;

    loop {
        let page = fetch(next_token.take()).await.map_err(|source| PricingError::Pagination {
            operation,
            pages_read,
            source,
        })?;
        pages_read += 1;
        items.extend(page.items);

        match page.next_token {
            Some(token) if token.is_empty() => break,
            Some(token) => {
                if !seen_tokens.insert(token.clone()) {
                    return Err(PricingError::Pagination {
                        operation,
                        pages_read,
                        source: ServiceError::new(
                            None,
                            format!("continuation token {token} repeated"),
                        ),
                    });
                }
                next_token = Some(token);
            }
            None => break,
        }
    }

    debug!(operation, pages = pages_read, items = items.len(), "Drained listing");
    Ok(items)
}
