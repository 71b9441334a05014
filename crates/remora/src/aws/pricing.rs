//! AWS Pricing API client

use super::context::{AwsContext, FromAwsContext};
use super::error::ServiceError;
use super::operations::{AttributeSource, CatalogueQuery, CatalogueSource, Page};
use aws_sdk_pricing::Client;
use aws_sdk_pricing::types::{Filter, FilterType};
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{debug, warn};

/// Page size requested from the Pricing API (its maximum)
const PAGE_SIZE: i32 = 100;

/// Price-list format version understood by the normalizer
const FORMAT_VERSION: &str = "aws_v1";

/// Pricing client for catalogue queries
///
/// Throttled calls are retried with exponential backoff; every other
/// failure is returned to the caller as a [`ServiceError`].
#[derive(Clone)]
pub struct PricingClient {
    client: Client,
}

impl FromAwsContext for PricingClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.pricing_client(),
        }
    }
}

fn backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(10))
        .with_max_times(5)
}

impl PricingClient {
    async fn fetch_products(
        &self,
        query: &CatalogueQuery,
        next_token: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        let filters = query
            .filters
            .iter()
            .map(|f| {
                Filter::builder()
                    .r#type(FilterType::TermMatch)
                    .field(&f.field)
                    .value(&f.value)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::new(None, format!("Invalid pricing filter: {e}")))?;

        let response = self
            .client
            .get_products()
            .service_code(&query.service_code)
            .set_filters(Some(filters))
            .format_version(FORMAT_VERSION)
            .set_next_token(next_token)
            .max_results(PAGE_SIZE)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(&e))?;

        debug!(
            service_code = %query.service_code,
            entries = response.price_list().len(),
            "Fetched price list page"
        );

        Ok(Page {
            items: response.price_list().to_vec(),
            next_token: response.next_token().map(str::to_string),
        })
    }

    async fn fetch_attribute_values(
        &self,
        service_code: &str,
        attribute_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        let response = self
            .client
            .get_attribute_values()
            .service_code(service_code)
            .attribute_name(attribute_name)
            .set_next_token(next_token)
            .max_results(PAGE_SIZE)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(&e))?;

        Ok(Page {
            items: response
                .attribute_values()
                .iter()
                .filter_map(|v| v.value())
                .map(str::to_string)
                .collect(),
            next_token: response.next_token().map(str::to_string),
        })
    }
}

fn notify_throttled(e: &ServiceError, delay: Duration) {
    warn!(delay = ?delay, error = %e, "Pricing API rate limited, backing off...");
}

impl CatalogueSource for PricingClient {
    async fn get_products(
        &self,
        query: &CatalogueQuery,
        next_token: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        (|| async { self.fetch_products(query, next_token.clone()).await })
            .retry(backoff())
            .when(ServiceError::is_throttled)
            .notify(notify_throttled)
            .await
    }
}

impl AttributeSource for PricingClient {
    async fn get_attribute_values(
        &self,
        service_code: &str,
        attribute_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        (|| async {
            self.fetch_attribute_values(service_code, attribute_name, next_token.clone())
                .await
        })
        .retry(backoff())
        .when(ServiceError::is_throttled)
        .notify(notify_throttled)
        .await
    }
}
