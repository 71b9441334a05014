//! SSM parameter store client for the public global-infrastructure hierarchy

use super::context::{AwsContext, FromAwsContext};
use super::error::ServiceError;
use super::operations::{Page, Parameter, ParameterSource};
use aws_sdk_ssm::Client;
use tracing::debug;

/// SSM client for region metadata lookups
#[derive(Clone)]
pub struct SsmClient {
    client: Client,
}

impl FromAwsContext for SsmClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ssm_client(),
        }
    }
}

impl ParameterSource for SsmClient {
    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<Page<Parameter>, ServiceError> {
        let response = self
            .client
            .get_parameters_by_path()
            .path(path)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(&e))?;

        let items: Vec<Parameter> = response
            .parameters()
            .iter()
            .filter_map(|p| {
                Some(Parameter {
                    name: p.name()?.to_string(),
                    value: p.value()?.to_string(),
                })
            })
            .collect();

        debug!(path = %path, count = items.len(), "Fetched parameter page");

        Ok(Page {
            items,
            next_token: response.next_token().map(str::to_string),
        })
    }

    async fn get_parameter(&self, name: &str) -> Result<Option<String>, ServiceError> {
        let response = self
            .client
            .get_parameters()
            .names(name)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(&e))?;

        if !response.invalid_parameters().is_empty() {
            debug!(parameter = %name, "Parameter does not exist");
        }

        Ok(response
            .parameters()
            .first()
            .and_then(|p| p.value())
            .map(str::to_string))
    }
}
