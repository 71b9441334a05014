//! Pricing session: one catalogue connection, one region map, one cache per
//! resource kind

use super::cache::OfferCache;
use crate::aws::{
    AttributeSource, AwsContext, CatalogueSource, FromAwsContext, ParameterSource, PricingClient,
    SsmClient,
};
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::regions::RegionNameTranslator;
use remora_common::endpoints::EndpointTable;
use remora_common::ResourceKind;
use std::sync::Arc;
use tracing::info;

/// Endpoint prefix of the pricing service in the endpoints table
pub const PRICING_SERVICE: &str = "pricing";

/// Fail with [`PricingError::ServiceUnavailableInRegion`] unless `service`
/// has an endpoint in `region`.
pub fn ensure_service_region(service: &str, region: &str) -> Result<(), PricingError> {
    if EndpointTable::bundled()?.is_service_available(service, region) {
        Ok(())
    } else {
        Err(PricingError::ServiceUnavailableInRegion {
            service: service.to_string(),
            region: region.to_string(),
        })
    }
}

pub struct PricingSession<S, P> {
    region: String,
    translator: Arc<RegionNameTranslator<P>>,
    ec2: OfferCache<S, P>,
    ebs: OfferCache<S, P>,
}

impl PricingSession<PricingClient, SsmClient> {
    /// Open a session against the AWS pricing endpoint in `config.region`.
    pub async fn connect(config: &PricingConfig) -> Result<Self, PricingError> {
        let ctx = AwsContext::with_profile(Some(&config.region), config.profile.as_deref()).await;
        Self::new(
            &config.region,
            &config.currency,
            PricingClient::from_context(&ctx),
            RegionNameTranslator::new(SsmClient::from_context(&ctx), Some(&config.partition))?,
        )
    }
}

impl<S, P> PricingSession<S, P>
where
    S: CatalogueSource + AttributeSource,
    P: ParameterSource,
{
    /// Build a session over arbitrary sources.
    ///
    /// `region` is where `source` sends requests and must host a pricing
    /// endpoint.
    pub fn new(
        region: &str,
        currency: &str,
        source: S,
        translator: RegionNameTranslator<P>,
    ) -> Result<Self, PricingError> {
        ensure_service_region(PRICING_SERVICE, region)?;

        let source = Arc::new(source);
        let translator = Arc::new(translator);
        let cache = |kind| {
            OfferCache::new(kind, currency, Arc::clone(&source), Arc::clone(&translator))
        };
        let (ec2, ebs) = (cache(ResourceKind::Ec2), cache(ResourceKind::Ebs));

        info!(region, currency, "Opened pricing session");
        Ok(Self {
            region: region.to_string(),
            translator,
            ec2,
            ebs,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn translator(&self) -> &RegionNameTranslator<P> {
        &self.translator
    }

    /// Cache for a resource kind.
    pub fn offers(&self, kind: ResourceKind) -> &OfferCache<S, P> {
        match kind {
            ResourceKind::Ec2 => &self.ec2,
            ResourceKind::Ebs => &self.ebs,
        }
    }

    /// Cache for a resource-type name such as `EC2`.
    pub fn offers_by_name(&self, name: &str) -> Result<&OfferCache<S, P>, PricingError> {
        let kind: ResourceKind = name.parse()?;
        Ok(self.offers(kind))
    }
}
