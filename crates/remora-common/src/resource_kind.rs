//! Registry of priceable AWS resource types
//!
//! Each resource type maps to a fixed [`ResourceKey`] describing how the
//! pricing catalogue identifies it. The registry is closed: asking for a name
//! that is not listed here is an error, never a silent default.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies a class of priced resource in the pricing catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceKey {
    /// Catalogue service code (e.g. `AmazonEC2`)
    pub service_code: &'static str,
    /// Catalogue product family (e.g. `Compute Instance`)
    pub product_family: &'static str,
    /// Attribute that distinguishes offers of this family (e.g. `instanceType`)
    pub attribute_key: &'static str,
}

/// Requested resource-type name is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not a defined ResourceKey")]
pub struct UndefinedResourceKey(pub String);

/// Types of AWS resources that can be priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceKind {
    /// EC2 compute instances, keyed by instance type
    Ec2,
    /// EBS volumes, keyed by volume type
    Ebs,
}

impl ResourceKind {
    /// Every registered resource kind.
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Ec2, ResourceKind::Ebs];

    /// Registry name used on the command line and in errors.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Ec2 => "EC2",
            ResourceKind::Ebs => "EBS",
        }
    }

    /// Catalogue key for this resource kind.
    pub fn key(self) -> ResourceKey {
        match self {
            ResourceKind::Ec2 => ResourceKey {
                service_code: "AmazonEC2",
                product_family: "Compute Instance",
                attribute_key: "instanceType",
            },
            ResourceKind::Ebs => ResourceKey {
                service_code: "AmazonEC2",
                product_family: "Storage",
                attribute_key: "volumeType",
            },
        }
    }

    /// Look up a resource kind by registry name.
    pub fn lookup(name: &str) -> Result<Self, UndefinedResourceKey> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UndefinedResourceKey(name.to_string()))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = UndefinedResourceKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}
