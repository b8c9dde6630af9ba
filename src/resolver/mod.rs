//! Distance lookup for routes whose mileage is missing from the log.

pub mod cache;
pub mod great_circle;
pub mod webflyer;

pub use cache::CachedResolver;
pub use great_circle::GreatCircleResolver;
pub use webflyer::WebFlyerResolver;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::Result;
use crate::flights::Airport;

/// Anything that can produce a mileage for a pair of airports
pub trait DistanceResolver {
    /// Miles between the two airports
    fn distance(&self, origin: &Airport, destination: &Airport) -> Result<u32>;

    fn name(&self) -> &str;
}

impl<R: DistanceResolver + ?Sized> DistanceResolver for Box<R> {
    fn distance(&self, origin: &Airport, destination: &Airport) -> Result<u32> {
        (**self).distance(origin, destination)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Which resolver fills in missing mileage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverKind {
    /// Scrape the WebFlyer mileage calculator
    #[default]
    Webflyer,
    /// Compute the great-circle distance from airport coordinates
    GreatCircle,
}
