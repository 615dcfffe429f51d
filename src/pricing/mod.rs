mod function;
mod heuristic;
mod market;
mod model;
mod seeding;

pub use function::PricingFunction;
pub use heuristic::{HeuristicPricing, PriceBreakdown};
pub use market::{MarketProvider, SimulatedMarket};
pub use model::{MarketSnapshot, PricingOutcome, Product, ProductCategory};
pub use seeding::{FixedSeeding, SeedingPolicy, UniformSeeding};
