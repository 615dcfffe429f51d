mod merchant;
mod queue;
mod task;

pub use merchant::Merchant;
pub use queue::TaskQueue;
pub use task::PricingTask;
