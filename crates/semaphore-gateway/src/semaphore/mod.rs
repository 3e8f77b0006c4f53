pub mod calls;
mod receipt;
mod service;

pub use receipt::{created_group_id, to_transaction_result};
pub use service::{AccountOverview, CreatedGroup, SemaphoreService};
