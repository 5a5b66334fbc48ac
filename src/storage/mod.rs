pub mod filter;
pub mod month;
pub mod postgres;
pub mod subscription;

pub use filter::TotalFilter;
pub use month::{MonthParseError, YearMonth};
pub use postgres::SubscriptionStore;
pub use subscription::{Subscription, SubscriptionChanges};
