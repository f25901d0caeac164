pub mod domains;
pub mod error;
pub mod root;
pub mod schema;
pub mod subscriptions;
pub mod types;

pub use root::{MutationRoot, QueryRoot};
pub use schema::{build_schema, AppSchema};
pub use subscriptions::SubscriptionRoot;
