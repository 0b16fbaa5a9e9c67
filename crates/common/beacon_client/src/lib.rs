pub mod beacon_api_client;
pub mod config;
pub mod failover;
pub mod http_client;
pub mod node;
pub mod query;

pub use beacon_api_client::BeaconApiClient;
pub use failover::{ClientHealth, FailoverManager, FailoverStatus};
pub use node::BeaconNode;
pub use query::{CONCURRENCY, MAX_BATCH, QueryConfig, ValidatorQueryEngine};
