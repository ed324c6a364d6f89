pub mod cache;
pub mod gateway;
pub mod remote;
pub mod source;

pub use cache::CacheDataSource;
pub use gateway::{FactsGateway, FactsProvider, GatewayConfiguration, Source};
pub use remote::RemoteDataSource;
pub use source::DataSource;
