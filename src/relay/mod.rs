pub mod backend;
pub mod error;
pub mod gateway;
pub mod types;

pub use backend::AgentBackend;
pub use error::RelayError;
pub use gateway::RelayGateway;
pub use types::{RelayRequest, RelayResponse, RelayTarget};
