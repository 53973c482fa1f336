pub mod agent;
pub mod memory;
pub mod net;

////////////////////////////////////////////////////////////////////////////////

pub use agent::DqnAgent;
pub use memory::{Experience, ReplayMemory};
pub use net::Mlp;
