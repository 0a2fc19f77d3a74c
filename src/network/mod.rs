pub mod network;
pub mod spec;

pub use network::{Network, NetworkParameters};
pub use spec::NetworkSpec;
