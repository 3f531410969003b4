// Adapters layer: concrete implementations of the domain ports.

pub mod storage;
pub mod synthetic;

pub use storage::LocalStorage;
pub use synthetic::SyntheticSource;
