pub mod completion;
pub mod registry;
pub mod traits;

// Metal price feeds
pub mod metalprice_api;
pub mod metals_dev;

// Completion backends
pub mod sumopod;
