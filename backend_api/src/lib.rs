pub mod config;
pub mod rest;
pub mod service;

pub use config::{load_backend_config, BackendConfig};
pub use rest::RestDataService;
pub use service::{DataService, DataServiceError, ListQuery};
