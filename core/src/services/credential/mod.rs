//! Credential gateway: signup and login

mod config;
mod service;


pub use config::CredentialGatewayConfig;
pub use service::CredentialGateway;
