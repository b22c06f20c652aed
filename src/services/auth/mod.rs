pub mod credential;
pub mod decision;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod identity;
pub mod password;
pub mod provider;
pub mod resolver;
pub mod signed_token;
pub mod token_issuer;
pub mod verifier;

pub use decision::AccessPolicy;
pub use error::AuthError;
pub use factory::{build_auth_gateway, build_token_issuer};
pub use gateway::AuthGateway;
pub use identity::{Identity, Role};
