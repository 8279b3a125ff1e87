//! Secret handling for adapter credentials.

pub mod credentials;

pub use credentials::SecretString;
