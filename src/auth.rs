//! Service-account credentials, assertion signing, and bearer token management.

pub mod assertion;
pub mod credentials;
pub mod key;
pub mod scope;
pub mod secret;
pub mod token;

pub use assertion::*;
pub use credentials::*;
pub use key::*;
pub use scope::*;
pub use secret::*;
pub use token::*;
