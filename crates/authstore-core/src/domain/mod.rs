//! Domain entities for OAuth2 authorization artifacts
//!
//! Three entities, mirroring the three storage tables:
//! - `Client` - a registered OAuth2 client application
//! - `AuthorizationGrant` - a single-use authorization code
//! - `AccessToken` - an access/refresh token pair, optionally chained to the
//!   token it replaced via refresh rotation

mod client;
mod grant;
mod token;

pub use client::*;
pub use grant::*;
pub use token::*;
