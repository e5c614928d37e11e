//! Authentication and authorization
//!
//! JWT validation and role gating:
//! - [`JwtService`] - token service
//! - [`CurrentUser`] - current user context
//! - [`require_auth`] - authentication middleware
//! - [`require_admin`] - admin role middleware
//!
//! Token issuance (login, registration) lives outside this server.

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
