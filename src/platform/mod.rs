//! Remote notification platform API.
//!
//! Every record this front-end shows or mutates (users, services,
//! templates, security key credentials, invites) is owned by the platform
//! API. The client is injected as a trait object so handlers can be
//! exercised without the network.

mod client;
mod models;

pub use client::{HttpPlatformApi, PlatformApi, PlatformError};
pub use models::{
    AuthType, Invite, NewCredential, Service, Template, TemplateType, User, WebAuthnCredential,
};
