//! # notify-admin
//!
//! `notify-admin` is the administrative web front-end for the notification
//! platform. It renders the pages used to manage services, templates and
//! team members, and drives the two stateful flows the platform needs from
//! a browser:
//!
//! ## The SMS tour
//!
//! A multi-step wizard that walks a user through filling in a template's
//! placeholders one at a time. Progress lives in server-side session state
//! and the wizard always recomputes the remaining placeholders from the
//! template body, so a stale or hand-edited step URL recovers to a
//! consistent position instead of failing.
//!
//! ## Security key ceremonies (`WebAuthn`)
//!
//! Registration and authentication of hardware security keys as a second
//! factor. Challenge building and cryptographic verification are an
//! injected [`webauthn::CeremonyEngine`] capability; the handlers own only
//! the session choreography: ceremony state is stored when a ceremony
//! begins and removed on every terminal outcome so a challenge can never
//! be replayed.
//!
//! All user, service, template and credential records live behind the
//! platform API ([`platform::PlatformApi`]); this process keeps no
//! database of its own.

pub mod admin;
pub mod cli;
pub mod platform;
pub mod session;
pub mod tour;
pub mod webauthn;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
