//! # PeerLearn
//!
//! `peerlearn` is the HTTP tier of the PeerLearn student-networking platform.
//! It hosts the application's route surface, enforces the route-protection
//! gate, drives the two-step signup flow against the hosted auth/data
//! platform, and assembles the view contexts (dashboard, profile, study
//! rooms, notes) served to the frontend.
//!
//! ## Route protection
//!
//! Every request passes through the access gate before routing. Requests to
//! `/dashboard`, `/profile`, `/study-rooms`, `/notes`, or `/quizzes` without a
//! valid session are redirected to `/auth/login`; requests to `/auth/login`
//! or `/auth/signup` with an active session are redirected to `/dashboard`.
//! Session resolution is an explicit three-way result, so a platform outage
//! surfaces as `503` on protected routes instead of a silent login redirect.
//!
//! ## Signup
//!
//! Signup collects identity credentials (step one) and the academic profile
//! (step two), then commits in strict order: create the account with the
//! session provider, then insert the profile row keyed by the new account id.
//! The profile insert is never attempted when account creation fails.

pub mod cli;
pub mod peerlearn;
pub mod platform;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
