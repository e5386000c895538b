//! Proton Pass installer library.
//!
//! This crate downloads a published Proton Pass desktop release, verifies
//! its SHA-512 checksum, and installs it through the host package manager.
//! It backs the `proton-pass-installer` CLI binary and can be consumed
//! programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`digest`] - Validated SHA-512 digest newtype
//! - [`download`] - Manifest and package retrieval over HTTP
//! - [`error`] - Semantic error types for the pipeline
//! - [`family`] - Host package-family and distribution probing
//! - [`i18n`] - Fluent-based message localisation
//! - [`install`] - Privileged installation via dpkg or dnf
//! - [`manifest`] - Release manifest parsing and artefact selection
//! - [`output`] - Localised status output with quiet-mode gating
//! - [`pipeline`] - Download-verify-install orchestration
//! - [`provision`] - Locale asset provisioning
//! - [`session`] - Scoped temporary workspace with guaranteed cleanup
//! - [`settings`] - Run-environment detection, paths, and preferences
//! - [`verify`] - Streaming checksum computation

pub mod cli;
pub mod digest;
pub mod download;
pub mod error;
pub mod family;
pub mod i18n;
pub mod install;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod provision;
pub mod session;
pub mod settings;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_utils;
