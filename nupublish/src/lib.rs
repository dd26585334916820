//! NuPublish - NuGet manifest rendering and publishing.
//!
//! This library renders a package manifest from a per-package template,
//! archives a copy of every published version, and drives the external
//! packaging tool to pack the manifest and publish the resulting package to a
//! local feed, a remote source, or both.
//!
//! # Overview
//!
//! A publish run is a linear pipeline:
//!
//! ```text
//! PublishRequest ──► render template ──► write manifest + history copy
//!                                             │
//!                          ┌──────────────────┘
//!                          ▼
//!                        pack ──► [local feed add] ──► [remote push] ──► cleanup
//! ```
//!
//! - [`manifest`] - template loading and field substitution
//! - [`publisher`] - request validation, path layout, external commands and
//!   the publish pipeline
//! - [`config`] - the `config.ini` file
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod logging;
pub mod manifest;
pub mod publisher;
