//! # Composter
//!
//! A component vault CLI. `push` crawls a React component's local import
//! graph into a single bundle and stores it in the vault; `pull` fetches a
//! bundle and recreates the file tree somewhere else.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ entry file   │──▶│   Crawler   │──▶│ ComponentBun │──▶ POST /components
//! │ Button.jsx   │   │ root + BFS  │   │ code + deps  │
//! └──────────────┘   └─────────────┘   └──────────────┘
//!
//! GET /components ──▶ unpack ──▶ files on disk ──▶ dependency check
//! ```
//!
//! The crawler and unpacker live in `composter-core` and never touch the
//! network. This crate adds configuration, the HTTP client, and the CLI
//! commands.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`client`] | Vault HTTP client |
//! | [`push`] | `scan` and `push` commands |
//! | [`pull`] | `pull` command |
//! | [`catalog`] | `categories`, `mkcat`, `list`, `search`, `get` |

pub mod catalog;
pub mod client;
pub mod config;
pub mod pull;
pub mod push;
