//! # Composter Core
//!
//! Synchronous, network-free logic for Composter: the component bundle
//! model, the local dependency crawler that turns an entry source file into
//! a virtual file map plus an external dependency map, and the unpacker
//! that writes a bundle back to disk.
//!
//! ```text
//!  entry file ──▶ root ──▶ crawl ──▶ { files, dependencies } ──▶ vault
//!                  │         │
//!               manifest   scan + resolve + vpath
//!
//!  vault ──▶ unpack ──▶ target dir ──▶ check_dependencies(package.json)
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Virtual file map, dependency map, bundle and record types |
//! | [`manifest`] | `package.json` reader |
//! | [`root`] | Project root locator |
//! | [`scan`] | Import specifier scanner |
//! | [`resolve`] | Import classification and local path resolution |
//! | [`vpath`] | Filesystem path to virtual path mapping |
//! | [`crawl`] | Breadth-first dependency crawler |
//! | [`unpack`] | Bundle unpacker and dependency check |

pub mod crawl;
pub mod manifest;
pub mod models;
pub mod resolve;
pub mod root;
pub mod scan;
pub mod unpack;
pub mod vpath;

pub use crawl::{CrawlOptions, CrawlReport, CrawlWarning, Crawler};
pub use models::{Category, Component, ComponentBundle, DependencyMap, VirtualFileMap};
pub use unpack::{check_dependencies, unpack, DependencyCheck, UnpackReport};
