//! Prodbench Core Library
//!
//! Synthetic `Products` loader and index benchmark protocol, driven against
//! an external relational store.

pub mod bench;
pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod product;
pub mod report;
pub mod store;
pub mod timing;
pub mod vocabulary;
