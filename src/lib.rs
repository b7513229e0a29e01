//! Visor: scripted HTTP smoke tester
//!
//! A library for running a declared sequence of HTTP requests against a
//! single host, validating each response's status and JSON Schema and
//! exporting response bodies to disk.

pub mod config;
pub mod cookies;
pub mod request;
pub mod response;
pub mod runner;
pub mod transport;
pub mod version;
