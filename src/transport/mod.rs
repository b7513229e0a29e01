//! Transport layer for sending HTTP requests.
//!
//! - [`HttpRequest`] / [`HttpResponse`]: plain values crossing the seam
//! - [`HttpClient`]: the seam the runner depends on
//! - [`ReqwestClient`]: production client sharing the run's cookie jar

mod client;
mod error;
mod message;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse};
