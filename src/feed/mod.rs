//! # Feed Module
//!
//! This module handles the request side of the spreadsheet feeds including:
//! - Feed URL composition and authenticated dispatch
//! - HTTP status / content type interpretation
//! - Link relation lookup for entries
//! - Raw entry extraction and patching for edit payloads

pub mod client;
pub mod entries;
pub mod links;
pub mod transport;


pub use client::{FeedClient, FeedPayload, FeedResponse, FeedTarget};
pub use links::{extract_links, LinkIndex};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const GS_NS: &str = "http://schemas.google.com/spreadsheets/2006";
pub const GSX_NS: &str = "http://schemas.google.com/spreadsheets/2006/extended";
