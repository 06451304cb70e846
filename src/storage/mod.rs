//! Storage Listing Module
//!
//! Delimited, single-page listings of a bucket prefix.

mod listing;
mod s3;

pub use listing::{ListingEntry, ListingResult, ObjectLister, DELIMITER};
pub use s3::S3Lister;
