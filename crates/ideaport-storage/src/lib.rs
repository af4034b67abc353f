//! Object-storage collaborator for uploaded idea documents.
//!
//! The [`Storage`] trait abstracts the S3-compatible backend so the upload
//! pipeline, scan handler, and retention sweep can be exercised against an
//! in-memory implementation in tests.

pub mod s3;
pub mod traits;

pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
