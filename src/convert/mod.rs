//! Remote audio conversion
//!
//! Submits a recorded artifact to the conversion service as a multipart
//! upload and decodes the base64 audio payload in the response into a new
//! cached artifact.

mod client;

pub use client::{ConversionClient, Converter};
