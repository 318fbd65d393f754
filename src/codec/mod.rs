//! Image ingestion and encoding.
//!
//! This module turns a user-selected file into an [`ImagePayload`]: it
//! validates the declared media type and size, base64-encodes the content as
//! a data URL, and provides the normalization used before the payload is sent
//! to the edit model.
//!
//! # Submodules
//!
//! - `models`: Payload types and validation constraints.
//! - `encode`: Encoding, data URL prefix handling, and download helpers.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod encode;
pub mod models;

pub use encode::{
    decode_payload, detect_mime_type, download_data_url, download_file_name, encode_image,
    strip_data_url_prefix, to_data_url,
};
pub use models::{
    ImageFormat, ImagePayload, RawImageFile, CANONICAL_OUTPUT_TYPE, MAX_UPLOAD_BYTES,
    UNKNOWN_MEDIA_TYPE,
};
