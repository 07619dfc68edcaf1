//! End-to-end tests for the jpegthumb crates.
//!
//! Every test synthesizes its JPEGs with `jpeg-encoder` and drives them
//! through the public [`jpegthumb::ImageHandle`] surface.
