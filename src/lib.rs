//! Course-completion certificate generator
//!
//! Renders a single landscape certificate page - corner banners, centered
//! title and name, an embedded logo, the date and a signature - with
//! pdf-writer, and serializes it to one PDF file.

pub mod canvas;
pub mod certificate;
pub mod document;
mod encoding;
pub mod error;
pub mod fonts;
pub mod image_utils;
pub mod svg_utils;
pub mod types;
