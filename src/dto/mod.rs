//! Presentation shapes handed to templates and JSON responses.

pub mod cart;
pub mod catalog;

/// Joins an image reference onto the public media URL prefix.
pub fn media_path(media_url: &str, image: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        image.trim_start_matches('/')
    )
}
