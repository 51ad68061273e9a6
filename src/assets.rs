//! Card face assets
//!
//! The image files live under `/images/` in the served bundle; the engine only
//! ever sees the `{image_ref, face_key}` pairs listed here.

use crate::sim::CardFace;

/// Reference face set: (face key, image path)
pub const DEFAULT_FACES: [(&str, &str); 6] = [
    ("Helmet", "/images/img1.jpg"),
    ("Potion", "/images/img2.jpg"),
    ("Sword", "/images/img3.jpg"),
    ("Shield", "/images/img4.jpg"),
    ("Ring", "/images/img5.jpg"),
    ("Book", "/images/img6.jpg"),
];

/// Shown by the board when an image fails to load
pub const FALLBACK_IMAGE: &str = "https://placehold.co/100x120/805ad5/ffffff?text=IMG";

/// All reference faces
pub fn default_faces() -> Vec<CardFace> {
    DEFAULT_FACES
        .iter()
        .map(|(face_key, image_ref)| CardFace::new(*face_key, *image_ref))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_faces_are_distinct() {
        let faces = default_faces();
        assert_eq!(faces.len(), 6);
        let keys: HashSet<_> = faces.iter().map(|f| f.face_key.as_str()).collect();
        assert_eq!(keys.len(), faces.len());
    }
}
