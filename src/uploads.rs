use std::{fs, path::Path};

use actix_multipart::form::tempfile::TempFile;
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Persists an uploaded image under `uploads_dir` and returns the stored
/// filename. Files without an allow-listed extension, and empty uploads, are
/// dropped with `None`.
pub fn save_image(file: &TempFile, prefix: &str, uploads_dir: &Path) -> Option<String> {
    let original = file.file_name.as_deref().unwrap_or_default();
    if file.size == 0 || !allowed_file(original) {
        return None;
    }

    let (_, ext) = original.rsplit_once('.')?;
    let stored = format!("{prefix}_{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase());
    let dest = uploads_dir.join(&stored);

    match fs::copy(file.file.path(), &dest) {
        Ok(_) => Some(stored),
        Err(err) => {
            log::warn!("Failed to store uploaded image {original}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list() {
        assert!(allowed_file("foto.png"));
        assert!(allowed_file("foto.JPG"));
        assert!(allowed_file("a.b.jpeg"));
        assert!(!allowed_file("foto.webp"));
        assert!(!allowed_file("script.php"));
        assert!(!allowed_file("no_extension"));
    }
}
