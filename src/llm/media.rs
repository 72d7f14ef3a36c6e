#[derive(Debug, Clone)]
pub struct ImageFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageFile {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    if data.len() > 12 {
        let ftyp = &data[4..12];
        if ftyp.starts_with(b"ftyp") {
            let brand = &ftyp[4..8];
            if brand == b"heic" || brand == b"heif" || brand == b"hevc" {
                return Some("image/heic".to_string());
            }
        }
    }

    infer::get(data).map(|kind| kind.mime_type().to_string())
}

fn normalize_image_mime(mime_type: &str) -> String {
    let lowered = mime_type.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        _ => lowered,
    }
}

fn is_supported_image_mime(mime_type: &str) -> bool {
    matches!(
        mime_type,
        "image/png" | "image/jpeg" | "image/webp" | "image/heic" | "image/heif"
    )
}

pub fn gemini_image_mime(file: &ImageFile) -> String {
    let mut candidates = Vec::new();
    if !file.mime_type.trim().is_empty() {
        candidates.push(file.mime_type.clone());
    }
    if let Some(detected) = detect_mime_type(&file.bytes) {
        candidates.push(detected);
    }

    for candidate in candidates {
        let normalized = normalize_image_mime(&candidate);
        if is_supported_image_mime(&normalized) {
            return normalized;
        }
    }

    "image/jpeg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn normalizes_declared_jpg_alias() {
        let file = ImageFile::new(vec![0u8; 4], "image/jpg");
        assert_eq!(gemini_image_mime(&file), "image/jpeg");
    }

    #[test]
    fn sniffs_mime_when_declared_type_is_missing() {
        let file = ImageFile::new(PNG_MAGIC.to_vec(), "");
        assert_eq!(gemini_image_mime(&file), "image/png");
    }

    #[test]
    fn falls_back_to_jpeg_for_unknown_content() {
        let file = ImageFile::new(vec![1, 2, 3], "application/octet-stream");
        assert_eq!(gemini_image_mime(&file), "image/jpeg");
    }

    #[test]
    fn prefers_declared_type_over_sniffed_bytes() {
        let file = ImageFile::new(PNG_MAGIC.to_vec(), "image/webp");
        assert_eq!(gemini_image_mime(&file), "image/webp");
    }
}
