//! Local image files as embeddable `data:` URLs

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("{path} is not an image ({mime})")]
    NotAnImage { path: PathBuf, mime: String },
    #[error("failed reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read an image file into `data:<mime>;base64,<bytes>`.
///
/// The MIME type is guessed from the extension; anything outside `image/*`
/// is refused.
pub fn data_url_from_file(path: &Path) -> Result<String, ImageError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(ImageError::NotAnImage {
            path: path.to_path_buf(),
            mime: mime.to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}
