//! Photo file selection

use crate::core::validation::ValidationError;

/// A checked image, ready for the upload endpoint
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Read the file chosen in a file input.
///
/// `None` when nothing was selected or the browser could not read it.
#[cfg(feature = "hydrate")]
pub async fn read_photo(ev: leptos::ev::Event) -> Option<Result<PhotoFile, ValidationError>> {
    use wasm_bindgen::JsCast;

    use crate::core::validation::validate_photo_file;

    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    let file = input.files()?.get(0)?;
    let content_type = file.type_();
    if let Err(err) = validate_photo_file(&content_type, file.size() as u64) {
        return Some(Err(err));
    }

    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .ok()?;
    Some(Ok(PhotoFile {
        name: file.name(),
        content_type,
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    }))
}

#[cfg(not(feature = "hydrate"))]
pub async fn read_photo(_ev: leptos::ev::Event) -> Option<Result<PhotoFile, ValidationError>> {
    None
}
