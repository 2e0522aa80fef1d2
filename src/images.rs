//! Uploaded images: the prize and section slots, plus the upload path
//! shared with the bounty image (which lives in the bounty settings).
//!
//! Images come from a local `<input type="file">` and are kept as data URIs so
//! they can be handed straight to an `<img src>`.

use crate::utils::{data_uri_mime, is_image_mime};
use futures::channel::oneshot;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{FileReader, HtmlInputElement};

/// Which image a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    Prize,
    Section,
}

/// One uploaded image. The data URI is shared, so cloning a slot (or the
/// application state holding it) does not copy the image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSlot {
    pub file_name: String,
    /// Displayable `data:image/...` URI
    #[serde(skip_serializing)]
    pub data_uri: Rc<str>,
}

/// Errors that can occur while loading an image from a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The picker was cancelled or nothing was selected.
    NoFile,
    /// The file was read but is not an `image/*` payload.
    NotAnImage(String),
    /// The browser failed to read the file.
    Read(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::NoFile => write!(f, "No file selected"),
            UploadError::NotAnImage(mime) => write!(f, "Not an image file (type: {})", mime),
            UploadError::Read(reason) => write!(f, "Failed to read file: {}", reason),
        }
    }
}

impl std::error::Error for UploadError {}

impl ImageSlot {
    /// Build a slot from a file read result, rejecting anything that is not
    /// an `image/*` data URI.
    pub fn from_data_uri(
        file_name: impl Into<String>,
        data_uri: impl Into<String>,
    ) -> Result<Self, UploadError> {
        let data_uri = data_uri.into();
        let mime = data_uri_mime(&data_uri)
            .ok_or_else(|| UploadError::NotAnImage("unknown".to_string()))?;
        if !is_image_mime(&mime) {
            return Err(UploadError::NotAnImage(mime));
        }
        Ok(Self {
            file_name: file_name.into(),
            data_uri: Rc::from(data_uri),
        })
    }
}

/// The two view images. A slot is empty until its first upload
/// and a re-upload replaces the previous image outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSlots {
    prize: Option<ImageSlot>,
    section: Option<ImageSlot>,
}

impl ImageSlots {
    pub fn get(&self, slot: SlotId) -> Option<&ImageSlot> {
        match slot {
            SlotId::Prize => self.prize.as_ref(),
            SlotId::Section => self.section.as_ref(),
        }
    }

    /// Store `image` in `slot` and return its data URI.
    pub fn upload(&mut self, slot: SlotId, image: ImageSlot) -> &str {
        info!("🖼 {:?} image set from {}", slot, image.file_name);
        let target = match slot {
            SlotId::Prize => &mut self.prize,
            SlotId::Section => &mut self.section,
        };
        &target.insert(image).data_uri
    }
}

fn js_error(err: JsValue) -> UploadError {
    UploadError::Read(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Read the first file selected in `input` and return it as an image slot.
///
/// The `FileReader` completion is awaited through a oneshot channel; both
/// event closures are dropped once the read settles.
pub async fn read_selected_image(input: &HtmlInputElement) -> Result<ImageSlot, UploadError> {
    let file = input
        .files()
        .and_then(|files| files.get(0))
        .ok_or(UploadError::NoFile)?;
    let file_name = file.name();
    debug!("📂 Reading {} ({} bytes)", file_name, file.size());

    let reader = FileReader::new().map_err(js_error)?;
    let (tx, rx) = oneshot::channel::<Result<(), UploadError>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let tx = tx.clone();
        Closure::once(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        })
    };
    let onerror = {
        let tx = tx.clone();
        Closure::once(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(UploadError::Read("reader error".to_string())));
            }
        })
    };
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    reader.read_as_data_url(&file).map_err(js_error)?;
    let outcome = rx
        .await
        .unwrap_or_else(|_| Err(UploadError::Read("reader dropped".to_string())));

    reader.set_onload(None);
    reader.set_onerror(None);
    outcome?;

    let data_uri = reader
        .result()
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| UploadError::Read("result is not a string".to_string()))?;
    ImageSlot::from_data_uri(file_name, data_uri)
}
