use std::path::Path;

use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::model::number_text;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Start station is required")]
    MissingStart,
    #[error("End station is required")]
    MissingEnd,
    #[error("Intermediate station {0} is required")]
    MissingIntermediate(usize),
    #[error("Price must be zero or more")]
    NegativePrice,
    #[error("Price must be a multiple of 0.5")]
    PriceStep,
}

/// A picked image attachment. Reading the file doubles as the preview,
/// only the bytes are ever uploaded.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            mime: mime_for(path),
            bytes,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// State behind the route contribution form.
///
/// Intermediate stations sit behind a toggle: the entered names survive
/// toggling off and back on, and are only submitted while the toggle is
/// on. A fresh form starts with one empty intermediate slot.
#[derive(Debug, Clone)]
pub struct Contribution {
    pub start_station: String,
    pub end_station: String,
    pub start_image: Option<ImageFile>,
    pub end_image: Option<ImageFile>,
    pub price: f64,
    pub notes: String,
    has_intermediates: bool,
    intermediates: Vec<String>,
}

impl Default for Contribution {
    fn default() -> Self {
        Self {
            start_station: String::new(),
            end_station: String::new(),
            start_image: None,
            end_image: None,
            price: 0.0,
            notes: String::new(),
            has_intermediates: false,
            intermediates: vec![String::new()],
        }
    }
}

impl Contribution {
    pub fn new() -> Self {
        Default::default()
    }

    /// Shows or hides the intermediate station inputs.
    pub fn set_has_intermediates(&mut self, on: bool) {
        self.has_intermediates = on;
    }

    pub fn has_intermediates(&self) -> bool {
        self.has_intermediates
    }

    /// The intermediate station slots, whether or not they are shown.
    pub fn intermediates(&self) -> &[String] {
        &self.intermediates
    }

    /// Adds one empty intermediate slot.
    pub fn add_intermediate(&mut self) {
        self.intermediates.push(String::new());
    }

    pub fn remove_intermediate(&mut self, index: usize) {
        if index < self.intermediates.len() {
            self.intermediates.remove(index);
        }
    }

    pub fn set_intermediate(&mut self, index: usize, name: impl Into<String>) {
        if let Some(slot) = self.intermediates.get_mut(index) {
            *slot = name.into();
        }
    }

    /// The form's native constraints, nothing more: required start and
    /// end names, required intermediates while shown, price at least
    /// zero in steps of 0.5.
    pub fn validate(&self) -> Result<(), Error> {
        if self.start_station.is_empty() {
            return Err(Error::MissingStart);
        }
        if self.end_station.is_empty() {
            return Err(Error::MissingEnd);
        }
        if self.has_intermediates {
            for (index, name) in self.intermediates.iter().enumerate() {
                if name.is_empty() {
                    return Err(Error::MissingIntermediate(index + 1));
                }
            }
        }
        if self.price < 0.0 {
            return Err(Error::NegativePrice);
        }
        if (self.price * 2.0).fract() != 0.0 {
            return Err(Error::PriceStep);
        }
        Ok(())
    }

    /// Builds the multipart payload with the backend's field names.
    /// Intermediates go out as `intermediateStation1..N`, and only
    /// while the toggle is on. Missing images are omitted entirely.
    pub fn to_form(&self) -> reqwest::Result<Form> {
        let mut form = Form::new().text("startStation", self.start_station.clone());
        if let Some(image) = &self.start_image {
            form = form.part("startStationImage", image_part(image)?);
        }
        form = form.text("endStation", self.end_station.clone());
        if let Some(image) = &self.end_image {
            form = form.part("endStationImage", image_part(image)?);
        }
        if self.has_intermediates {
            for (index, name) in self.intermediates.iter().enumerate() {
                form = form.text(format!("intermediateStation{}", index + 1), name.clone());
            }
        }
        Ok(form
            .text("price", number_text(self.price))
            .text("notes", self.notes.clone()))
    }

    /// Restores the pristine form: toggle off, one empty intermediate
    /// slot, no attachments. Applied only after a successful submit.
    pub fn reset(&mut self) {
        *self = Default::default();
    }
}

fn image_part(image: &ImageFile) -> reqwest::Result<Part> {
    Part::bytes(image.bytes.clone())
        .file_name(image.name.clone())
        .mime_str(image.mime)
}
