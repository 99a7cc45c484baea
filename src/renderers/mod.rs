// loan-document-service/src/renderers/mod.rs

mod browser;
mod pdf;

pub use pdf::{ChromePdfEngine, PageProfile, PdfEngine};
