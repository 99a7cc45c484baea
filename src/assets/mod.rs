// loan-document-service/src/assets/mod.rs

mod drive;
mod inline;

pub use drive::direct_download_url;
pub use inline::ImageFetcher;
