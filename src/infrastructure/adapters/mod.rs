//! Infrastructure Adapters
//!
//! 外部服务适配器：认证服务、图片存储

pub mod auth;
mod image_store;

pub use auth::{HttpTokenVerifier, HttpTokenVerifierConfig};
pub use image_store::{ImageStoreClient, ImageStoreError};
