//! Validated types shared across the crate.

mod api_url;
mod property_map;

pub use api_url::ApiUrl;
pub use property_map::PropertyMap;
