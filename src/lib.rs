// imgpath: signed asset URL builder for image delivery hosts

pub mod config;
pub mod error;
pub mod logging;
pub mod url_builder;

pub use error::{ConfigError, UrlError};
pub use url_builder::{ParamValue, ParameterMap, SignedUrl, UrlSpec};
