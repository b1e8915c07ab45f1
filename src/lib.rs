//! `quickfetch` is a thin request-option layer over `reqwest`.
//!
//! A request is described by a flat [`RequestConfig`] map, validated into a
//! [`Handle`] and run by [`execute`], which retries failed transfers:
//! - [`fetch`] reads a URL into memory or into a file
//! - [`submit`] posts form fields, with the same output choices
//! - [`Fetcher`] carries retry and timeout [`FetchOptions`] for both

mod client;
mod config;
mod error;
mod executor;
mod fields;
mod handle;
mod options;
mod transfer;
mod value;

pub use client::{fetch, submit, Fetcher};
pub use config::{OptionKey, RequestConfig};
pub use error::FetchError;
pub use executor::execute;
pub use fields::Fields;
pub use handle::{Handle, ReturnMode};
pub use options::FetchOptions;
pub use transfer::{HttpTransfer, Transfer, TransferOutput};
pub use value::{OptionValue, OutputFile};

pub type Result<T> = std::result::Result<T, FetchError>;
