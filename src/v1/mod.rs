/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod album;
pub mod api;
pub mod client;
pub mod errors;
pub mod filters;
pub mod media_item;
pub mod page;
pub mod paginate;
mod parsers;
pub mod properties;
pub mod request;

pub use album::*;
pub use api::*;
pub use client::*;
pub use errors::*;
pub use filters::*;
pub use media_item::*;
pub use page::{Page, PageItem, PageResponse, fetch_page};
pub use paginate::{PageStream, paginate};
pub use properties::*;
pub use request::PageRequest;
