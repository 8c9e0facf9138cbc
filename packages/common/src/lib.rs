//! # Scrawl Common
//!
//! Host-facing seams shared by every scrawl crate:
//!
//! - [`DocumentStore`]: the vault of files a note lives in (enumerate, read,
//!   create, overwrite), keyed by `/`-separated path strings
//! - [`DomElement`]: a minimal retained element tree standing in for the
//!   host's DOM

pub mod dom;
pub mod error;
pub mod result;
pub mod store;

pub use dom::*;
pub use error::*;
pub use result::*;
pub use store::*;
