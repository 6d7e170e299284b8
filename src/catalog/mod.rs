//! Catalog helpers.
//!
//! # Data Flow
//! ```text
//! GET /api/catalogs/estados-propiedad?page=2&perPage=10
//!     → kind.rs (slug → owning service + resource)
//!     → cache.rs (fresh page?)
//!     → service.rs (GET {inmobiliaria}/estados-propiedad?page=2&limit=10)
//!     → page.rs (normalize to { data, meta })
//!     → on failure: stale page, else empty page
//! ```
//!
//! # Design Decisions
//! - Reads degrade to "no data", writes surface errors
//! - Cache keyed by (catalog, page, perPage, credentials); writes drop a
//!   catalog's pages for every caller
//! - Entries are opaque JSON; the owning service defines their fields

pub mod cache;
pub mod kind;
pub mod page;
pub mod service;

pub use cache::{CacheSummary, CatalogCache, Credentials};
pub use kind::CatalogKind;
pub use page::{PageMeta, Paginated};
pub use service::CatalogService;
