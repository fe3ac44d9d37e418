//! Decora Gateway Library
//!
//! Async boundary interfaces to the external services Decora consumes:
//! the remote design store and the image/reply generation service.
//!
//! # Architecture
//!
//! - **PersistenceGateway**: insert into / read latest from the `designs`
//!   table of the remote store
//! - **GenerationGateway**: prompt in, image reference out; message in,
//!   reply out
//! - Concrete clients: [`RestStore`] (PostgREST-style store),
//!   [`StubGateway`] (fixed delays + canned replies), [`HttpGateway`]
//!   (hosted JSON generation API)
//!
//! # Usage
//!
//! ```ignore
//! let store = RestStore::new(&config);
//! let stored = store.save_design(&record).await?;
//! let latest = store.load_latest().await?;
//! ```

pub mod error;
pub mod generation;
pub mod persistence;

pub use error::{Error, Result};
pub use generation::{GenerationGateway, HttpGateway, StubGateway};
pub use persistence::{PersistenceGateway, RestStore};

/// Table holding persisted designs.
pub const DESIGNS_TABLE: &str = "designs";
