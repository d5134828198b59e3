//! Concurrent favicon render cache for status pings.
//!
//! Favicons arrive as raw bytes from a pluggable loader (file, URL or
//! literal data, chosen by the decision core) and are rendered once into the
//! base64 data URI the status protocol embeds. Rendering and loading are
//! expensive relative to a ping, so results are cached per
//! [`FaviconSource`] with single-flight semantics: concurrent misses on the
//! same key collapse into one load, misses on different keys proceed
//! independently.
//!
//! The whole cache can be atomically rebuilt under a new [`EvictionPolicy`]
//! or torn down entirely when the configuration disables caching; in-flight
//! reads against the old generation complete normally.

mod cache;
mod source;

pub use cache::{EvictionPolicy, FaviconCache};
pub use source::{Favicon, FaviconError, FaviconLoader, FaviconSource, SourceKind};
