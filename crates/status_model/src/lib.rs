//! Status ping data model for the customization bridge.
//!
//! This crate defines the host-facing outbound status structure, the sparse
//! [`Response`] overlay computed by the external decision core, the lazy
//! [`ResponseFetcher`] capability handed to that core, and the composer that
//! merges a response onto an outbound ping without clobbering unrelated data.

mod compose;
mod fetcher;
mod ping;
mod response;

pub use fetcher::ResponseFetcher;
pub use ping::{PlayerInfo, Players, ServerVersion, StatusPing, PLACEHOLDER_PLAYER_ID};
pub use response::Response;
