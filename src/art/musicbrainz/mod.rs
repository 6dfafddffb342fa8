//! MusicBrainz release search.
//!
//! Resolves an (artist, album) pair to a MusicBrainz release id, which the
//! Cover Art Archive module then turns into an image link.

mod client;
pub mod dto;

pub use client::MusicBrainzClient;
