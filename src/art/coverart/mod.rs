//! Cover Art Archive lookup.
//!
//! Turns a MusicBrainz release id into a hosted image link.

mod client;
pub mod dto;

pub use client::CoverArtClient;
