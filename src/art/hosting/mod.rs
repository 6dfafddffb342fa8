//! Image hosting backends.
//!
//! Both backends take raw image bytes and return a public link via the
//! [`ArtHost`](crate::art::traits::ArtHost) trait: a multipart POST with a
//! short random filename, parsed into a small JSON envelope.

pub mod dto;
mod imgur;
mod selfhost;

pub use imgur::ImgurHost;
pub use selfhost::SelfHost;

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of generated upload filenames (before the `.jpg` extension).
pub const UPLOAD_FILE_ID_LEN: usize = 12;

/// Generate a random alphanumeric file id of exactly `len` characters.
///
/// The length is a required argument; callers pass [`UPLOAD_FILE_ID_LEN`].
pub fn random_file_id(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
