//! Data types shared between the player and its backends.

pub mod stream;

pub use stream::{ReadStatus, SampleEncoding, StreamFormat};
