//! Animation track decoding
//!
//! Track payloads are read straight from [`Anim::buffer`](crate::formats::Anim)
//! and never go through the object graph codec. The exact flag word of a
//! track selects its layout:
//!
//! | Flags    | Layout                | Frames          |
//! |----------|-----------------------|-----------------|
//! | `0x0508` | constant visibility   | 1 (one bit)     |
//! | `0x0408` | compressed visibility | header count    |
//! | `0x0201` | constant transform    | 1 (ten floats)  |
//! | `0x0401` | compressed transform  | header count    |
//!
//! # Compressed transform layout
//! ```text
//! 0x00: u16 unk, u16 channel flags, u16 unk, u16 unk
//! 0x08: u32 data_start   - frame bits, relative to the track start
//! 0x0C: u32 frame_count
//! 0x10: 9 x { f32 start, f32 end, u64 packed bit count }
//! 0xA0: 10 x f32 defaults (scale xyz, rotation xyzw, position xyz)
//! 0xC8: u32 unused
//! ```
//!
//! Each frame stores the active channels back to back, LSB first, followed
//! by one W sign bit when rotation is active.

mod decoder;
mod flags;
mod types;

#[cfg(test)]
mod tests;

pub use decoder::{
    AnimTrackDecoder, CHANNEL_COUNT, COMPRESSED_HEADER_SIZE, Channel, CompressedHeader, lerp,
};
pub use flags::{ChannelFlags, TrackFlags, TrackLayout};
pub use types::{TrackFrame, Transform};
