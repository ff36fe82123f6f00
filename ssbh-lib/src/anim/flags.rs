//! Track flag words and compressed channel selection

use serde::Serialize;

bitflags::bitflags! {
    /// Track flag word from [`AnimTrack::flags`](crate::formats::AnimTrack)
    ///
    /// The low byte is the value type and the high byte the compression.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrackFlags: u32 {
        const TRANSFORM = 0x0001;
        const UV_TRANSFORM = 0x0002;
        const FLOAT = 0x0003;
        const PATTERN_INDEX = 0x0005;
        const VISIBILITY = 0x0008;
        const VECTOR4 = 0x0009;

        const DIRECT = 0x0100;
        const CONST_TRANSFORM = 0x0200;
        const COMPRESSED = 0x0400;
        const CONSTANT = 0x0500;
    }
}

impl Serialize for TrackFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

bitflags::bitflags! {
    /// Channel selection word from a compressed track header
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChannelFlags: u16 {
        /// Scale is stored; per axis unless `UNIFORM_SCALE` is also set
        const SCALE = 0x1;
        /// With `SCALE`: one channel broadcast to all three axes
        const UNIFORM_SCALE = 0x2;
        const ROTATION = 0x4;
        const POSITION = 0x8;
    }
}

impl ChannelFlags {
    /// `flags & 0x3 == 0x3`
    pub fn is_uniform_scale(self) -> bool {
        self.contains(Self::SCALE | Self::UNIFORM_SCALE)
    }

    /// `flags & 0x3 == 0x1`
    pub fn is_per_axis_scale(self) -> bool {
        self.contains(Self::SCALE) && !self.contains(Self::UNIFORM_SCALE)
    }

    pub fn has_rotation(self) -> bool {
        self.contains(Self::ROTATION)
    }

    pub fn has_position(self) -> bool {
        self.contains(Self::POSITION)
    }

    /// Whether channel `index` (0..9: scale xyz, rotation xyz, position xyz)
    /// carries per-frame values
    pub fn is_channel_active(self, index: usize) -> bool {
        match index {
            0 => self.is_uniform_scale() || self.is_per_axis_scale(),
            1 | 2 => self.is_per_axis_scale(),
            3..=5 => self.has_rotation(),
            6..=8 => self.has_position(),
            _ => false,
        }
    }
}

/// Encoding of a track's bytes, selected by the exact flag word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrackLayout {
    /// One visibility bit, no header
    ConstantVisibility,
    /// Compressed header followed by one bit per frame
    CompressedVisibility,
    /// Ten floats and a trailing word, one frame
    ConstantTransform,
    /// Compressed header, channel ranges, defaults, then bit-packed frames
    CompressedTransform,
    /// No defined decoding; produces no frames
    Unsupported(u32),
}

impl TrackLayout {
    pub const CONSTANT_VISIBILITY: TrackFlags = TrackFlags::VISIBILITY.union(TrackFlags::CONSTANT);
    pub const COMPRESSED_VISIBILITY: TrackFlags =
        TrackFlags::VISIBILITY.union(TrackFlags::COMPRESSED);
    pub const CONSTANT_TRANSFORM: TrackFlags =
        TrackFlags::TRANSFORM.union(TrackFlags::CONST_TRANSFORM);
    pub const COMPRESSED_TRANSFORM: TrackFlags =
        TrackFlags::TRANSFORM.union(TrackFlags::COMPRESSED);

    pub fn from_flags(flags: u32) -> Self {
        match TrackFlags::from_bits_retain(flags) {
            f if f == Self::CONSTANT_VISIBILITY => Self::ConstantVisibility,
            f if f == Self::COMPRESSED_VISIBILITY => Self::CompressedVisibility,
            f if f == Self::CONSTANT_TRANSFORM => Self::ConstantTransform,
            f if f == Self::COMPRESSED_TRANSFORM => Self::CompressedTransform,
            _ => Self::Unsupported(flags),
        }
    }

    /// The flag word this layout is selected by
    pub fn flags(self) -> u32 {
        match self {
            Self::ConstantVisibility => Self::CONSTANT_VISIBILITY.bits(),
            Self::CompressedVisibility => Self::COMPRESSED_VISIBILITY.bits(),
            Self::ConstantTransform => Self::CONSTANT_TRANSFORM.bits(),
            Self::CompressedTransform => Self::COMPRESSED_TRANSFORM.bits(),
            Self::Unsupported(flags) => flags,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}
