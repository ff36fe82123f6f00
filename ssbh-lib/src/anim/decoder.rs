//! Track payload decoding

use glam::{Quat, Vec3};
use tracing::{debug, trace};

use super::flags::{ChannelFlags, TrackLayout};
use super::types::{TrackFrame, Transform};
use crate::Result;
use crate::cursor::SsbhReader;
use crate::formats::AnimTrack;

/// Number of compressed transform channels: scale xyz, rotation xyz, position xyz
pub const CHANNEL_COUNT: usize = 9;

/// Bytes before the channel descriptors of a compressed track
pub const COMPRESSED_HEADER_SIZE: usize = 16;

/// Linear remap of `t` from `[v0, v1]` onto `[av, bv]`
///
/// The endpoints map exactly: `t == v0` gives `av` and `t == v1` gives `bv`.
/// An empty source range gives `av`.
pub fn lerp(av: f32, bv: f32, v0: f32, v1: f32, t: f32) -> f32 {
    if v0 == v1 || t == v0 {
        return av;
    }
    if t == v1 {
        return bv;
    }
    let mu = (t - v0) / (v1 - v0);
    av * (1.0 - mu) + bv * mu
}

/// Leading header of compressed visibility and transform tracks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressedHeader {
    pub unk_4: u16,
    pub flags: ChannelFlags,
    pub unk_6: u16,
    pub unk_8: u16,
    /// Start of the frame bits, relative to the track's data offset
    pub data_start: u32,
    pub frame_count: u32,
}

impl CompressedHeader {
    pub fn read(reader: &mut SsbhReader<'_>) -> Result<Self> {
        Ok(Self {
            unk_4: reader.read_u16()?,
            flags: ChannelFlags::from_bits_retain(reader.read_u16()?),
            unk_6: reader.read_u16()?,
            unk_8: reader.read_u16()?,
            data_start: reader.read_u32()?,
            frame_count: reader.read_u32()?,
        })
    }
}

/// Quantization range and bit width of one compressed channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Channel {
    pub start: f32,
    pub end: f32,
    /// Bits per frame; zero for channels the header leaves inactive
    pub bits: u32,
}

impl Channel {
    /// Low 3 bits of `packed` are a bit remainder, the rest a byte count
    fn read(reader: &mut SsbhReader<'_>, active: bool) -> Result<Self> {
        let start = reader.read_f32()?;
        let end = reader.read_f32()?;
        let packed = reader.read_u64()?;
        let bits = if active {
            let total = (packed >> 3).saturating_mul(8).saturating_add(packed & 0x7);
            u32::try_from(total).unwrap_or(u32::MAX)
        } else {
            0
        };
        Ok(Self { start, end, bits })
    }

    /// Map a stored integer from `[0, 2^bits - 1]` onto `[start, end]`
    pub fn value(&self, raw: u32) -> f32 {
        let max = if self.bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        } as f32;
        let value = lerp(self.start, self.end, 0.0, 1.0, raw as f32 / max);
        if value.is_nan() { 0.0 } else { value }
    }
}

/// Decodes track payloads from an animation's shared buffer
///
/// Holds only a borrowed buffer, so one decoder can be shared across
/// threads and every call starts from scratch.
#[derive(Debug, Clone, Copy)]
pub struct AnimTrackDecoder<'a> {
    buffer: &'a [u8],
}

impl<'a> AnimTrackDecoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn decode_track(&self, track: &AnimTrack) -> Result<Vec<TrackFrame>> {
        trace!("Decoding track {} (flags 0x{:04X})", track.name, track.flags);
        self.decode(track.flags, track.data_offset as u64)
    }

    /// Decode the track whose bytes start at `data_offset`
    ///
    /// Flag words without a defined layout produce no frames.
    pub fn decode(&self, flags: u32, data_offset: u64) -> Result<Vec<TrackFrame>> {
        let mut reader = SsbhReader::new(self.buffer);
        reader.seek(data_offset)?;

        match TrackLayout::from_flags(flags) {
            TrackLayout::ConstantVisibility => {
                Ok(vec![TrackFrame::Visibility(reader.read_bits(1)? == 1)])
            }
            TrackLayout::CompressedVisibility => {
                self.decode_compressed_visibility(&mut reader, data_offset)
            }
            TrackLayout::ConstantTransform => {
                let transform = read_transform(&mut reader)?;
                // Trailing word is unused
                reader.read_u32()?;
                Ok(vec![TrackFrame::Transform(transform)])
            }
            TrackLayout::CompressedTransform => {
                self.decode_compressed_transform(&mut reader, data_offset)
            }
            TrackLayout::Unsupported(flags) => {
                debug!("No decoding for track flags 0x{:04X}; skipping", flags);
                Ok(Vec::new())
            }
        }
    }

    fn decode_compressed_visibility(
        &self,
        reader: &mut SsbhReader<'_>,
        data_offset: u64,
    ) -> Result<Vec<TrackFrame>> {
        let header = CompressedHeader::read(reader)?;
        reader.seek(data_offset + header.data_start as u64)?;

        let mut frames = Vec::with_capacity(self.frame_capacity(header.frame_count));
        for _ in 0..header.frame_count {
            frames.push(TrackFrame::Visibility(reader.read_bits(1)? == 1));
        }
        Ok(frames)
    }

    fn decode_compressed_transform(
        &self,
        reader: &mut SsbhReader<'_>,
        data_offset: u64,
    ) -> Result<Vec<TrackFrame>> {
        let header = CompressedHeader::read(reader)?;
        let flags = header.flags;

        let mut channels = [Channel::default(); CHANNEL_COUNT];
        for (index, channel) in channels.iter_mut().enumerate() {
            *channel = Channel::read(reader, flags.is_channel_active(index))?;
        }
        let defaults = read_transform(reader)?;
        reader.read_u32()?;

        reader.seek(data_offset + header.data_start as u64)?;
        let mut frames = Vec::with_capacity(self.frame_capacity(header.frame_count));
        for _ in 0..header.frame_count {
            let mut values = [0.0f32; CHANNEL_COUNT];
            for (value, channel) in values.iter_mut().zip(&channels) {
                *value = channel.value(reader.read_bits(channel.bits)?);
            }

            let scale = if flags.is_uniform_scale() {
                Vec3::splat(values[0])
            } else if flags.is_per_axis_scale() {
                let axis = |i: usize, default: f32| {
                    if channels[i].bits > 0 { values[i] } else { default }
                };
                Vec3::new(
                    axis(0, defaults.scale.x),
                    axis(1, defaults.scale.y),
                    axis(2, defaults.scale.z),
                )
            } else {
                defaults.scale
            };

            let rotation = if flags.has_rotation() {
                let (x, y, z) = (values[3], values[4], values[5]);
                let flip = reader.read_bits(1)? == 1;
                let w = (1.0 - (x * x + y * y + z * z)).max(0.0).sqrt();
                Quat::from_xyzw(x, y, z, if flip { -w } else { w })
            } else {
                defaults.rotation
            };

            let position = if flags.has_position() {
                Vec3::new(values[6], values[7], values[8])
            } else {
                defaults.position
            };

            frames.push(TrackFrame::Transform(Transform {
                scale,
                rotation,
                position,
            }));
        }
        Ok(frames)
    }

    /// Declared frame counts come from the file; never reserve more than the buffer could hold
    fn frame_capacity(&self, frame_count: u32) -> usize {
        (frame_count as usize).min(self.buffer.len())
    }
}

fn read_transform(reader: &mut SsbhReader<'_>) -> Result<Transform> {
    let mut values = [0.0f32; 10];
    for value in &mut values {
        *value = reader.read_f32()?;
    }
    Ok(Transform::from_array(values))
}
