//! Tests for track decoding

use glam::{Quat, Vec3};

use super::*;
use crate::SsbhError;
use crate::cursor::SsbhWriter;

const DEFAULTS: [f32; 10] = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 4.0, 5.0, 6.0];

/// Compressed transform bytes: header, channels, defaults, then `frames`
fn compressed_transform(
    channel_flags: u16,
    frame_count: u32,
    channels: [(f32, f32, u64); CHANNEL_COUNT],
    frames: impl FnOnce(&mut SsbhWriter),
) -> Vec<u8> {
    let data_start = 0xCC;
    let mut w = SsbhWriter::new();
    w.write_u16(4).unwrap();
    w.write_u16(channel_flags).unwrap();
    w.write_u16(0).unwrap();
    w.write_u16(0).unwrap();
    w.write_u32(data_start).unwrap();
    w.write_u32(frame_count).unwrap();
    for (start, end, packed) in channels {
        w.write_f32(start).unwrap();
        w.write_f32(end).unwrap();
        w.write_u64(packed).unwrap();
    }
    for value in DEFAULTS {
        w.write_f32(value).unwrap();
    }
    w.write_u32(0).unwrap();
    assert_eq!(w.position(), data_start as u64);
    frames(&mut w);
    w.flush_bits().unwrap();
    w.into_inner().unwrap()
}

fn transforms(frames: &[TrackFrame]) -> Vec<Transform> {
    frames.iter().map(|f| *f.as_transform().unwrap()).collect()
}

// ========================================================================
// Lerp
// ========================================================================

#[test]
fn test_lerp_endpoints() {
    for (a, b) in [(0.0, 1.0), (-3.5, 7.25), (10.0, -10.0)] {
        assert_eq!(lerp(a, b, 0.0, 1.0, 0.0), a);
        assert_eq!(lerp(a, b, 0.0, 1.0, 1.0), b);
        assert_eq!(lerp(a, b, 2.0, 5.0, 2.0), a);
        assert_eq!(lerp(a, b, 2.0, 5.0, 5.0), b);
    }
}

#[test]
fn test_lerp_empty_range() {
    for t in [-1.0, 0.0, 0.5, 3.0, f32::NAN] {
        assert_eq!(lerp(2.0, 8.0, 3.0, 3.0, t), 2.0);
    }
}

#[test]
fn test_lerp_midpoint() {
    assert_eq!(lerp(0.0, 10.0, 0.0, 1.0, 0.5), 5.0);
    assert_eq!(lerp(0.0, 10.0, 0.0, 2.0, 1.0), 5.0);
}

#[test]
fn test_channel_value() {
    let channel = Channel {
        start: 1.0,
        end: 2.0,
        bits: 8,
    };
    assert_eq!(channel.value(0), 1.0);
    assert_eq!(channel.value(255), 2.0);

    // Zero bits divides zero by zero; the NaN becomes 0
    let empty = Channel {
        start: 3.0,
        end: 4.0,
        bits: 0,
    };
    assert_eq!(empty.value(0), 0.0);
}

// ========================================================================
// Flags
// ========================================================================

#[test]
fn test_layout_from_exact_flags() {
    assert_eq!(TrackLayout::from_flags(0x0508), TrackLayout::ConstantVisibility);
    assert_eq!(TrackLayout::from_flags(0x0408), TrackLayout::CompressedVisibility);
    assert_eq!(TrackLayout::from_flags(0x0201), TrackLayout::ConstantTransform);
    assert_eq!(TrackLayout::from_flags(0x0401), TrackLayout::CompressedTransform);
    // Category bit alone is not enough
    assert_eq!(TrackLayout::from_flags(0x0108), TrackLayout::Unsupported(0x0108));
    assert_eq!(TrackLayout::from_flags(0x10401), TrackLayout::Unsupported(0x10401));

    for flags in [0x0508, 0x0408, 0x0201, 0x0401, 0x0503] {
        assert_eq!(TrackLayout::from_flags(flags).flags(), flags);
    }
}

#[test]
fn test_channel_flag_predicates() {
    let uniform = ChannelFlags::from_bits_retain(0x3);
    assert!(uniform.is_uniform_scale());
    assert!(!uniform.is_per_axis_scale());
    assert!(uniform.is_channel_active(0));
    assert!(!uniform.is_channel_active(1));

    let per_axis = ChannelFlags::from_bits_retain(0x1);
    assert!(per_axis.is_per_axis_scale());
    assert!((0..3).all(|i| per_axis.is_channel_active(i)));

    // 0x2 alone selects no scale channels
    let neither = ChannelFlags::from_bits_retain(0x2);
    assert!(!neither.is_uniform_scale() && !neither.is_per_axis_scale());

    let all = ChannelFlags::from_bits_retain(0xD);
    assert!(all.has_rotation() && all.has_position());
    assert!((3..9).all(|i| all.is_channel_active(i)));
    assert!(!all.is_channel_active(9));
}

// ========================================================================
// Visibility
// ========================================================================

#[test]
fn test_compressed_visibility() {
    let mut w = SsbhWriter::new();
    w.write_u16(0).unwrap();
    w.write_u16(0).unwrap();
    w.write_u16(0).unwrap();
    w.write_u16(0).unwrap();
    w.write_u32(COMPRESSED_HEADER_SIZE as u32).unwrap();
    w.write_u32(5).unwrap();
    w.write_u8(0b0001_0110).unwrap();
    let bytes = w.into_inner().unwrap();

    let frames = AnimTrackDecoder::new(&bytes).decode(0x0408, 0).unwrap();
    let visible: Vec<_> = frames.iter().map(|f| f.as_visibility().unwrap()).collect();
    assert_eq!(visible, vec![false, true, true, false, true]);
}

#[test]
fn test_compressed_visibility_at_offset() {
    // Data start is relative to the track, not the buffer
    let mut bytes = vec![0xAA; 3];
    bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&3u32.to_le_bytes());
    bytes.push(0b101);

    let frames = AnimTrackDecoder::new(&bytes).decode(0x0408, 3).unwrap();
    assert_eq!(
        frames,
        vec![
            TrackFrame::Visibility(true),
            TrackFrame::Visibility(false),
            TrackFrame::Visibility(true),
        ]
    );
}

#[test]
fn test_constant_visibility_reads_one_bit() {
    let bytes = [0x00, 0xFF];
    let decoder = AnimTrackDecoder::new(&bytes);
    assert_eq!(
        decoder.decode(0x0508, 0).unwrap(),
        vec![TrackFrame::Visibility(false)]
    );
    assert_eq!(
        decoder.decode(0x0508, 1).unwrap(),
        vec![TrackFrame::Visibility(true)]
    );
}

// ========================================================================
// Transforms
// ========================================================================

#[test]
fn test_constant_transform() {
    let mut bytes = Vec::new();
    for value in 1..=10 {
        bytes.extend_from_slice(&(value as f32).to_le_bytes());
    }
    bytes.extend_from_slice(&0xDEADu32.to_le_bytes());
    assert_eq!(bytes.len(), 44);

    let frames = AnimTrackDecoder::new(&bytes).decode(0x0201, 0).unwrap();
    assert_eq!(frames.len(), 1);
    let transform = frames[0].as_transform().unwrap();
    assert_eq!(
        transform.to_array(),
        [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
    );
}

#[test]
fn test_compressed_uniform_scale() {
    let mut channels = [(0.0, 0.0, 0); CHANNEL_COUNT];
    channels[0] = (1.0, 2.0, 8 << 3);
    // Rotation carries a width but is not selected by the flags
    channels[3] = (-1.0, 1.0, 2 << 3);

    let stored = [0u32, 255, 51, 128];
    let bytes = compressed_transform(0x3, stored.len() as u32, channels, |w| {
        for value in stored {
            w.write_bits(value, 8).unwrap();
        }
    });

    let frames = transforms(&AnimTrackDecoder::new(&bytes).decode(0x0401, 0).unwrap());
    assert_eq!(frames.len(), 4);
    for (frame, value) in frames.iter().zip(stored) {
        let expected = lerp(1.0, 2.0, 0.0, 1.0, value as f32 / 255.0);
        assert_eq!(frame.scale, Vec3::splat(expected));
        assert_eq!(frame.rotation, Quat::from_xyzw(0.0, 0.0, 0.0, 1.0));
        assert_eq!(frame.position, Vec3::new(4.0, 5.0, 6.0));
    }
    assert_eq!(frames[0].scale.x, 1.0);
    assert_eq!(frames[1].scale.x, 2.0);
}

#[test]
fn test_compressed_per_axis_scale_uses_defaults() {
    let mut channels = [(0.0, 0.0, 0); CHANNEL_COUNT];
    channels[0] = (0.0, 15.0, 4);
    // Channel 1 has no bits and falls back to the default
    channels[2] = (0.0, 15.0, 4);

    let bytes = compressed_transform(0x1, 1, channels, |w| {
        w.write_bits(15, 4).unwrap();
        w.write_bits(0, 4).unwrap();
    });

    let frames = transforms(&AnimTrackDecoder::new(&bytes).decode(0x0401, 0).unwrap());
    assert_eq!(frames[0].scale, Vec3::new(15.0, 1.0, 0.0));
}

#[test]
fn test_compressed_rotation_reconstructs_w() {
    let mut channels = [(0.0, 0.0, 0); CHANNEL_COUNT];
    for channel in &mut channels[3..6] {
        *channel = (0.0, 1.0, 1);
    }

    let bytes = compressed_transform(0x4, 2, channels, |w| {
        // x, y, z, then the W sign bit
        for bit in [0, 0, 0, 1, 1, 0, 0, 0] {
            w.write_bits(bit, 1).unwrap();
        }
    });

    let frames = transforms(&AnimTrackDecoder::new(&bytes).decode(0x0401, 0).unwrap());
    assert_eq!(frames[0].rotation, Quat::from_xyzw(0.0, 0.0, 0.0, -1.0));
    assert_eq!(frames[1].rotation, Quat::from_xyzw(1.0, 0.0, 0.0, 0.0));
    for frame in &frames {
        assert_eq!(frame.scale, Vec3::ONE);
        assert_eq!(frame.position, Vec3::new(4.0, 5.0, 6.0));
    }
}

#[test]
fn test_compressed_position() {
    let mut channels = [(0.0, 0.0, 0); CHANNEL_COUNT];
    channels[6] = (-8.0, 8.0, 16 << 3);
    channels[7] = (0.0, 1.0, 1);
    channels[8] = (2.0, 2.0, 3);

    let bytes = compressed_transform(0x8, 1, channels, |w| {
        w.write_bits(0xFFFF, 16).unwrap();
        w.write_bits(1, 1).unwrap();
        w.write_bits(5, 3).unwrap();
    });

    let frames = transforms(&AnimTrackDecoder::new(&bytes).decode(0x0401, 0).unwrap());
    assert_eq!(frames[0].position, Vec3::new(8.0, 1.0, 2.0));
    assert_eq!(frames[0].rotation, Quat::IDENTITY);
}

// ========================================================================
// Errors and Edge Cases
// ========================================================================

#[test]
fn test_unsupported_flags_produce_no_frames() {
    let bytes = [0u8; 64];
    let decoder = AnimTrackDecoder::new(&bytes);
    assert!(decoder.decode(0x0503, 0).unwrap().is_empty());
    assert!(decoder.decode(0x0000, 0).unwrap().is_empty());
}

#[test]
fn test_truncated_visibility_frames() {
    let mut bytes = vec![0; 8];
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());
    bytes.push(0xFF);

    let result = AnimTrackDecoder::new(&bytes).decode(0x0408, 0);
    assert!(matches!(result, Err(SsbhError::TruncatedData { .. })));
}

#[test]
fn test_truncated_constant_transform() {
    let bytes = [0u8; 20];
    let result = AnimTrackDecoder::new(&bytes).decode(0x0201, 0);
    assert!(matches!(result, Err(SsbhError::TruncatedData { .. })));
}

#[test]
fn test_truncated_compressed_header() {
    let mut channels = [(0.0, 0.0, 0); CHANNEL_COUNT];
    channels[0] = (1.0, 2.0, 8 << 3);
    let bytes = compressed_transform(0x3, 1, channels, |w| w.write_bits(7, 8).unwrap());

    let result = AnimTrackDecoder::new(&bytes[..100]).decode(0x0401, 0);
    assert!(matches!(result, Err(SsbhError::TruncatedData { .. })));
}

#[test]
fn test_data_offset_past_end() {
    let bytes = [0u8; 4];
    let result = AnimTrackDecoder::new(&bytes).decode(0x0508, 9);
    assert!(matches!(result, Err(SsbhError::TruncatedData { .. })));
}

#[test]
fn test_decoding_is_repeatable() {
    let mut channels = [(0.0, 0.0, 0); CHANNEL_COUNT];
    channels[0] = (0.0, 1.0, 8 << 3);
    let bytes = compressed_transform(0x3, 2, channels, |w| {
        w.write_bits(10, 8).unwrap();
        w.write_bits(20, 8).unwrap();
    });

    let decoder = AnimTrackDecoder::new(&bytes);
    assert_eq!(
        decoder.decode(0x0401, 0).unwrap(),
        decoder.decode(0x0401, 0).unwrap()
    );
}

#[test]
fn test_parallel_decoding_shares_one_buffer() {
    // Four constant transform tracks packed back to back
    let mut bytes = Vec::new();
    for track in 0..4 {
        for value in 0..10 {
            bytes.extend_from_slice(&((track * 10 + value) as f32).to_le_bytes());
        }
        bytes.extend_from_slice(&0u32.to_le_bytes());
    }

    let decoder = AnimTrackDecoder::new(&bytes);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|track| scope.spawn(move || decoder.decode(0x0201, track * 44).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (track, frames) in results.iter().enumerate() {
        let transform = frames[0].as_transform().unwrap();
        assert_eq!(transform.scale.x, (track * 10) as f32);
        assert_eq!(transform.position.z, (track * 10 + 9) as f32);
    }
}
