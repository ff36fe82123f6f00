//! Animation container (.nuanmb)
//!
//! Groups of nodes, each node holding named tracks. Track payloads live in
//! one shared byte buffer; each track records where its bytes start and how
//! they are encoded. See [`crate::anim`] for decoding the payloads.

use crate::anim::{AnimTrackDecoder, TrackFlags, TrackFrame, TrackLayout};
use crate::codec::{SsbhArray, SsbhByteBuffer, SsbhRoot, SsbhString};
use crate::Result;

ssbh_enum! {
    pub enum AnimType: u64 {
        Transform = 1,
        Visibility = 2,
        Material = 4,
        Camera = 5,
    }
}

ssbh_record! {
    pub struct AnimTrack {
        pub name: SsbhString,
        /// Encoding flag word; see [`TrackLayout::from_flags`]
        pub flags: u32,
        pub frame_count: u32,
        pub unk3: u32,
        /// Start of this track's bytes in [`Anim::buffer`]
        pub data_offset: u32,
        pub data_size: u64,
    }
}

ssbh_record! {
    pub struct AnimNode {
        pub name: SsbhString,
        pub tracks: SsbhArray<AnimTrack>,
    }
}

ssbh_record! {
    pub struct AnimGroup {
        pub anim_type: AnimType,
        pub nodes: SsbhArray<AnimNode>,
    }
}

ssbh_record! {
    pub struct Anim {
        pub major_version: u16,
        pub minor_version: u16,
        pub final_frame_index: f32,
        pub unk1: u16,
        pub unk2: u16,
        pub name: SsbhString,
        pub animations: SsbhArray<AnimGroup>,
        pub buffer: SsbhByteBuffer,
    }
}

impl SsbhRoot for Anim {
    const MAGIC: [u8; 4] = *b"MINA";
}

impl AnimTrack {
    pub fn track_flags(&self) -> TrackFlags {
        TrackFlags::from_bits_retain(self.flags)
    }

    pub fn layout(&self) -> TrackLayout {
        TrackLayout::from_flags(self.flags)
    }
}

impl Anim {
    /// Every track with the group and node it belongs to
    pub fn tracks(&self) -> impl Iterator<Item = (&AnimGroup, &AnimNode, &AnimTrack)> {
        self.animations.iter().flat_map(|group| {
            group
                .nodes
                .iter()
                .flat_map(move |node| node.tracks.iter().map(move |track| (group, node, track)))
        })
    }

    /// Find a track by node name and track name
    pub fn track(&self, node_name: &str, track_name: &str) -> Option<&AnimTrack> {
        self.tracks()
            .find(|(_, node, track)| {
                node.name.as_str() == node_name && track.name.as_str() == track_name
            })
            .map(|(_, _, track)| track)
    }

    /// Decoder over this animation's track buffer
    pub fn decoder(&self) -> AnimTrackDecoder<'_> {
        AnimTrackDecoder::new(&self.buffer)
    }

    pub fn decode_track(&self, track: &AnimTrack) -> Result<Vec<TrackFrame>> {
        self.decoder().decode_track(track)
    }
}
