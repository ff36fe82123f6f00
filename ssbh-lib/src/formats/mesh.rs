//! Mesh container (.numshb)
//!
//! Geometry is stored as raw vertex and index buffers; `MeshObject` and
//! `MeshAttribute` describe how each object's slice of those buffers is laid
//! out. Rigging groups carry per-bone vertex weight buffers.
//!
//! # Layout
//! ```text
//! "HSEM" magic, u16 major, u16 minor, model name, bounding volumes,
//! objects[], buffer sizes[], u64 index size,
//! vertex buffers[], index buffer, rigging groups[], unknown buffer
//! ```

use super::common::Vector3;
use crate::codec::{SsbhArray, SsbhByteBuffer, SsbhRoot, SsbhString};

ssbh_enum! {
    /// Width of the entries in the index buffer
    pub enum DrawElementType: u32 {
        UnsignedShort = 0,
        UnsignedInt = 1,
    }
}

ssbh_enum! {
    pub enum RiggingType: u32 {
        SingleBound = 0,
        Regular = 1,
    }
}

ssbh_enum! {
    /// Component type of a vertex attribute
    pub enum AttributeDataType: u32 {
        Float3 = 0,
        Byte4 = 2,
        Float4 = 4,
        HalfFloat4 = 5,
        Float2 = 7,
        HalfFloat2 = 8,
    }
}

impl DrawElementType {
    /// Bytes per index
    pub fn index_size(self) -> usize {
        match self {
            Self::UnsignedShort => 2,
            Self::UnsignedInt => 4,
        }
    }
}

impl AttributeDataType {
    /// Bytes per vertex for one attribute of this type
    pub fn size_in_bytes(self) -> usize {
        match self {
            Self::Float3 => 12,
            Self::Byte4 => 4,
            Self::Float4 => 16,
            Self::HalfFloat4 => 8,
            Self::Float2 => 8,
            Self::HalfFloat2 => 4,
        }
    }
}

ssbh_record! {
    pub struct BoundingInfo {
        pub sphere_center: Vector3,
        pub sphere_radius: f32,
        pub box_min: Vector3,
        pub box_max: Vector3,
        pub oriented_box_center: Vector3,
        /// Row-major 3x3 rotation of the oriented box
        pub oriented_box_transform: [f32; 9],
        pub oriented_box_size: Vector3,
    }
}

ssbh_record! {
    pub struct MeshAttribute {
        pub index: i32,
        pub data_type: AttributeDataType,
        pub buffer_index: u32,
        pub buffer_offset: u32,
        pub sub_index: u64,
        pub name: SsbhString,
        /// Alternate names the attribute is bound under
        pub attribute_names: SsbhArray<SsbhString>,
    }
}

ssbh_record! {
    pub struct MeshObject {
        pub name: SsbhString,
        pub sub_index: i64,
        pub parent_bone_name: SsbhString,
        pub vertex_count: u32,
        pub vertex_index_count: u32,
        pub unk2: u32,
        pub vertex_offset: u32,
        pub vertex_offset2: u32,
        pub final_buffer_offset: u32,
        pub buffer_index: i32,
        pub stride: u32,
        pub stride2: u32,
        pub unk6: u32,
        pub unk7: u32,
        pub element_offset: u32,
        pub unk8: i32,
        pub draw_element_type: DrawElementType,
        pub rigging_type: RiggingType,
        pub unk11: i32,
        pub unk12: i32,
        pub bounding_info: BoundingInfo,
        pub attributes: SsbhArray<MeshAttribute>,
    }
}

ssbh_record! {
    pub struct MeshBoneBuffer {
        pub bone_name: SsbhString,
        pub data: SsbhByteBuffer,
    }
}

ssbh_record! {
    pub struct MeshRiggingGroup {
        pub mesh_name: SsbhString,
        pub mesh_sub_index: i64,
        pub flags: u64,
        pub buffers: SsbhArray<MeshBoneBuffer>,
    }
}

ssbh_record! {
    pub struct Mesh {
        pub major_version: u16,
        pub minor_version: u16,
        pub model_name: SsbhString,
        pub bounding_info: BoundingInfo,
        pub unk1: f32,
        pub objects: SsbhArray<MeshObject>,
        pub buffer_sizes: SsbhArray<u32>,
        pub polygon_index_size: u64,
        pub vertex_buffers: SsbhArray<SsbhByteBuffer>,
        pub polygon_buffer: SsbhByteBuffer,
        pub rigging_buffers: SsbhArray<MeshRiggingGroup>,
        pub unknown_buffer: SsbhByteBuffer,
    }
}

impl SsbhRoot for Mesh {
    const MAGIC: [u8; 4] = *b"HSEM";
}

impl Mesh {
    /// Find an object by name and sub-index
    pub fn object(&self, name: &str, sub_index: i64) -> Option<&MeshObject> {
        self.objects
            .iter()
            .find(|o| o.name.as_str() == name && o.sub_index == sub_index)
    }

    /// Rigging group for an object, if it is skinned
    pub fn rigging_for(&self, object: &MeshObject) -> Option<&MeshRiggingGroup> {
        self.rigging_buffers
            .iter()
            .find(|g| g.mesh_name == object.name && g.mesh_sub_index == object.sub_index)
    }
}

impl MeshObject {
    /// Index buffer bytes used by this object
    pub fn index_buffer_size(&self) -> usize {
        self.vertex_index_count as usize * self.draw_element_type.index_size()
    }
}
