//! Model container (.numdlb)
//!
//! Ties a mesh, skeleton, and material file together and assigns a material
//! label to each mesh object.

use crate::codec::{SsbhArray, SsbhRoot, SsbhString};

ssbh_record! {
    pub struct ModlEntry {
        pub mesh_name: SsbhString,
        pub sub_index: i64,
        pub material_label: SsbhString,
    }
}

ssbh_record! {
    pub struct Modl {
        pub major_version: u16,
        pub minor_version: u16,
        pub model_name: SsbhString,
        pub skeleton_file_name: SsbhString,
        pub material_file_names: SsbhArray<SsbhString>,
        pub animation_file_name: SsbhString,
        pub mesh_file_name: SsbhString,
        pub entries: SsbhArray<ModlEntry>,
    }
}

impl SsbhRoot for Modl {
    const MAGIC: [u8; 4] = *b"LDOM";
}

impl Modl {
    /// Material label assigned to a mesh object
    pub fn material_for(&self, mesh_name: &str, sub_index: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.mesh_name.as_str() == mesh_name && e.sub_index == sub_index)
            .map(|e| e.material_label.as_str())
    }
}
