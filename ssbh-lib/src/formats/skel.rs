//! Skeleton container (.nusktb)
//!
//! Bones are listed in hierarchy order with a parent index of -1 for roots.
//! The four matrix arrays are parallel to the bone list.

use super::common::Matrix4x4;
use crate::codec::{SsbhArray, SsbhRoot, SsbhString};

ssbh_enum! {
    pub enum BillboardType: u8 {
        Disabled = 0,
        XAxisViewPointAligned = 1,
        XYAxisViewPointAligned = 2,
        YAxisViewPointAligned = 3,
        YAxisViewVectorAligned = 4,
        XYAxisViewVectorAligned = 6,
    }
}

ssbh_record! {
    pub struct SkelBoneEntry {
        pub name: SsbhString,
        pub index: u16,
        pub parent_index: i16,
        pub unk_type: u8,
        pub billboard_type: BillboardType,
        pub unk_padding: u16,
    }
}

ssbh_record! {
    pub struct Skel {
        pub major_version: u16,
        pub minor_version: u16,
        pub bone_entries: SsbhArray<SkelBoneEntry>,
        pub world_transforms: SsbhArray<Matrix4x4>,
        pub inv_world_transforms: SsbhArray<Matrix4x4>,
        pub transforms: SsbhArray<Matrix4x4>,
        pub inv_transforms: SsbhArray<Matrix4x4>,
    }
}

impl SsbhRoot for Skel {
    const MAGIC: [u8; 4] = *b"LEKS";
}

impl Skel {
    pub fn bone(&self, name: &str) -> Option<&SkelBoneEntry> {
        self.bone_entries.iter().find(|b| b.name.as_str() == name)
    }

    pub fn parent(&self, bone: &SkelBoneEntry) -> Option<&SkelBoneEntry> {
        usize::try_from(bone.parent_index)
            .ok()
            .and_then(|i| self.bone_entries.get(i))
    }

    /// Local transform of the bone at `index`
    pub fn transform(&self, index: usize) -> Option<&Matrix4x4> {
        self.transforms.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bone_entry_size() {
        assert_eq!(<SkelBoneEntry as crate::codec::SsbhField>::SIZE, 16);
    }

    #[test]
    fn test_parent_lookup() {
        let bone = |name: &str, index: u16, parent_index: i16| SkelBoneEntry {
            name: name.into(),
            index,
            parent_index,
            unk_type: 1,
            billboard_type: BillboardType::Disabled,
            unk_padding: 0,
        };
        let skel = Skel {
            major_version: 1,
            minor_version: 0,
            bone_entries: vec![bone("Trans", 0, -1), bone("Rot", 1, 0)].into(),
            world_transforms: SsbhArray::default(),
            inv_world_transforms: SsbhArray::default(),
            transforms: vec![Matrix4x4::IDENTITY, Matrix4x4::IDENTITY].into(),
            inv_transforms: SsbhArray::default(),
        };

        let rot = skel.bone("Rot").unwrap();
        assert_eq!(skel.parent(rot).unwrap().name.as_str(), "Trans");
        assert!(skel.parent(skel.bone("Trans").unwrap()).is_none());
        assert_eq!(skel.transform(1), Some(&Matrix4x4::IDENTITY));
    }
}
