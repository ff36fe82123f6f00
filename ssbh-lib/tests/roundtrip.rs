//! Round trips of every container kind through the format registry.

use ssbh_lib::formats::anim::AnimType;
use ssbh_lib::formats::matl::{BlendFactor, BlendState, CullMode, FillMode, RasterizerState};
use ssbh_lib::formats::mesh::{AttributeDataType, BoundingInfo, DrawElementType, RiggingType};
use ssbh_lib::formats::skel::BillboardType;
use ssbh_lib::formats::*;
use ssbh_lib::{
    CodecOptions, FormatKind, OffsetBase, Ref, SsbhArray, SsbhError, SsbhFile, TrackFrame,
};

fn bounding_info() -> BoundingInfo {
    BoundingInfo {
        sphere_center: Vector3::new(0.0, 5.0, 0.0),
        sphere_radius: 7.5,
        box_min: Vector3::new(-3.0, 0.0, -2.0),
        box_max: Vector3::new(3.0, 10.0, 2.0),
        oriented_box_center: Vector3::new(0.0, 5.0, 0.0),
        oriented_box_transform: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        oriented_box_size: Vector3::new(3.0, 5.0, 2.0),
    }
}

fn mesh() -> Mesh {
    let attribute = |index: i32, name: &str, data_type, offset| MeshAttribute {
        index,
        data_type,
        buffer_index: 0,
        buffer_offset: offset,
        sub_index: 0,
        name: name.into(),
        attribute_names: vec![name.into()].into(),
    };

    Mesh {
        major_version: 1,
        minor_version: 10,
        model_name: "model".into(),
        bounding_info: bounding_info(),
        unk1: 0.0,
        objects: vec![MeshObject {
            name: "body_VIS_O_OBJShape".into(),
            sub_index: 0,
            parent_bone_name: "".into(),
            vertex_count: 3,
            vertex_index_count: 3,
            unk2: 3,
            vertex_offset: 0,
            vertex_offset2: 0,
            final_buffer_offset: 0,
            buffer_index: 0,
            stride: 20,
            stride2: 0,
            unk6: 0,
            unk7: 0,
            element_offset: 0,
            unk8: 4,
            draw_element_type: DrawElementType::UnsignedShort,
            rigging_type: RiggingType::Regular,
            unk11: 0,
            unk12: 0,
            bounding_info: bounding_info(),
            attributes: vec![
                attribute(0, "Position0", AttributeDataType::Float3, 0),
                attribute(1, "map1", AttributeDataType::HalfFloat2, 12),
            ]
            .into(),
        }]
        .into(),
        buffer_sizes: vec![60, 0, 0, 0].into(),
        polygon_index_size: 6,
        vertex_buffers: vec![vec![0x11; 60].into(), vec![0x22; 8].into()].into(),
        polygon_buffer: vec![0, 0, 1, 0, 2, 0].into(),
        rigging_buffers: vec![MeshRiggingGroup {
            mesh_name: "body_VIS_O_OBJShape".into(),
            mesh_sub_index: 0,
            flags: 0x100,
            buffers: vec![MeshBoneBuffer {
                bone_name: "Hip".into(),
                data: vec![0, 0, 0, 0, 0, 0, 128, 63].into(),
            }]
            .into(),
        }]
        .into(),
        unknown_buffer: Default::default(),
    }
}

fn matl() -> Matl {
    let shared = Ref::new(ParamData::BlendState(BlendState {
        source_color: BlendFactor::One,
        unk2: 0,
        destination_color: BlendFactor::Zero,
        unk4: 1,
        unk5: 0,
        unk6: 0,
        alpha_sample_to_coverage: 0,
        unk8: 0,
        unk9: 0,
        unk10: 5,
    }));
    let entry = |label: &str| MatlEntry {
        material_label: label.into(),
        attributes: vec![
            MatlAttribute {
                param_id: 0x118,
                data: shared.clone(),
            },
            MatlAttribute::new(0xC6, ParamData::Float(0.5)),
            MatlAttribute::new(0xE8, ParamData::Boolean(false)),
            MatlAttribute::new(0x5C, ParamData::String("/common/shader/sfxpbs/fighter/default_params".into())),
            MatlAttribute::new(
                0x117,
                ParamData::RasterizerState(RasterizerState {
                    fill_mode: FillMode::Solid,
                    cull_mode: CullMode::Front,
                    depth_bias: 0.0,
                    unk4: 0.0,
                    unk5: 0.0,
                    unk6: 16777217,
                    unk7: 0,
                    unk8: 0.0,
                }),
            ),
        ]
        .into(),
        shader_label: "SFX_PBS_010000000808ba68_opaque".into(),
    };

    Matl {
        major_version: 1,
        minor_version: 6,
        entries: vec![entry("skin"), entry("eye")].into(),
    }
}

fn skel() -> Skel {
    let mut moved = Matrix4x4::IDENTITY;
    moved.row4 = Vector4::new(0.0, 10.0, 0.0, 1.0);
    Skel {
        major_version: 1,
        minor_version: 0,
        bone_entries: vec![
            SkelBoneEntry {
                name: "Trans".into(),
                index: 0,
                parent_index: -1,
                unk_type: 1,
                billboard_type: BillboardType::Disabled,
                unk_padding: 0,
            },
            SkelBoneEntry {
                name: "Hip".into(),
                index: 1,
                parent_index: 0,
                unk_type: 1,
                billboard_type: BillboardType::YAxisViewPointAligned,
                unk_padding: 0,
            },
        ]
        .into(),
        world_transforms: vec![Matrix4x4::IDENTITY, moved.clone()].into(),
        inv_world_transforms: vec![Matrix4x4::IDENTITY, Matrix4x4::IDENTITY].into(),
        transforms: vec![Matrix4x4::IDENTITY, moved].into(),
        inv_transforms: vec![Matrix4x4::IDENTITY, Matrix4x4::IDENTITY].into(),
    }
}

/// Track buffer: a constant transform at 0, compressed visibility at 44
fn anim() -> Anim {
    let mut buffer = Vec::new();
    for value in [1.0f32, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.5, 2.0, -1.0] {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
    buffer.extend_from_slice(&0u32.to_le_bytes());
    buffer.extend_from_slice(&[0; 8]);
    buffer.extend_from_slice(&16u32.to_le_bytes());
    buffer.extend_from_slice(&3u32.to_le_bytes());
    buffer.push(0b110);

    let track = |name: &str, flags, frame_count, data_offset, data_size| AnimTrack {
        name: name.into(),
        flags,
        frame_count,
        unk3: 0,
        data_offset,
        data_size,
    };

    Anim {
        major_version: 2,
        minor_version: 0,
        final_frame_index: 2.0,
        unk1: 1,
        unk2: 3,
        name: "a00wait1.nuanmb".into(),
        animations: vec![
            AnimGroup {
                anim_type: AnimType::Transform,
                nodes: vec![AnimNode {
                    name: "Hip".into(),
                    tracks: vec![track("Transform", 0x0201, 1, 0, 44)].into(),
                }]
                .into(),
            },
            AnimGroup {
                anim_type: AnimType::Visibility,
                nodes: vec![AnimNode {
                    name: "body_VIS".into(),
                    tracks: vec![track("Visibility", 0x0408, 3, 44, 17)].into(),
                }]
                .into(),
            },
        ]
        .into(),
        buffer: buffer.into(),
    }
}

fn modl() -> Modl {
    Modl {
        major_version: 1,
        minor_version: 0,
        model_name: "model".into(),
        skeleton_file_name: "model.nusktb".into(),
        material_file_names: vec!["model.numatb".into()].into(),
        animation_file_name: "".into(),
        mesh_file_name: "model.numshb".into(),
        entries: vec![ModlEntry {
            mesh_name: "body_VIS_O_OBJShape".into(),
            sub_index: 0,
            material_label: "skin".into(),
        }]
        .into(),
    }
}

fn all_files() -> Vec<SsbhFile> {
    vec![
        mesh().into(),
        matl().into(),
        skel().into(),
        anim().into(),
        modl().into(),
    ]
}

#[test]
fn test_every_kind_roundtrips() {
    for file in all_files() {
        let bytes = file.to_bytes(&CodecOptions::default()).unwrap();
        assert_eq!(&bytes[0..4], b"HBSS");
        assert_eq!(&bytes[0x10..0x14], &file.kind().magic());
        assert_eq!(bytes.len() % 4, 0);

        let decoded = SsbhFile::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.kind(), file.kind());
        assert_eq!(decoded.version(), file.version());
        assert_eq!(decoded, file);

        // Encoding is deterministic
        assert_eq!(decoded.to_bytes(&CodecOptions::default()).unwrap(), bytes);
    }
}

#[test]
fn test_headerless_data_origin_roundtrip() {
    let options = CodecOptions {
        write_header: false,
        offset_base: OffsetBase::DataOrigin,
    };
    for file in all_files() {
        let bytes = file.to_bytes(&options).unwrap();
        assert_eq!(&bytes[0..4], &file.kind().magic());
        assert_eq!(SsbhFile::from_bytes_with(&bytes, &options).unwrap(), file);
        assert_eq!(SsbhFile::from_headerless_bytes(&bytes, &options).unwrap(), file);
    }
}

#[test]
fn test_truncated_files() {
    for file in all_files() {
        let bytes = file.to_bytes(&CodecOptions::default()).unwrap();
        let result = SsbhFile::from_bytes(&bytes[..bytes.len() / 2]);
        assert!(
            matches!(result, Err(SsbhError::TruncatedData { .. })),
            "{} decoded from half its bytes",
            file.kind()
        );
    }
}

#[test]
fn test_bad_container_magic() {
    let mut bytes = SsbhFile::from(modl())
        .to_bytes(&CodecOptions::default())
        .unwrap();
    bytes[0..4].copy_from_slice(b"SSBH");
    assert!(matches!(
        SsbhFile::from_bytes(&bytes),
        Err(SsbhError::Format(_))
    ));
}

#[test]
fn test_shared_material_payload_aliases_after_decode() {
    let bytes = SsbhFile::from(matl())
        .to_bytes(&CodecOptions::default())
        .unwrap();
    let SsbhFile::Matl(decoded) = SsbhFile::from_bytes(&bytes).unwrap() else {
        panic!("expected a material");
    };

    let skin = &decoded.entry("skin").unwrap().attributes[0].data;
    let eye = &decoded.entry("eye").unwrap().attributes[0].data;
    assert!(Ref::ptr_eq(skin, eye));
}

#[test]
fn test_anim_tracks_decode_after_roundtrip() {
    let bytes = SsbhFile::from(anim())
        .to_bytes(&CodecOptions::default())
        .unwrap();
    let SsbhFile::Anim(decoded) = SsbhFile::from_bytes(&bytes).unwrap() else {
        panic!("expected an animation");
    };

    let names: Vec<_> = decoded
        .tracks()
        .map(|(_, node, track)| format!("{}/{}", node.name, track.name))
        .collect();
    assert_eq!(names, vec!["Hip/Transform", "body_VIS/Visibility"]);

    let transform = decoded.track("Hip", "Transform").unwrap();
    let frames = decoded.decode_track(transform).unwrap();
    assert_eq!(frames.len(), 1);
    let position = frames[0].as_transform().unwrap().position;
    assert_eq!(position.to_array(), [0.5, 2.0, -1.0]);

    let visibility = decoded.track("body_VIS", "Visibility").unwrap();
    assert_eq!(
        decoded.decode_track(visibility).unwrap(),
        vec![
            TrackFrame::Visibility(false),
            TrackFrame::Visibility(true),
            TrackFrame::Visibility(true),
        ]
    );
}

#[test]
fn test_model_lookups() {
    let modl = modl();
    assert_eq!(modl.material_for("body_VIS_O_OBJShape", 0), Some("skin"));
    assert_eq!(modl.material_for("body_VIS_O_OBJShape", 1), None);

    let mesh = mesh();
    let object = mesh.object("body_VIS_O_OBJShape", 0).unwrap();
    assert_eq!(object.index_buffer_size(), 6);
    assert_eq!(mesh.rigging_for(object).unwrap().buffers.len(), 1);
}

#[test]
fn test_file_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("model.{}", FormatKind::Skel.extension()));

    let file = SsbhFile::from(skel());
    file.write_to_file(&path, &CodecOptions::default()).unwrap();
    assert_eq!(SsbhFile::from_file(&path).unwrap(), file);

    let missing = SsbhFile::from_file(dir.path().join("missing.numshb"));
    assert!(matches!(missing, Err(SsbhError::Io(_))));
}

#[test]
fn test_json_dump() {
    let json = serde_json::to_value(SsbhFile::from(matl())).unwrap();
    assert_eq!(json["format"], "Matl");
    assert_eq!(json["entries"][0]["material_label"], "skin");
    assert_eq!(json["entries"][0]["attributes"][1]["data"]["Float"], 0.5);

    let empty: SsbhArray<u32> = SsbhArray::default();
    assert_eq!(serde_json::to_value(&empty).unwrap(), serde_json::json!([]));
}
