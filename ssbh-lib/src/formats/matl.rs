//! Material container (.numatb)
//!
//! Each entry names a shader and lists its parameters. A parameter stores
//! its payload behind an offset followed by a data type tag; the tag selects
//! how the payload is read. Several attributes may point at one payload, in
//! which case it is written once and decoded as one shared [`Ref`].
//!
//! # Attribute layout
//! ```text
//! 0x00: param_id u64
//! 0x08: offset -> payload
//! 0x10: data_type u64
//! ```

use serde::Serialize;

use super::common::Vector4;
use crate::codec::{
    DecodeContext, EncodeContext, FieldDescriptor, FieldKind, Ref, SsbhArray, SsbhField,
    SsbhRead, SsbhRoot, SsbhString, SsbhWrite,
};
use crate::{Result, SsbhError};

ssbh_enum! {
    pub enum FillMode: u32 {
        Line = 0,
        Solid = 1,
    }
}

ssbh_enum! {
    pub enum CullMode: u32 {
        Back = 0,
        Front = 1,
        FrontAndBack = 2,
    }
}

ssbh_enum! {
    pub enum BlendFactor: u32 {
        Zero = 0,
        One = 1,
        SourceAlpha = 2,
        DestinationAlpha = 3,
        SourceColor = 4,
        DestinationColor = 5,
        OneMinusSourceAlpha = 6,
        OneMinusDestinationAlpha = 7,
        OneMinusSourceColor = 8,
        OneMinusDestinationColor = 9,
        SourceAlphaSaturate = 10,
    }
}

ssbh_enum! {
    pub enum WrapMode: u32 {
        Repeat = 0,
        ClampToEdge = 1,
        MirroredRepeat = 2,
        ClampToBorder = 3,
    }
}

ssbh_record! {
    pub struct Sampler {
        pub wrap_s: WrapMode,
        pub wrap_t: WrapMode,
        pub wrap_r: WrapMode,
        pub min_filter: u32,
        pub mag_filter: u32,
        pub texture_filtering_type: u32,
        pub border_color: Vector4,
        pub unk11: u32,
        pub unk12: u32,
        pub lod_bias: f32,
        pub max_anisotropy: u32,
    }
}

ssbh_record! {
    pub struct BlendState {
        pub source_color: BlendFactor,
        pub unk2: u32,
        pub destination_color: BlendFactor,
        pub unk4: u32,
        pub unk5: u32,
        pub unk6: u32,
        pub alpha_sample_to_coverage: u32,
        pub unk8: u32,
        pub unk9: u32,
        pub unk10: u32,
    }
}

ssbh_record! {
    pub struct RasterizerState {
        pub fill_mode: FillMode,
        pub cull_mode: CullMode,
        pub depth_bias: f32,
        pub unk4: f32,
        pub unk5: f32,
        pub unk6: u32,
        pub unk7: u32,
        pub unk8: f32,
    }
}

/// Payload of a material parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParamData {
    Float(f32),
    Boolean(bool),
    Vector4(Vector4),
    /// Stored as an 8-byte offset to the text that immediately follows it
    String(String),
    Sampler(Sampler),
    BlendState(BlendState),
    RasterizerState(RasterizerState),
    /// Payload with a data type this crate cannot read; it cannot be written back
    Unsupported { data_type: u64 },
}

impl ParamData {
    pub const FLOAT: u64 = 0x1;
    pub const BOOLEAN: u64 = 0x2;
    pub const VECTOR4: u64 = 0x5;
    pub const STRING: u64 = 0xB;
    pub const SAMPLER: u64 = 0xE;
    pub const BLEND_STATE: u64 = 0x11;
    pub const RASTERIZER_STATE: u64 = 0x12;

    /// Tag written after the payload offset
    pub fn data_type(&self) -> u64 {
        match self {
            Self::Float(_) => Self::FLOAT,
            Self::Boolean(_) => Self::BOOLEAN,
            Self::Vector4(_) => Self::VECTOR4,
            Self::String(_) => Self::STRING,
            Self::Sampler(_) => Self::SAMPLER,
            Self::BlendState(_) => Self::BLEND_STATE,
            Self::RasterizerState(_) => Self::RASTERIZER_STATE,
            Self::Unsupported { data_type } => *data_type,
        }
    }

    /// Read the payload at the cursor for a given data type tag
    pub fn read_payload(ctx: &mut DecodeContext<'_>, data_type: u64) -> Result<Self> {
        Ok(match data_type {
            Self::FLOAT => Self::Float(ctx.reader().read_f32()?),
            Self::BOOLEAN => Self::Boolean(bool::read_field(ctx)?),
            Self::VECTOR4 => Self::Vector4(Vector4::read_fields(ctx)?),
            Self::STRING => Self::String(read_param_string(ctx)?),
            Self::SAMPLER => Self::Sampler(Sampler::read_fields(ctx)?),
            Self::BLEND_STATE => Self::BlendState(BlendState::read_fields(ctx)?),
            Self::RASTERIZER_STATE => Self::RasterizerState(RasterizerState::read_fields(ctx)?),
            data_type => {
                tracing::debug!("Keeping material parameter with data type 0x{:X} unread", data_type);
                Self::Unsupported { data_type }
            }
        })
    }
}

fn write_param_string<'a>(text: &'a str, ctx: &mut EncodeContext<'a>) -> Result<()> {
    let position = ctx.writer().position();
    let value = ctx.offset_value(position, position + 8);
    ctx.writer().write_u64(value)?;
    ctx.writer().write_bytes(text.as_bytes())?;
    ctx.writer().write_u8(0)?;
    ctx.writer().pad(4, 0)
}

fn read_param_string(ctx: &mut DecodeContext<'_>) -> Result<String> {
    let position = ctx.reader().position();
    match ctx.read_offset()? {
        Some(target) => ctx.read_at(target, |ctx| {
            let bytes = ctx.reader().read_cstr()?;
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }),
        None => Err(SsbhError::format(format!(
            "material string at 0x{:X} has no text offset",
            position
        ))),
    }
}

impl SsbhWrite for ParamData {
    fn write_fields<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        match self {
            Self::Float(value) => ctx.writer().write_f32(*value),
            Self::Boolean(value) => value.write_field(ctx),
            Self::Vector4(value) => value.write_fields(ctx),
            Self::String(text) => write_param_string(text, ctx),
            Self::Sampler(value) => value.write_fields(ctx),
            Self::BlendState(value) => value.write_fields(ctx),
            Self::RasterizerState(value) => value.write_fields(ctx),
            Self::Unsupported { data_type } => Err(SsbhError::UnsupportedType(format!(
                "material parameter data type 0x{:X}",
                data_type
            ))),
        }
    }

    fn post_write<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        match self {
            Self::Float(_) => ctx.writer().pad(8, 0),
            _ => Ok(()),
        }
    }

    fn alignment(&self) -> u64 {
        match self {
            Self::String(_) => 8,
            _ => 1,
        }
    }
}

/// One material parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatlAttribute {
    pub param_id: u64,
    pub data: Ref<ParamData>,
}

impl MatlAttribute {
    pub const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor {
            name: "param_id",
            kind: FieldKind::Primitive,
            size: 8,
        },
        FieldDescriptor {
            name: "data",
            kind: FieldKind::Reference,
            size: 8,
        },
        FieldDescriptor {
            name: "data_type",
            kind: FieldKind::Primitive,
            size: 8,
        },
    ];

    pub fn new(param_id: u64, data: ParamData) -> Self {
        Self {
            param_id,
            data: Ref::new(data),
        }
    }

    pub fn data_type(&self) -> u64 {
        self.data.data_type()
    }
}

impl SsbhWrite for MatlAttribute {
    fn write_fields<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        ctx.writer().write_u64(self.param_id)?;
        self.data.write_reference(ctx)?;
        ctx.writer().write_u64(self.data.data_type())
    }
}

impl SsbhRead for MatlAttribute {
    fn read_fields(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let param_id = ctx.reader().read_u64()?;
        let position = ctx.reader().position();
        let target = ctx.read_offset()?;
        let data_type = ctx.reader().read_u64()?;

        let target = target.ok_or_else(|| {
            SsbhError::format(format!(
                "material parameter 0x{:X} at 0x{:X} has no data",
                param_id, position
            ))
        })?;
        let data = ctx.read_reference(target, |ctx| ParamData::read_payload(ctx, data_type))?;
        Ok(Self {
            param_id,
            data: data.into(),
        })
    }
}

impl SsbhField for MatlAttribute {
    const KIND: FieldKind = FieldKind::Record;
    const SIZE: usize = 24;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        self.write_fields(ctx)
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        Self::read_fields(ctx)
    }
}

ssbh_record! {
    pub struct MatlEntry {
        pub material_label: SsbhString,
        pub attributes: SsbhArray<MatlAttribute>,
        pub shader_label: SsbhString,
    }
}

ssbh_record! {
    pub struct Matl {
        pub major_version: u16,
        pub minor_version: u16,
        pub entries: SsbhArray<MatlEntry>,
    }
}

impl SsbhRoot for Matl {
    const MAGIC: [u8; 4] = *b"LTAM";
}

impl Matl {
    pub fn entry(&self, material_label: &str) -> Option<&MatlEntry> {
        self.entries
            .iter()
            .find(|e| e.material_label.as_str() == material_label)
    }
}

impl MatlEntry {
    pub fn attribute(&self, param_id: u64) -> Option<&MatlAttribute> {
        self.attributes.iter().find(|a| a.param_id == param_id)
    }
}
