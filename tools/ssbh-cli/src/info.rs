//! Info command - summarize a container

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ssbh_lib::SsbhFile;

use crate::options::{CodecArgs, load};

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Container file (.numshb, .numatb, .nusktb, .nuanmb, .numdlb)
    pub file: PathBuf,

    #[command(flatten)]
    pub codec: CodecArgs,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let file = load(&args.file, &args.codec.options())?;
    for line in summary(&file) {
        println!("{}", line);
    }
    Ok(())
}

/// Human-readable lines describing `file`
pub fn summary(file: &SsbhFile) -> Vec<String> {
    let (major, minor) = file.version();
    let mut lines = vec![format!("{} v{}.{}", file.kind(), major, minor)];

    match file {
        SsbhFile::Mesh(mesh) => {
            lines.push(format!("  Model: {}", mesh.model_name));
            lines.push(format!("  Objects: {}", mesh.objects.len()));
            for object in mesh.objects.iter() {
                lines.push(format!(
                    "    {} [{}]: {} vertices, {} indices, {} attributes",
                    object.name,
                    object.sub_index,
                    object.vertex_count,
                    object.vertex_index_count,
                    object.attributes.len()
                ));
            }
            lines.push(format!("  Vertex buffers: {}", mesh.vertex_buffers.len()));
            lines.push(format!("  Rigging groups: {}", mesh.rigging_buffers.len()));
        }
        SsbhFile::Matl(matl) => {
            lines.push(format!("  Materials: {}", matl.entries.len()));
            for entry in matl.entries.iter() {
                lines.push(format!(
                    "    {} ({}): {} parameters",
                    entry.material_label,
                    entry.shader_label,
                    entry.attributes.len()
                ));
            }
        }
        SsbhFile::Skel(skel) => {
            lines.push(format!("  Bones: {}", skel.bone_entries.len()));
            for bone in skel.bone_entries.iter() {
                let parent = skel.parent(bone).map_or("-", |p| p.name.as_str());
                lines.push(format!("    {} <- {}", bone.name, parent));
            }
        }
        SsbhFile::Anim(anim) => {
            lines.push(format!("  Name: {}", anim.name));
            lines.push(format!("  Frames: {}", anim.final_frame_index + 1.0));
            for (group, node, track) in anim.tracks() {
                lines.push(format!(
                    "    {:?} {}/{}: {:?}, {} frames",
                    group.anim_type,
                    node.name,
                    track.name,
                    track.layout(),
                    track.frame_count
                ));
            }
        }
        SsbhFile::Modl(modl) => {
            lines.push(format!("  Model: {}", modl.model_name));
            lines.push(format!("  Skeleton: {}", modl.skeleton_file_name));
            lines.push(format!("  Mesh: {}", modl.mesh_file_name));
            for entry in modl.entries.iter() {
                lines.push(format!(
                    "    {} [{}] -> {}",
                    entry.mesh_name, entry.sub_index, entry.material_label
                ));
            }
        }
    }
    lines
}
