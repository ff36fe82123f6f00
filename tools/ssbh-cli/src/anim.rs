//! Anim command - decode animation tracks

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use ssbh_lib::formats::Anim;
use ssbh_lib::{SsbhFile, TrackFrame, TrackLayout};
use tracing::warn;

use crate::options::{CodecArgs, load};

/// Arguments for the anim command
#[derive(Args)]
pub struct AnimArgs {
    /// Animation file (.nuanmb)
    pub file: PathBuf,

    /// Only decode tracks matching a track name or `node/track`
    #[arg(short, long)]
    pub track: Option<String>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

/// One decoded track
#[derive(Serialize)]
pub struct DecodedTrack<'a> {
    pub node: &'a str,
    pub track: &'a str,
    pub layout: TrackLayout,
    pub frames: Vec<TrackFrame>,
}

/// Execute the anim command
pub fn execute(args: AnimArgs) -> Result<()> {
    let SsbhFile::Anim(anim) = load(&args.file, &args.codec.options())? else {
        bail!("{} is not an animation", args.file.display());
    };

    let tracks = decode_tracks(&anim, args.track.as_deref())?;
    if tracks.is_empty() {
        if let Some(filter) = &args.track {
            bail!("No track matches {:?}", filter);
        }
    }

    let json = serde_json::to_string_pretty(&tracks)?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

/// Decode every track, or those matching `filter`
pub fn decode_tracks<'a>(anim: &'a Anim, filter: Option<&str>) -> Result<Vec<DecodedTrack<'a>>> {
    let decoder = anim.decoder();
    let mut decoded = Vec::new();

    for (_, node, track) in anim.tracks() {
        let path = format!("{}/{}", node.name, track.name);
        if let Some(filter) = filter {
            if filter != track.name.as_str() && filter != path {
                continue;
            }
        }

        let layout = track.layout();
        if !layout.is_supported() {
            warn!("{}: no decoding for flags 0x{:04X}", path, track.flags);
        }
        let frames = decoder
            .decode_track(track)
            .with_context(|| format!("Failed to decode track {}", path))?;

        decoded.push(DecodedTrack {
            node: node.name.as_str(),
            track: track.name.as_str(),
            layout,
            frames,
        });
    }
    Ok(decoded)
}
