//! Image info command.
//!
//! Displays size, native colorspace, comment and thumbnail tags.

use crate::InfoArgs;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::trace;

/// One file's info, as printed by `--json`.
#[derive(Serialize)]
struct Info {
    file: String,
    width: u32,
    height: u32,
    colorspace: String,
    size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<ThumbInfo>,
}

#[derive(Serialize)]
struct ThumbInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    mtime: u64,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    mimetype: Option<String>,
}

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    let mut infos = Vec::with_capacity(args.input.len());
    for path in &args.input {
        trace!(input = %path.display(), "info::run");
        infos.push(collect(path)?);
    }

    if args.json {
        let json = if infos.len() == 1 {
            serde_json::to_string_pretty(&infos[0])
        } else {
            serde_json::to_string_pretty(&infos)
        }
        .context("Failed to serialize info")?;
        println!("{json}");
        return Ok(());
    }

    for (i, info) in infos.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_text(info, verbose);
    }
    Ok(())
}

fn collect(path: &Path) -> Result<Info> {
    let size_bytes = fs::metadata(path)
        .with_context(|| format!("Failed to stat: {}", path.display()))?
        .len();
    let img = super::open_image(path)?;
    let (width, height) = img.original_size();

    let tags = img.thumbnail_info();
    let thumbnail = (!tags.is_empty()).then(|| ThumbInfo {
        uri: tags.uri.clone(),
        mtime: tags.mtime,
        width: tags.width,
        height: tags.height,
        mimetype: tags.mimetype.clone(),
    });

    Ok(Info {
        file: path.display().to_string(),
        width,
        height,
        colorspace: img.native_colorspace().to_string(),
        size_bytes,
        comment: img.comment().map(str::to_owned),
        thumbnail,
    })
}

fn print_text(info: &Info, verbose: u8) {
    println!("{}", info.file);
    println!("  Resolution: {}x{}", info.width, info.height);
    println!("  Colorspace: {}", info.colorspace);
    println!("  File size:  {}", super::format_size(info.size_bytes));
    if verbose > 0 {
        println!("  Pixels:     {}", info.width as u64 * info.height as u64);
    }
    if let Some(comment) = &info.comment {
        println!("  Comment:    {}", comment);
    }
    if let Some(thumb) = &info.thumbnail {
        println!("  Thumbnail of:");
        if let Some(uri) = &thumb.uri {
            println!("    URI:      {}", uri);
        }
        if thumb.mtime != 0 {
            println!("    MTime:    {}", thumb.mtime);
        }
        println!("    Size:     {}x{}", thumb.width, thumb.height);
        if let Some(mime) = &thumb.mimetype {
            println!("    Mimetype: {}", mime);
        }
    }
}
