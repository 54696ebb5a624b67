//! Renders one model from a resource-pack style directory and writes every
//! frame of its loop as a PNG.
//!
//! ```text
//! cargo run --example render_model -- <assets-dir> <model-id> [out-dir] [--obj]
//! ```
//!
//! Set `RUST_LOG=debug` to follow resolution.

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use iso_preview::{
    context::Context,
    flow::PreviewSequence,
    resources::{AssetDir, load_mesh_model, load_model},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let obj = match args.iter().position(|a| a == "--obj") {
        Some(idx) => {
            args.remove(idx);
            true
        }
        None => false,
    };
    let (assets, model_id, out_dir) = match args.as_slice() {
        [assets, model_id] => (assets.clone(), model_id.clone(), PathBuf::from("frames")),
        [assets, model_id, out_dir] => (assets.clone(), model_id.clone(), PathBuf::from(out_dir)),
        _ => bail!("usage: render_model <assets-dir> <model-id> [out-dir] [--obj]"),
    };

    let ctx = Context::default();
    let provider = AssetDir::new(&assets);
    let model = if obj {
        load_mesh_model(&model_id, &provider, &ctx).await?
    } else {
        load_model(&model_id, &provider, &ctx).await
    };

    let preview = PreviewSequence::render(&model, &ctx);
    if preview.is_empty() {
        log::warn!("No preview available for {model_id}");
        return Ok(());
    }

    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;
    for (idx, frame) in preview.frames.iter().enumerate() {
        let path = out_dir.join(format!("frame_{idx:04}.png"));
        frame
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    log::info!(
        "Wrote {} frame(s) ({} ms loop) to {}",
        preview.len(),
        preview.duration_millis(),
        out_dir.display()
    );
    Ok(())
}
