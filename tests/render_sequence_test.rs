use iso_preview::{
    Rgba,
    context::Context,
    data_structures::face::Direction,
    flow::{PreviewSequence, render_sequence},
    pipelines::{cuboid::CuboidProjector, mesh::MeshProjector},
    render::{DrawOrder, composite},
    resources::{load_mesh_model, load_model, load_model_json, load_model_obj},
};

use crate::common::test_utils::{BLUE, GREEN, MemoryAssets, RED, Recorder, solid, strip};

mod common;

const CUBE_ALL: &str = r#"{"parent":"block/cube_all","textures":{"all":"minecraft:block/stone"}}"#;

#[tokio::test]
async fn should_render_single_frame_for_still_cube() {
    let assets = MemoryAssets::new()
        .model("block/stone", CUBE_ALL)
        .model("block/cube_all", r#"{"parent":"block/cube"}"#)
        .model("block/cube", r#"{"parent":"builtin/missing"}"#)
        .texture("block/stone", &solid(16, 16, GREEN));
    let ctx = Context::default();

    let model = load_model("block/stone", &assets, &ctx).await;
    assert_eq!(model.descriptor.elements()[0].faces.len(), 6);

    let frames = render_sequence(&model, &ctx);
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(frame.dimensions(), (64, 64));
    assert_eq!(frame.get_pixel(0, 0)[3], 0);
    // top face is full bright, east face is shaded
    assert_eq!(*frame.get_pixel(32, 32), GREEN);
    assert_eq!(*frame.get_pixel(43, 42), Rgba([0, 200, 0, 255]));
}

#[tokio::test]
async fn should_step_through_stacked_frames_without_metadata() {
    let assets = MemoryAssets::new().texture("block/magma", &strip(16, &[RED, GREEN, BLUE]));
    let ctx = Context::default();

    let model = load_model_json("block/magma", r#"{"textures":{"all":"block/magma"}}"#, &assets, &ctx).await;
    let texture = model.textures.get("block/magma").unwrap();
    assert!(texture.animated);
    assert_eq!(texture.physical_frames(), 3);
    assert_eq!(texture.total_duration(), 3);

    let frames = render_sequence(&model, &ctx);
    assert_eq!(frames.len(), 3);
    for (frame, colour) in frames.iter().zip([RED, GREEN, BLUE]) {
        assert_eq!(*frame.get_pixel(32, 32), colour);
    }
}

#[tokio::test]
async fn should_follow_animation_metadata() {
    let assets = MemoryAssets::new()
        .texture("block/lamp", &strip(16, &[RED, GREEN]))
        .metadata("block/lamp", r#"{"animation":{"frametime":2,"frames":[1,{"index":0,"time":1}]}}"#);
    let ctx = Context::default();

    let model = load_model_json("block/lamp", r#"{"textures":{"all":"block/lamp"}}"#, &assets, &ctx).await;
    let frames = render_sequence(&model, &ctx);
    let centres: Vec<_> = frames.iter().map(|f| *f.get_pixel(32, 32)).collect();
    assert_eq!(centres, vec![GREEN, GREEN, RED]);
}

#[tokio::test]
async fn should_loop_over_lcm_of_animation_lengths() {
    let assets = MemoryAssets::new()
        .texture("block/three", &strip(16, &[RED, GREEN, BLUE]))
        .texture("block/four", &strip(16, &[RED, GREEN, BLUE, RED]));
    let json = r#"{"textures":{"top":"block/three","side":"block/four"}}"#;
    let ctx = Context::default();

    let model = load_model_json("block/mixed", json, &assets, &ctx).await;
    assert_eq!(model.textures.loop_ticks(), 12);

    let preview = PreviewSequence::render(&model, &ctx);
    assert_eq!(preview.len(), 12);
    assert_eq!(preview.duration_millis(), 600);
    assert_ne!(preview.frames[0], preview.frames[1]);
}

#[tokio::test]
async fn should_truncate_overlong_animation_loop() {
    let assets = MemoryAssets::new()
        .texture("block/slow", &strip(16, &[RED, GREEN, BLUE]))
        .metadata("block/slow", r#"{"animation":{"frametime":1000000000}}"#);
    let ctx = Context {
        max_loop_ticks: 4,
        output_size: 1,
        ..Context::default()
    };

    let model = load_model_json("block/slow", r#"{"textures":{"all":"block/slow"}}"#, &assets, &ctx).await;
    assert_eq!(model.textures.loop_ticks(), 3_000_000_000);
    assert_eq!(render_sequence(&model, &ctx).len(), 4);
}

#[tokio::test]
async fn should_blend_translucent_item_once_per_pixel() {
    let glass = Rgba([255, 0, 0, 128]);
    let assets = MemoryAssets::new().texture("item/glass_pane", &solid(16, 16, glass));
    let json = r#"{"parent":"builtin/generated","textures":{"layer0":"item/glass_pane"}}"#;
    let ctx = Context::default();

    let model = load_model_json("item/glass_pane", json, &assets, &ctx).await;
    assert!(model.descriptor.flat_item);
    let frames = render_sequence(&model, &ctx);
    assert!(frames[0].pixels().all(|p| *p == glass));
}

#[tokio::test]
async fn should_draw_faces_back_to_front() {
    let assets = MemoryAssets::new().texture("block/stone", &solid(16, 16, GREEN));
    let json = r##"{"textures":{"all":"block/stone"},"elements":[
        {"from":[0,0,0],"to":[8,8,8],"faces":{"up":{"texture":"#all"},"south":{"texture":"#all"}}},
        {"from":[8,8,8],"to":[16,16,16],"faces":{"down":{"texture":"#all"},"east":{"texture":"#all"}}}
    ]}"##;
    let ctx = Context::default();

    let model = load_model_json("block/steps", json, &assets, &ctx).await;
    let projector = CuboidProjector::new(&model.descriptor, &model.textures, &ctx);
    assert_eq!(projector.camera().draw_order(), DrawOrder::DepthSorted);

    let mut recorder = Recorder::default();
    composite(projector.queue(0), DrawOrder::DepthSorted, &mut recorder);
    let depths: Vec<f32> = recorder.draws.iter().map(|(_, depth, _)| *depth).collect();
    assert_eq!(depths.len(), 4);
    assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(recorder.draws.last().unwrap().0, Direction::East.shade());
}

const OBJ: &str = "mtllib cog.mtl
o cog
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl known
f 1/1 2/2 3/3 4/4
usemtl unknown
f 1/1 3/3 4/4
";

const MTL: &str = "newmtl known
map_Kd cog.png

newmtl unknown
map_Kd nothing.png
";

#[tokio::test]
async fn should_keep_unmatched_mesh_faces_in_gray() {
    let assets = MemoryAssets::new().texture("create:block/cog", &solid(4, 4, RED));
    let ctx = Context::default();

    let model = load_model_obj("create:cog", OBJ, MTL, "create", &assets, &ctx)
        .await
        .unwrap();
    assert!(model.descriptor.is_mesh());
    assert!(model.textures.contains("cog.png"));
    assert!(!model.textures.contains("nothing.png"));

    let mesh = model.descriptor.mesh().unwrap();
    let projector = MeshProjector::new(mesh, &model.textures, ctx.mesh_output_size);
    let mut recorder = Recorder::default();
    composite(projector.queue(), DrawOrder::DepthSorted, &mut recorder);
    assert_eq!(recorder.draws.len(), 2);
    assert!(recorder.draws.iter().any(|(_, _, textured)| *textured));
    assert!(
        recorder
            .draws
            .iter()
            .any(|(tint, _, textured)| !*textured && *tint == Rgba([150, 150, 150, 255]))
    );

    let frames = render_sequence(&model, &ctx);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].dimensions(), (128, 128));
}

#[tokio::test]
async fn should_render_no_frame_for_empty_mesh() {
    let assets = MemoryAssets::new();
    let ctx = Context::default();
    let model = load_model_obj("empty", "", "", "minecraft", &assets, &ctx).await.unwrap();
    assert!(render_sequence(&model, &ctx).is_empty());
}

#[tokio::test]
async fn should_load_mesh_through_provider() {
    let assets = MemoryAssets::new()
        .mesh("create:cog", OBJ, MTL)
        .texture("create:block/cog", &solid(4, 4, RED));
    let ctx = Context::default();
    let model = load_mesh_model("create:cog", &assets, &ctx)
        .await
        .unwrap();
    assert_eq!(model.textures.len(), 1);
    assert_eq!(assets.fetch_count("obj create:cog"), 1);
}
