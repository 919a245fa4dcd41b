use criterion::{black_box, criterion_group, criterion_main, Criterion};

use trollify::model::{CommentModel, PostModel};
use trollify::rendering::layout::layout_tree;
use trollify::rendering::paint::paint_tree;
use trollify::rendering::preview::render_preview;
use trollify::{Editor, Exporter, Font, SessionConfig, Theme};

fn bench_preview(c: &mut Criterion) {
    let post = PostModel::default();
    let comment = CommentModel::default();

    c.bench_function("render_preview_post_with_comments", |b| {
        b.iter(|| {
            render_preview(
                black_box("facebook"),
                black_box("post-with-comments"),
                &post,
                &comment,
                Theme::Dark,
                Font::Arial,
            )
        })
    });

    let tree = render_preview("twitter", "post-with-comments", &post, &comment, Theme::Dark, Font::Arial)
        .expect("known template");
    c.bench_function("layout_and_paint", |b| {
        b.iter(|| {
            let _ = layout_tree(black_box(&tree));
            let _ = paint_tree(black_box(&tree));
        })
    });
}

fn bench_export(c: &mut Criterion) {
    let cfg = SessionConfig { policies_accepted: true, ..Default::default() };
    let editor = Editor::new(cfg.clone(), "instagram").expect("editor");
    let exporter = Exporter::new(&cfg);

    let mut group = c.benchmark_group("export");
    group.sample_size(10);
    group.bench_function("instagram_image_post_png", |b| {
        b.iter(|| editor.export(&exporter).expect("export"))
    });
    group.finish();
}

criterion_group!(benches, bench_preview, bench_export);
criterion_main!(benches);
