use std::fs;
use std::path::PathBuf;

use trollify::model::{CommentModel, Field, PostModel};
use trollify::rendering::preview::render_preview;
use trollify::rendering::raster::SoftwareRasterizer;
use trollify::rendering::snapshot;
use trollify::{Editor, Exporter, Font, SessionConfig, Theme};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens");
    p.push(name);
    p
}

fn check_golden(name: &str, actual: &str) {
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens").ok();
        fs::write(&expected_path, actual).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path)
        .unwrap_or_else(|e| panic!("missing golden {:?} ({}); run with UPDATE_GOLDENS=1 to create it", expected_path, e));
    assert_eq!(actual.trim_end(), exp.trim_end(), "preview outline changed for {}", name);
}

fn accepted() -> SessionConfig {
    SessionConfig { policies_accepted: true, ..SessionConfig::default() }
}

#[test]
fn golden_twitter_post_with_comments() {
    let cfg = accepted();
    let mut editor = Editor::new(cfg.clone(), "twitter").unwrap();
    editor.select_template("post-with-comments").unwrap();
    editor.set_field(Field::Verified, "true");
    editor.set_field(Field::Likes, "1234");

    let tree = editor.preview().unwrap();
    check_golden("twitter-post-with-comments.outline", &tree.outline());

    let file = editor.export(&Exporter::new(&cfg)).unwrap();
    assert_eq!(file.file_name, "trollify-twitter-post-with-comments.png");
    assert_eq!(file.width, (448 + 2 * 16) * 2);
}

#[test]
fn golden_instagram_light_comment() {
    let comment = CommentModel { likes: 1250, ..CommentModel::default() };
    let tree = render_preview("instagram", "comment", &PostModel::default(), &comment, Theme::Light, Font::Helvetica)
        .unwrap();
    check_golden("instagram-light-comment.outline", &tree.outline());

    let shot = snapshot(&tree, &SoftwareRasterizer, 1, 16).unwrap();
    assert_eq!(shot.width, 384 + 2 * 16);
    let img = image::load_from_memory(&shot.png_data).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn export_is_deterministic() {
    let cfg = accepted();
    let editor = Editor::new(cfg.clone(), "facebook").unwrap();
    let exporter = Exporter::new(&cfg);
    let a = editor.export(&exporter).unwrap();
    let b = editor.export(&exporter).unwrap();
    assert_eq!(a.digest(), b.digest());
    assert_eq!(a.digest(), hex::encode(<sha2::Sha256 as sha2::Digest>::digest(&b.png_data)));
}
