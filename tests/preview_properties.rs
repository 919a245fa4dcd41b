use trollify::catalog::{Platform, TemplateKind};
use trollify::model::{CommentModel, ImageData, PostModel};
use trollify::rendering::node::Role;
use trollify::rendering::preview::{render, render_preview};
use trollify::{Font, Theme};

fn picture() -> ImageData {
    ImageData::from_rgba(image::RgbaImage::from_pixel(20, 10, image::Rgba([200, 30, 30, 255])))
}

fn post_with_image() -> PostModel {
    PostModel { post_image: Some(picture()), ..PostModel::default() }
}

#[test]
fn every_template_draws_exactly_its_sections() {
    let post = post_with_image();
    let comment = CommentModel::default();
    for platform in Platform::ALL {
        for entry in platform.templates() {
            let tree = render(platform, entry, &post, &comment, Theme::Light, Font::Arial);
            let s = entry.kind.sections();
            assert_eq!(tree.contains(Role::Engagement), s.post, "{} {}", platform, entry.id);
            assert_eq!(tree.contains(Role::PostText), s.text, "{} {}", platform, entry.id);
            assert_eq!(tree.contains(Role::PostImage), s.image, "{} {}", platform, entry.id);
            assert_eq!(tree.contains(Role::CommentBlock), s.comment, "{} {}", platform, entry.id);
        }
    }
}

#[test]
fn text_template_hides_uploaded_image() {
    let tree = render_preview("twitter", "text-post", &post_with_image(), &CommentModel::default(), Theme::Dark, Font::Arial)
        .unwrap();
    assert!(!tree.contains(Role::PostImage));
    assert!(tree.contains(Role::PostText));
}

#[test]
fn image_template_without_image_has_no_image_node() {
    let tree = render_preview("instagram", "image-post", &PostModel::default(), &CommentModel::default(), Theme::Dark, Font::Arial)
        .unwrap();
    assert!(!tree.contains(Role::PostImage));
    assert!(tree.contains(Role::Likes));
}

#[test]
fn unverified_never_shows_badge() {
    let post = PostModel::default();
    let comment = CommentModel::default();
    for platform in Platform::ALL {
        for entry in platform.templates() {
            let tree = render(platform, entry, &post, &comment, Theme::Dark, Font::Roboto);
            assert_eq!(tree.count(Role::Badge), 0, "{} {}", platform, entry.id);
        }
    }
}

#[test]
fn verified_post_and_comment_each_get_a_badge() {
    let post = PostModel { verified: true, ..PostModel::default() };
    let comment = CommentModel { verified: true, ..CommentModel::default() };
    for platform in Platform::ALL {
        let entry = platform.template("post-with-comments").unwrap();
        let tree = render(platform, entry, &post, &comment, Theme::Light, Font::Arial);
        assert_eq!(tree.count(Role::Badge), 2, "{}", platform);
    }
}

#[test]
fn placeholder_initial_comes_from_display_name() {
    let post = PostModel { display_name: "zoe q".into(), ..PostModel::default() };
    let tree = render_preview("facebook", "text-post", &post, &CommentModel::default(), Theme::Light, Font::Arial).unwrap();
    assert!(tree.outline().contains("Avatar: initial 'Z'"));

    let anon = PostModel { display_name: String::new(), ..PostModel::default() };
    let tree = render_preview("facebook", "text-post", &anon, &CommentModel::default(), Theme::Light, Font::Arial).unwrap();
    assert!(tree.outline().contains("Avatar: initial '?'"));
}

#[test]
fn uploaded_profile_picture_replaces_initial() {
    let post = PostModel { profile_image: Some(picture()), ..PostModel::default() };
    let tree = render_preview("twitter", "text-post", &post, &CommentModel::default(), Theme::Light, Font::Arial).unwrap();
    assert!(tree.outline().contains("Avatar: picture"));
}

#[test]
fn comment_block_follows_post_content() {
    let tree = render_preview(
        "facebook",
        "post-with-comments",
        &PostModel::default(),
        &CommentModel::default(),
        Theme::Dark,
        Font::Arial,
    )
    .unwrap();
    assert_eq!(tree.root.children.last().map(|n| n.role), Some(Role::CommentBlock));
}

#[test]
fn font_is_recorded_on_the_tree_only() {
    let a = render_preview("twitter", "text-post", &PostModel::default(), &CommentModel::default(), Theme::Dark, Font::Arial)
        .unwrap();
    let b = render_preview("twitter", "text-post", &PostModel::default(), &CommentModel::default(), Theme::Dark, Font::Montserrat)
        .unwrap();
    assert_eq!(a.root, b.root);
    assert_eq!(b.font, Font::Montserrat);
}

#[test]
fn comment_kind_is_standalone() {
    assert!(!TemplateKind::CommentOnly.sections().post);
    let tree = render_preview("instagram", "comment", &PostModel::default(), &CommentModel::default(), Theme::Dark, Font::Arial)
        .unwrap();
    assert_eq!(tree.root.children.len(), 1);
    assert!(!tree.contains(Role::Header));
}
