use rand::rngs::StdRng;
use rand::SeedableRng;
use trollify::consent::{ConsentStore, MemoryConsentStore};
use trollify::model::Field;
use trollify::rendering::node::Role;
use trollify::{Editor, Error, Font, SessionConfig, Theme};

fn accepted() -> SessionConfig {
    SessionConfig { policies_accepted: true, ..SessionConfig::default() }
}

#[test]
fn consent_is_read_from_the_store() {
    let store = MemoryConsentStore::default();
    let cfg = SessionConfig::default().with_consent(&store).unwrap();
    assert!(Editor::new(cfg, "twitter").unwrap().needs_consent());

    store.store(true).unwrap();
    let cfg = SessionConfig::default().with_consent(&store).unwrap();
    assert!(!Editor::new(cfg, "twitter").unwrap().needs_consent());
}

#[test]
fn switching_platform_resets_template_and_keeps_content() {
    let mut e = Editor::new(accepted(), "twitter").unwrap();
    e.select_template("post-with-comments").unwrap();
    e.set_field(Field::DisplayName, "Grace");

    e.set_platform("instagram");
    assert_eq!(e.template().unwrap().id, "image-post");
    assert_eq!(e.post().display_name, "Grace");

    e.set_platform("facebook");
    assert_eq!(e.template().unwrap().id, "text-post");
}

#[test]
fn x_is_an_alias_for_twitter() {
    let e = Editor::new(accepted(), "x").unwrap();
    assert_eq!(e.platform(), Some(trollify::Platform::Twitter));
    assert_eq!(e.templates().len(), 5);
}

#[test]
fn theme_must_belong_to_platform() {
    let mut e = Editor::new(accepted(), "facebook").unwrap();
    e.set_theme("light").unwrap();
    assert_eq!(e.theme(), Theme::Light);
    assert!(matches!(e.set_theme("sepia"), Err(Error::UnknownTheme(_))));
    assert_eq!(e.theme(), Theme::Light);
}

#[test]
fn font_selection() {
    let mut e = Editor::new(accepted(), "twitter").unwrap();
    e.set_font("Open Sans").unwrap();
    assert_eq!(e.font(), Font::OpenSans);
    assert_eq!(e.preview().unwrap().font, Font::OpenSans);
    assert!(matches!(e.set_font("Comic Sans"), Err(Error::UnknownFont(_))));
}

#[test]
fn counter_input_is_coerced() {
    let mut e = Editor::new(accepted(), "twitter").unwrap();
    e.set_field(Field::Likes, "abc");
    assert_eq!(e.post().likes, 0);
    e.set_field(Field::Likes, "-12");
    assert_eq!(e.post().likes, 0);
    e.set_field(Field::Likes, "77 likes");
    assert_eq!(e.post().likes, 77);
    e.set_field_by_name("comment.likes", "3").unwrap();
    assert_eq!(e.comment().likes, 3);
    assert!(matches!(e.set_field_by_name("retweets", "1"), Err(Error::UnknownField(_))));
}

#[test]
fn verified_flag_toggles_badge() {
    let mut e = Editor::new(accepted(), "twitter").unwrap();
    assert!(!e.preview().unwrap().contains(Role::Badge));
    e.set_field(Field::Verified, "true");
    assert!(e.preview().unwrap().contains(Role::Badge));
    e.set_field(Field::Verified, "false");
    assert!(!e.preview().unwrap().contains(Role::Badge));
}

#[test]
fn randomize_changes_counters() {
    let mut e = Editor::new(accepted(), "twitter").unwrap();
    let before = e.post().clone();
    let mut rng = StdRng::seed_from_u64(42);
    let changed = (0..5).any(|_| {
        e.randomize_engagement_with(&mut rng);
        e.post().likes != before.likes || e.post().comments != before.comments
    });
    assert!(changed);
    assert_eq!(e.post().display_name, before.display_name);
}

#[test]
fn edits_show_up_in_preview_text() {
    let mut e = Editor::new(accepted(), "twitter").unwrap();
    e.set_field(Field::PostText, "hello there");
    let tree = e.preview().unwrap();
    assert_eq!(tree.find(Role::PostText).unwrap().text_content(), "hello there");
}
