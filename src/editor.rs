//! Editing session: owns the post, comment, template, theme and font, and
//! recomputes the preview from them on demand.

use crate::catalog::{self, Font, Platform, Sections, TemplateEntry, Theme};
use crate::export::{ExportRequest, ExportedImage, Exporter};
use crate::model::{CommentModel, Field, ImageData, PostModel};
use crate::rendering::node::VisualTree;
use crate::rendering::preview;
use crate::{Error, Result, SessionConfig};
use log::{debug, warn};
use rand::Rng;

/// Where an uploaded picture goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    PostImage,
    ProfileImage,
    CommentProfileImage,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 3] = [ImageSlot::PostImage, ImageSlot::ProfileImage, ImageSlot::CommentProfileImage];

    pub fn parse(name: &str) -> Option<ImageSlot> {
        match name {
            "post" | "postImage" => Some(ImageSlot::PostImage),
            "profile" | "profileImage" => Some(ImageSlot::ProfileImage),
            "comment-profile" | "comment.profileImage" => Some(ImageSlot::CommentProfileImage),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageSlot::PostImage => "post",
            ImageSlot::ProfileImage => "profile",
            ImageSlot::CommentProfileImage => "comment-profile",
        }
    }

    fn index(self) -> usize {
        match self {
            ImageSlot::PostImage => 0,
            ImageSlot::ProfileImage => 1,
            ImageSlot::CommentProfileImage => 2,
        }
    }
}

impl std::str::FromStr for ImageSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ImageSlot::parse(s).ok_or_else(|| Error::UnknownSlot(s.to_string()))
    }
}

/// Handle for an in-flight image load; only the newest ticket per slot applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    pub slot: ImageSlot,
    generation: u64,
}

pub struct Editor {
    config: SessionConfig,
    platform_id: String,
    platform: Option<Platform>,
    template: Option<&'static TemplateEntry>,
    post: PostModel,
    comment: CommentModel,
    theme: Theme,
    font: Font,
    generations: [u64; 3],
}

impl Editor {
    /// Start a session for `platform_id` with sample content.
    ///
    /// Unknown platforms are not an error: the session simply has no
    /// templates and renders nothing.
    pub fn new(config: SessionConfig, platform_id: &str) -> Result<Self> {
        config.validate()?;
        let theme = config.default_theme;
        let font = config.default_font;
        let mut editor = Self {
            config,
            platform_id: String::new(),
            platform: None,
            template: None,
            post: PostModel::default(),
            comment: CommentModel::default(),
            theme,
            font,
            generations: [0; 3],
        };
        editor.set_platform(platform_id);
        Ok(editor)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The consent prompt should be shown before any content is created
    pub fn needs_consent(&self) -> bool {
        !self.config.policies_accepted
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    pub fn template(&self) -> Option<&'static TemplateEntry> {
        self.template
    }

    pub fn templates(&self) -> &'static [TemplateEntry] {
        catalog::templates_for(&self.platform_id)
    }

    pub fn themes(&self) -> &'static [Theme] {
        catalog::themes_for(&self.platform_id)
    }

    pub fn post(&self) -> &PostModel {
        &self.post
    }

    pub fn comment(&self) -> &CommentModel {
        &self.comment
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn font(&self) -> Font {
        self.font
    }

    /// Regions drawn by the active template (all hidden when none is active)
    pub fn sections(&self) -> Sections {
        self.template.map(|t| t.kind.sections()).unwrap_or_default()
    }

    /// Switch platform; the template resets to the platform's first entry
    pub fn set_platform(&mut self, platform_id: &str) {
        self.platform_id = platform_id.trim().to_ascii_lowercase();
        self.platform = Platform::parse(&self.platform_id);
        self.template = self.templates().first();
        if !self.themes().contains(&self.theme) {
            self.theme = self.themes()[0];
        }
        debug!(
            "platform set to {:?}; template {:?}",
            self.platform_id,
            self.template.map(|t| t.id)
        );
    }

    pub fn select_template(&mut self, template_id: &str) -> Result<()> {
        let entry = self.templates().iter().find(|t| t.id == template_id).ok_or_else(|| {
            Error::UnknownTemplate { platform: self.platform_id.clone(), template: template_id.to_string() }
        })?;
        self.template = Some(entry);
        debug!("template set to {}", entry.id);
        Ok(())
    }

    pub fn set_theme(&mut self, name: &str) -> Result<()> {
        let theme = Theme::parse(name)
            .filter(|t| self.themes().contains(t))
            .ok_or_else(|| Error::UnknownTheme(name.to_string()))?;
        self.theme = theme;
        Ok(())
    }

    pub fn set_font(&mut self, name: &str) -> Result<()> {
        self.font = Font::parse(name).ok_or_else(|| Error::UnknownFont(name.to_string()))?;
        Ok(())
    }

    /// Update one field from form input. Counters coerce invalid input to 0.
    pub fn set_field(&mut self, field: Field, value: &str) {
        if field.is_comment() {
            self.comment.set(field, value);
        } else {
            self.post.set(field, value);
        }
        debug!("{} updated", field.name());
    }

    pub fn set_field_by_name(&mut self, name: &str, value: &str) -> Result<()> {
        let field = Field::parse(name).ok_or_else(|| Error::UnknownField(name.to_string()))?;
        self.set_field(field, value);
        Ok(())
    }

    /// Fields worth offering for editing under the active template
    pub fn visible_fields(&self) -> Vec<Field> {
        let s = self.sections();
        Field::ALL
            .iter()
            .copied()
            .filter(|f| match f {
                Field::PostText => s.text,
                f if f.is_comment() => s.comment,
                _ => s.post,
            })
            .collect()
    }

    pub fn randomize_engagement(&mut self) {
        self.randomize_engagement_with(&mut rand::thread_rng());
    }

    /// Draw every counter independently; comment likes only when a comment is shown
    pub fn randomize_engagement_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.post.likes = rng.gen_range(0..10_000);
        self.post.comments = rng.gen_range(0..1_000);
        self.post.shares = rng.gen_range(0..500);
        self.post.followers = format!("{:.1}K", rng.gen_range(0.0..100.0f64));
        self.post.following = rng.gen_range(0..2_000u32).to_string();
        self.post.posts = rng.gen_range(0..500u32).to_string();
        if self.sections().comment {
            self.comment.likes = rng.gen_range(0..100);
        }
        debug!(
            "randomized engagement: likes={} comments={} shares={}",
            self.post.likes, self.post.comments, self.post.shares
        );
    }

    /// Decode and store an image immediately; supersedes any pending load
    pub fn set_image(&mut self, slot: ImageSlot, bytes: &[u8]) -> Result<()> {
        let ticket = self.begin_image_load(slot);
        self.finish_image_load(ticket, ImageData::decode(bytes)).map(|_| ())
    }

    /// Reserve the slot for a decode happening elsewhere
    pub fn begin_image_load(&mut self, slot: ImageSlot) -> ImageTicket {
        let g = &mut self.generations[slot.index()];
        *g += 1;
        ImageTicket { slot, generation: *g }
    }

    /// Apply a finished decode. Returns `Ok(false)` when a newer load for the
    /// same slot has begun since, in which case the result is dropped.
    pub fn finish_image_load(&mut self, ticket: ImageTicket, decoded: Result<ImageData>) -> Result<bool> {
        if self.generations[ticket.slot.index()] != ticket.generation {
            warn!("dropping stale {:?} load (generation {})", ticket.slot, ticket.generation);
            return Ok(false);
        }
        let image = decoded?;
        debug!("{:?} set to {}x{} image", ticket.slot, image.width(), image.height());
        *self.slot_mut(ticket.slot) = Some(image);
        Ok(true)
    }

    pub fn clear_image(&mut self, slot: ImageSlot) {
        self.generations[slot.index()] += 1;
        *self.slot_mut(slot) = None;
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&ImageData> {
        match slot {
            ImageSlot::PostImage => self.post.post_image.as_ref(),
            ImageSlot::ProfileImage => self.post.profile_image.as_ref(),
            ImageSlot::CommentProfileImage => self.comment.profile_image.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ImageSlot) -> &mut Option<ImageData> {
        match slot {
            ImageSlot::PostImage => &mut self.post.post_image,
            ImageSlot::ProfileImage => &mut self.post.profile_image,
            ImageSlot::CommentProfileImage => &mut self.comment.profile_image,
        }
    }

    /// Current preview, or `None` when no platform/template is active
    pub fn preview(&self) -> Option<VisualTree> {
        let platform = self.platform?;
        let template = self.template?;
        Some(preview::render(platform, template, &self.post, &self.comment, self.theme, self.font))
    }

    pub fn can_export(&self) -> bool {
        self.platform.is_some() && self.template.is_some()
    }

    /// Capture what an export needs from the current state
    pub fn export_request(&self) -> Result<ExportRequest> {
        let (platform, template) = self.platform.zip(self.template).ok_or(Error::NothingToRender)?;
        let tree = preview::render(platform, template, &self.post, &self.comment, self.theme, self.font);
        Ok(ExportRequest { tree, platform, template_id: template.id })
    }

    pub fn export(&self, exporter: &Exporter) -> Result<ExportedImage> {
        exporter.export(&self.export_request()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn editor(platform: &str) -> Editor {
        Editor::new(SessionConfig::default(), platform).unwrap()
    }

    #[test]
    fn starts_on_first_template() {
        let e = editor("instagram");
        assert_eq!(e.template().unwrap().id, "image-post");
        assert_eq!(e.theme(), Theme::Dark);
        assert!(e.needs_consent());
    }

    #[test]
    fn unknown_platform_renders_nothing() {
        let e = editor("myspace");
        assert!(e.template().is_none());
        assert!(e.preview().is_none());
        assert!(!e.can_export());
        assert!(matches!(e.export_request(), Err(Error::NothingToRender)));
    }

    #[test]
    fn select_template_must_exist_on_platform() {
        let mut e = editor("instagram");
        assert!(matches!(e.select_template("text-post"), Err(Error::UnknownTemplate { .. })));
        assert_eq!(e.template().unwrap().id, "image-post");
    }

    #[test]
    fn visible_fields_follow_kind() {
        let mut e = editor("twitter");
        assert!(e.visible_fields().contains(&Field::PostText));
        e.select_template("image-post").unwrap();
        assert!(!e.visible_fields().contains(&Field::PostText));
        assert!(!e.visible_fields().contains(&Field::CommentText));
        e.select_template("comment").unwrap();
        let fields = e.visible_fields();
        assert!(fields.contains(&Field::CommentText));
        assert!(!fields.contains(&Field::Likes));
    }

    #[test]
    fn seeded_randomize_stays_in_range() {
        let mut e = editor("facebook");
        e.select_template("post-with-comments").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            e.randomize_engagement_with(&mut rng);
            assert!(e.post().likes < 10_000);
            assert!(e.post().comments < 1_000);
            assert!(e.post().shares < 500);
            assert!(e.comment().likes < 100);
            assert!(e.post().followers.ends_with('K'));
            assert!(e.post().following.parse::<u32>().unwrap() < 2_000);
            assert!(e.post().posts.parse::<u32>().unwrap() < 500);
        }
    }

    #[test]
    fn randomize_leaves_comment_alone_without_comment_kind() {
        let mut e = editor("twitter");
        e.randomize_engagement_with(&mut StdRng::seed_from_u64(1));
        assert_eq!(e.comment().likes, CommentModel::default().likes);
    }

    #[test]
    fn slot_names_parse() {
        for slot in ImageSlot::ALL {
            assert_eq!(slot.name().parse::<ImageSlot>().unwrap(), slot);
        }
        assert!(matches!("banner".parse::<ImageSlot>(), Err(Error::UnknownSlot(_))));
    }

    #[test]
    fn stale_image_load_is_dropped() {
        let mut e = editor("twitter");
        let first = e.begin_image_load(ImageSlot::PostImage);
        let second = e.begin_image_load(ImageSlot::PostImage);
        let small = ImageData::from_rgba(image::RgbaImage::new(2, 2));
        let big = ImageData::from_rgba(image::RgbaImage::new(8, 8));
        assert!(e.finish_image_load(second, Ok(big)).unwrap());
        assert!(!e.finish_image_load(first, Ok(small)).unwrap());
        assert_eq!(e.image(ImageSlot::PostImage).unwrap().width(), 8);
    }

    #[test]
    fn decode_failure_keeps_previous_image() {
        let mut e = editor("twitter");
        let ok = e.begin_image_load(ImageSlot::ProfileImage);
        e.finish_image_load(ok, Ok(ImageData::from_rgba(image::RgbaImage::new(3, 3)))).unwrap();
        assert!(matches!(e.set_image(ImageSlot::ProfileImage, b"junk"), Err(Error::ImageDecodeError(_))));
        assert_eq!(e.image(ImageSlot::ProfileImage).unwrap().width(), 3);
    }
}
