//! Static template, theme and font catalog per platform.
//!
//! Everything here is lookup data. The one piece of logic is
//! [`TemplateKind::sections`], which both the editor (what to show as
//! editable) and the preview renderer (what to draw) consult.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Facebook, Platform::Instagram];

    /// Parse a platform identifier. `x` is accepted as an alias for twitter.
    pub fn parse(id: &str) -> Option<Platform> {
        match id.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Some(Platform::Twitter),
            "facebook" => Some(Platform::Facebook),
            "instagram" => Some(Platform::Instagram),
            _ => None,
        }
    }

    /// Identifier used in routes and export file names
    pub fn id(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Twitter => "X (Twitter)",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
        }
    }

    pub fn templates(self) -> &'static [TemplateEntry] {
        match self {
            Platform::Twitter => TWITTER_TEMPLATES,
            Platform::Facebook => FACEBOOK_TEMPLATES,
            Platform::Instagram => INSTAGRAM_TEMPLATES,
        }
    }

    pub fn themes(self) -> &'static [Theme] {
        match self {
            Platform::Twitter => &[Theme::Dark, Theme::Light],
            Platform::Facebook | Platform::Instagram => &[Theme::Light, Theme::Dark],
        }
    }

    /// Look up one of this platform's templates by id
    pub fn template(self, id: &str) -> Option<&'static TemplateEntry> {
        self.templates().iter().find(|t| t.id == id)
    }
}

impl std::str::FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Platform::parse(s).ok_or_else(|| crate::Error::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Structural variant of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Text,
    Image,
    TextImage,
    CommentOnly,
    PostWithComments,
}

/// Which regions a template kind draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections {
    /// Header, engagement row and the post container
    pub post: bool,
    pub text: bool,
    pub image: bool,
    pub comment: bool,
}

impl TemplateKind {
    pub fn sections(self) -> Sections {
        match self {
            TemplateKind::Text => Sections { post: true, text: true, image: false, comment: false },
            TemplateKind::Image => Sections { post: true, text: false, image: true, comment: false },
            TemplateKind::TextImage => Sections { post: true, text: true, image: true, comment: false },
            TemplateKind::CommentOnly => Sections { post: false, text: false, image: false, comment: true },
            TemplateKind::PostWithComments => Sections { post: true, text: true, image: true, comment: true },
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            TemplateKind::Text => "text",
            TemplateKind::Image => "image",
            TemplateKind::TextImage => "text-image",
            TemplateKind::CommentOnly => "comment-only",
            TemplateKind::PostWithComments => "post-with-comments",
        }
    }
}

/// One selectable template variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub kind: TemplateKind,
}

const fn entry(id: &'static str, display_name: &'static str, kind: TemplateKind) -> TemplateEntry {
    TemplateEntry { id, display_name, kind }
}

const TWITTER_TEMPLATES: &[TemplateEntry] = &[
    entry("text-post", "Text Post", TemplateKind::Text),
    entry("image-post", "Image Post", TemplateKind::Image),
    entry("text-image-post", "Text + Image Post", TemplateKind::TextImage),
    entry("comment", "Reply", TemplateKind::CommentOnly),
    entry("post-with-comments", "Post + Reply", TemplateKind::PostWithComments),
];

const FACEBOOK_TEMPLATES: &[TemplateEntry] = &[
    entry("text-post", "Text Post", TemplateKind::Text),
    entry("image-post", "Image Post", TemplateKind::Image),
    entry("text-image-post", "Text + Image Post", TemplateKind::TextImage),
    entry("comment", "Comment", TemplateKind::CommentOnly),
    entry("post-with-comments", "Post + Comments", TemplateKind::PostWithComments),
];

const INSTAGRAM_TEMPLATES: &[TemplateEntry] = &[
    entry("image-post", "Image Post", TemplateKind::Image),
    entry("text-image-post", "Text + Image Post", TemplateKind::TextImage),
    entry("comment", "Comment", TemplateKind::CommentOnly),
    entry("post-with-comments", "Post + Comments", TemplateKind::PostWithComments),
];

/// Ordered templates for a platform id; unknown platforms get an empty list.
pub fn templates_for(platform_id: &str) -> &'static [TemplateEntry] {
    Platform::parse(platform_id).map(Platform::templates).unwrap_or(&[])
}

/// Ordered theme names for a platform id; unknown platforms only get Light.
pub fn themes_for(platform_id: &str) -> &'static [Theme] {
    Platform::parse(platform_id).map(Platform::themes).unwrap_or(&[Theme::Light])
}

/// Color scheme of the rendered post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn parse(name: &str) -> Option<Theme> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Font family applied to the whole preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Font {
    Arial,
    Helvetica,
    Roboto,
    #[serde(rename = "Open Sans")]
    OpenSans,
    Montserrat,
}

pub const FONTS: [Font; 5] = [Font::Arial, Font::Helvetica, Font::Roboto, Font::OpenSans, Font::Montserrat];

impl Font {
    pub fn parse(name: &str) -> Option<Font> {
        FONTS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Font::Arial => "Arial",
            Font::Helvetica => "Helvetica",
            Font::Roboto => "Roboto",
            Font::OpenSans => "Open Sans",
            Font::Montserrat => "Montserrat",
        }
    }

    /// Extra horizontal spacing (in px) between glyphs for this family
    pub fn tracking(self) -> u32 {
        match self {
            Font::Arial | Font::Helvetica | Font::Roboto => 1,
            Font::OpenSans | Font::Montserrat => 2,
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_has_no_templates() {
        assert!(templates_for("myspace").is_empty());
        assert_eq!(themes_for("myspace"), &[Theme::Light]);
        assert!(matches!("myspace".parse::<Platform>(), Err(crate::Error::UnknownPlatform(_))));
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
    }

    #[test]
    fn platform_catalog_order() {
        assert_eq!(templates_for("twitter")[0].id, "text-post");
        assert_eq!(templates_for("instagram")[0].id, "image-post");
        assert_eq!(themes_for("twitter")[0], Theme::Dark);
        assert_eq!(themes_for("facebook")[0], Theme::Light);
        assert_eq!(Platform::parse("X"), Some(Platform::Twitter));
    }

    #[test]
    fn text_kind_never_draws_image() {
        let s = TemplateKind::Text.sections();
        assert!(s.text && !s.image && !s.comment);
        let s = TemplateKind::CommentOnly.sections();
        assert!(!s.post && s.comment);
    }

    #[test]
    fn font_parse_is_case_insensitive() {
        assert_eq!(Font::parse("open sans"), Some(Font::OpenSans));
        assert_eq!(Font::parse("Comic Sans"), None);
    }
}
