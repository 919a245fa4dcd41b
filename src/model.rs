//! Post and comment data for one editing session

use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

/// A decoded, user-supplied bitmap. Cloning is cheap.
#[derive(Clone, PartialEq)]
pub struct ImageData {
    pixels: Arc<RgbaImage>,
}

impl ImageData {
    /// Decode any supported raster format (PNG, JPEG, GIF, BMP, WebP)
    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_rgba(img.to_rgba8()))
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels: Arc::new(pixels) }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// The post being composed
#[derive(Debug, Clone, PartialEq)]
pub struct PostModel {
    pub username: String,
    pub display_name: String,
    pub handle: String,
    pub post_text: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub followers: String,
    pub following: String,
    pub posts: String,
    pub timestamp: String,
    pub verified: bool,
    pub profile_image: Option<ImageData>,
    pub post_image: Option<ImageData>,
}

impl Default for PostModel {
    fn default() -> Self {
        Self {
            username: "johndoe".to_string(),
            display_name: "John Doe".to_string(),
            handle: "@johndoe".to_string(),
            post_text: "This is a sample post for testing purposes!".to_string(),
            likes: 42,
            comments: 8,
            shares: 3,
            followers: "1.2K".to_string(),
            following: "890".to_string(),
            posts: "156".to_string(),
            timestamp: "2h".to_string(),
            verified: false,
            profile_image: None,
            post_image: None,
        }
    }
}

/// A single comment/reply attached to the post
#[derive(Debug, Clone, PartialEq)]
pub struct CommentModel {
    pub username: String,
    pub display_name: String,
    pub text: String,
    pub timestamp: String,
    pub likes: u64,
    pub verified: bool,
    pub profile_image: Option<ImageData>,
}

impl Default for CommentModel {
    fn default() -> Self {
        Self {
            username: "janedoe".to_string(),
            display_name: "Jane Doe".to_string(),
            text: "Totally agree with this!".to_string(),
            timestamp: "1h".to_string(),
            likes: 5,
            verified: false,
            profile_image: None,
        }
    }
}

/// Editable scalar fields of [`PostModel`] and [`CommentModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    DisplayName,
    Handle,
    PostText,
    Likes,
    Comments,
    Shares,
    Followers,
    Following,
    Posts,
    Timestamp,
    Verified,
    CommentUsername,
    CommentDisplayName,
    CommentText,
    CommentTimestamp,
    CommentLikes,
    CommentVerified,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::Username,
        Field::DisplayName,
        Field::Handle,
        Field::PostText,
        Field::Likes,
        Field::Comments,
        Field::Shares,
        Field::Followers,
        Field::Following,
        Field::Posts,
        Field::Timestamp,
        Field::Verified,
        Field::CommentUsername,
        Field::CommentDisplayName,
        Field::CommentText,
        Field::CommentTimestamp,
        Field::CommentLikes,
        Field::CommentVerified,
    ];

    /// Form name of the field, e.g. `displayName` or `comment.likes`
    pub fn name(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::DisplayName => "displayName",
            Field::Handle => "handle",
            Field::PostText => "postText",
            Field::Likes => "likes",
            Field::Comments => "comments",
            Field::Shares => "shares",
            Field::Followers => "followers",
            Field::Following => "following",
            Field::Posts => "posts",
            Field::Timestamp => "timestamp",
            Field::Verified => "verified",
            Field::CommentUsername => "comment.username",
            Field::CommentDisplayName => "comment.displayName",
            Field::CommentText => "comment.text",
            Field::CommentTimestamp => "comment.timestamp",
            Field::CommentLikes => "comment.likes",
            Field::CommentVerified => "comment.verified",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn is_comment(self) -> bool {
        self.name().starts_with("comment.")
    }
}

/// Coerce form input into a counter: leading digits are kept, anything
/// negative or unparseable becomes 0, and oversized numbers clamp to
/// `u64::MAX`.
pub fn parse_counter(input: &str) -> u64 {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return 0;
    }
    let digits: String = trimmed
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    // only digits remain, so a parse failure means overflow
    digits.parse().unwrap_or(u64::MAX)
}

pub fn parse_flag(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

impl PostModel {
    pub(crate) fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::Username => self.username = value.to_string(),
            Field::DisplayName => self.display_name = value.to_string(),
            Field::Handle => self.handle = value.to_string(),
            Field::PostText => self.post_text = value.to_string(),
            Field::Likes => self.likes = parse_counter(value),
            Field::Comments => self.comments = parse_counter(value),
            Field::Shares => self.shares = parse_counter(value),
            Field::Followers => self.followers = value.to_string(),
            Field::Following => self.following = value.to_string(),
            Field::Posts => self.posts = value.to_string(),
            Field::Timestamp => self.timestamp = value.to_string(),
            Field::Verified => self.verified = parse_flag(value),
            _ => {}
        }
    }
}

impl CommentModel {
    pub(crate) fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::CommentUsername => self.username = value.to_string(),
            Field::CommentDisplayName => self.display_name = value.to_string(),
            Field::CommentText => self.text = value.to_string(),
            Field::CommentTimestamp => self.timestamp = value.to_string(),
            Field::CommentLikes => self.likes = parse_counter(value),
            Field::CommentVerified => self.verified = parse_flag(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_coerce_to_zero() {
        assert_eq!(parse_counter("123"), 123);
        assert_eq!(parse_counter("  77 "), 77);
        assert_eq!(parse_counter("12abc"), 12);
        assert_eq!(parse_counter("-5"), 0);
        assert_eq!(parse_counter("abc"), 0);
        assert_eq!(parse_counter(""), 0);
        assert_eq!(parse_counter("99999999999999999999999"), u64::MAX);
        assert_eq!(parse_counter("18446744073709551615"), u64::MAX);
    }

    #[test]
    fn field_names_roundtrip() {
        for f in Field::ALL {
            assert_eq!(Field::parse(f.name()), Some(f));
        }
        assert!(Field::CommentLikes.is_comment());
        assert!(!Field::Likes.is_comment());
    }

    #[test]
    fn post_set_does_not_derive_handle() {
        let mut p = PostModel::default();
        p.set(Field::Username, "alice");
        assert_eq!(p.username, "alice");
        assert_eq!(p.handle, "@johndoe");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(ImageData::decode(b"not an image").is_err());
    }
}
