//! Visual tree produced by the preview renderer.
//!
//! Nodes carry a semantic [`Role`] so callers (and tests) can ask what a
//! preview contains without inspecting pixels.

use crate::catalog::Font;
use crate::model::ImageData;
use std::fmt;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 255,
        }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear blend towards `other`, `t` in 0..=1
    pub fn mix(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }
}

/// Tailwind-ish palette used by the platform styles
pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::rgb(0x000000);
    pub const WHITE: Color = Color::rgb(0xffffff);
    pub const GRAY_200: Color = Color::rgb(0xe5e7eb);
    pub const GRAY_300: Color = Color::rgb(0xd1d5db);
    pub const GRAY_400: Color = Color::rgb(0x9ca3af);
    pub const GRAY_500: Color = Color::rgb(0x6b7280);
    pub const GRAY_600: Color = Color::rgb(0x4b5563);
    pub const GRAY_700: Color = Color::rgb(0x374151);
    pub const GRAY_800: Color = Color::rgb(0x1f2937);
    pub const GRAY_900: Color = Color::rgb(0x111827);
    pub const BLUE_500: Color = Color::rgb(0x3b82f6);
    pub const PURPLE_500: Color = Color::rgb(0xa855f7);
    pub const PINK_500: Color = Color::rgb(0xec4899);
    pub const RED_500: Color = Color::rgb(0xef4444);
}

/// What a node represents in the post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Card,
    Header,
    Avatar,
    DisplayName,
    Username,
    Badge,
    Handle,
    Timestamp,
    Menu,
    PostText,
    PostImage,
    Engagement,
    Likes,
    Comments,
    Shares,
    Bookmark,
    Caption,
    CommentBlock,
    CommentAuthor,
    CommentText,
    CommentLikes,
    Group,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Small pictograms used in headers and engagement rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Verified,
    Reply,
    Repost,
    Heart,
    Share,
    ThumbsUp,
    Forward,
    Bookmark,
    More,
}

impl Icon {
    /// The emoji the icon stands in for, used in text outlines
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Verified => "✓",
            Icon::Reply => "💬",
            Icon::Repost => "🔄",
            Icon::Heart => "❤️",
            Icon::Share => "📤",
            Icon::ThumbsUp => "👍",
            Icon::Forward => "↗️",
            Icon::Bookmark => "🔖",
            Icon::More => "⋯",
        }
    }
}

/// Text size as an integer scale of the base 5x7 glyph cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSize {
    Small,
    Normal,
    Large,
}

impl TextSize {
    pub fn scale(self) -> u32 {
        match self {
            TextSize::Small => 1,
            TextSize::Normal => 2,
            TextSize::Large => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Row,
    Column,
}

/// Box styling; only what the platform templates need
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub background: Option<Color>,
    pub border: Option<Color>,
    /// Draw only the top edge of the border
    pub border_top_only: bool,
    pub radius: u32,
    pub padding: u32,
    pub gap: u32,
    /// Take the remaining main-axis space in a row
    pub grow: bool,
    /// Vertically center children of a row
    pub center: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub color: Color,
    pub size: TextSize,
    pub bold: bool,
}

/// Circular profile picture, or a letter badge when no image is set
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub image: Option<ImageData>,
    pub initial: char,
    pub size: u32,
    pub fill: Color,
    pub initial_color: Color,
    /// Gradient ring drawn around the avatar (start, end)
    pub ring: Option<(Color, Color)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container(Direction),
    Text(TextRun),
    Icon { icon: Icon, color: Color, size: TextSize },
    Image { image: ImageData, square: bool, radius: u32 },
    Avatar(Avatar),
    Spacer,
}

/// One element of the visual tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub role: Role,
    pub kind: NodeKind,
    pub style: Style,
    pub children: Vec<Node>,
}

/// A rendered preview: the card tree plus subtree-wide properties
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    pub root: Node,
    pub font: Font,
    /// Layout width of the card in CSS pixels
    pub width: u32,
    /// Theme base color, used as the snapshot background
    pub background: Color,
}

impl Node {
    pub fn row(role: Role, style: Style, children: Vec<Node>) -> Self {
        Self { role, kind: NodeKind::Container(Direction::Row), style, children }
    }

    pub fn column(role: Role, style: Style, children: Vec<Node>) -> Self {
        Self { role, kind: NodeKind::Container(Direction::Column), style, children }
    }

    pub fn text(role: Role, text: impl Into<String>, color: Color, size: TextSize, bold: bool) -> Self {
        Self {
            role,
            kind: NodeKind::Text(TextRun { text: text.into(), color, size, bold }),
            style: Style::default(),
            children: Vec::new(),
        }
    }

    pub fn icon(role: Role, icon: Icon, color: Color, size: TextSize) -> Self {
        Self { role, kind: NodeKind::Icon { icon, color, size }, style: Style::default(), children: Vec::new() }
    }

    pub fn image(image: ImageData, square: bool, radius: u32) -> Self {
        Self {
            role: Role::PostImage,
            kind: NodeKind::Image { image, square, radius },
            style: Style::default(),
            children: Vec::new(),
        }
    }

    pub fn avatar(avatar: Avatar) -> Self {
        Self { role: Role::Avatar, kind: NodeKind::Avatar(avatar), style: Style::default(), children: Vec::new() }
    }

    pub fn spacer() -> Self {
        Self {
            role: Role::Group,
            kind: NodeKind::Spacer,
            style: Style { grow: true, ..Style::default() },
            children: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Depth-first search for the first node with `role`
    pub fn find(&self, role: Role) -> Option<&Node> {
        if self.role == role {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(role))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.find(role).is_some()
    }

    pub fn count(&self, role: Role) -> usize {
        let own = usize::from(self.role == role);
        own + self.children.iter().map(|c| c.count(role)).sum::<usize>()
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(run) => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&run.text);
            }
            NodeKind::Icon { icon, .. } => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(icon.glyph());
            }
            _ => {}
        }
        for c in &self.children {
            c.collect_text(out);
        }
    }

    /// Indented, line-per-node description of the tree
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let detail = match &self.kind {
            NodeKind::Container(Direction::Row) => "row".to_string(),
            NodeKind::Container(Direction::Column) => "column".to_string(),
            NodeKind::Text(run) => format!("{:?}", run.text),
            NodeKind::Icon { icon, .. } => icon.glyph().to_string(),
            NodeKind::Image { image, .. } => format!("image {}x{}", image.width(), image.height()),
            NodeKind::Avatar(a) if a.image.is_some() => "picture".to_string(),
            NodeKind::Avatar(a) => format!("initial {:?}", a.initial),
            NodeKind::Spacer => "spacer".to_string(),
        };
        out.push_str(&format!("{}{}: {}\n", indent, self.role, detail));
        for c in &self.children {
            c.write_outline(depth + 1, out);
        }
    }
}

impl VisualTree {
    pub fn find(&self, role: Role) -> Option<&Node> {
        self.root.find(role)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.root.contains(role)
    }

    pub fn count(&self, role: Role) -> usize {
        self.root.count(role)
    }

    pub fn outline(&self) -> String {
        format!("font: {}\n{}", self.font, self.root.outline())
    }
}
