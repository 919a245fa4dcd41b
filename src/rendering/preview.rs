//! Preview renderer: (platform, template, post, comment, theme, font) → visual tree.
//!
//! Dispatch happens once per render: the platform picks a [`PlatformStyle`]
//! strategy and the template kind picks its [`Sections`]. Each strategy only
//! decides how a section looks, never whether it is shown.

use crate::catalog::{Font, Platform, Sections, TemplateEntry, Theme};
use crate::model::{CommentModel, ImageData, PostModel};
use crate::rendering::node::{palette, Avatar, Color, Icon, Node, Role, Style, TextSize, VisualTree};

/// Color tokens a theme swaps; layout never depends on them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokens {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    /// Secondary surface (comment bubbles, dividers)
    pub surface: Color,
}

/// Everything a strategy needs for one render
pub struct RenderContext<'a> {
    pub post: &'a PostModel,
    pub comment: &'a CommentModel,
    pub sections: Sections,
    pub tokens: Tokens,
}

/// Per-platform look of a post card
pub trait PlatformStyle: Sync {
    /// Layout width of the card in CSS pixels
    fn card_width(&self) -> u32;

    fn tokens(&self, theme: Theme) -> Tokens;

    /// Full post: header, optional text/image, engagement row
    fn post(&self, ctx: &RenderContext<'_>) -> Vec<Node>;

    /// Comment block, either standalone or appended below the post
    fn comment(&self, ctx: &RenderContext<'_>, standalone: bool) -> Node;

    fn card_style(&self, tokens: &Tokens) -> Style;
}

static TWITTER: TwitterStyle = TwitterStyle;
static FACEBOOK: FacebookStyle = FacebookStyle;
static INSTAGRAM: InstagramStyle = InstagramStyle;

/// Rendering strategy for a platform
pub fn style_for(platform: Platform) -> &'static dyn PlatformStyle {
    match platform {
        Platform::Twitter => &TWITTER,
        Platform::Facebook => &FACEBOOK,
        Platform::Instagram => &INSTAGRAM,
    }
}

/// Snapshot background for a theme
pub fn theme_base(theme: Theme) -> Color {
    match theme {
        Theme::Dark => palette::BLACK,
        Theme::Light => palette::WHITE,
    }
}

/// Render by identifiers. Unknown platform or template ids produce `None`.
pub fn render_preview(
    platform_id: &str,
    template_id: &str,
    post: &PostModel,
    comment: &CommentModel,
    theme: Theme,
    font: Font,
) -> Option<VisualTree> {
    let platform = Platform::parse(platform_id)?;
    let template = platform.template(template_id)?;
    Some(render(platform, template, post, comment, theme, font))
}

/// Render a known (platform, template) pair
pub fn render(
    platform: Platform,
    template: &TemplateEntry,
    post: &PostModel,
    comment: &CommentModel,
    theme: Theme,
    font: Font,
) -> VisualTree {
    let style = style_for(platform);
    let tokens = style.tokens(theme);
    let ctx = RenderContext { post, comment, sections: template.kind.sections(), tokens };

    let mut children = Vec::new();
    if ctx.sections.post {
        children.extend(style.post(&ctx));
    }
    if ctx.sections.comment {
        children.push(style.comment(&ctx, !ctx.sections.post));
    }

    let root = Node::column(Role::Card, style.card_style(&tokens), children);
    VisualTree { root, font, width: style.card_width(), background: theme_base(theme) }
}

/// Uppercased first character of a display name, `?` when empty
pub fn initial_of(display_name: &str) -> char {
    display_name
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

/// Thousands grouping with commas, e.g. `12,345`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn avatar(image: &Option<ImageData>, display_name: &str, size: u32, fill: Color, initial_color: Color) -> Node {
    Node::avatar(Avatar {
        image: image.clone(),
        initial: initial_of(display_name),
        size,
        fill,
        initial_color,
        ring: None,
    })
}

/// Name followed by the badge when verified
fn name_with_badge(role: Role, name: &str, verified: bool, color: Color, size: TextSize) -> Vec<Node> {
    let mut nodes = vec![Node::text(role, name, color, size, true)];
    if verified {
        nodes.push(Node::icon(Role::Badge, Icon::Verified, palette::BLUE_500, size));
    }
    nodes
}

fn counter(role: Role, icon: Icon, value: Option<String>, color: Color, size: TextSize) -> Node {
    let mut children = vec![Node::icon(Role::Group, icon, color, size)];
    if let Some(v) = value {
        children.push(Node::text(Role::Group, v, color, size, false));
    }
    Node::row(role, Style { gap: 4, center: true, ..Style::default() }, children)
}

fn row(gap: u32, children: Vec<Node>) -> Node {
    Node::row(Role::Group, Style { gap, center: true, ..Style::default() }, children)
}

fn post_image(post: &PostModel, sections: Sections, square: bool, radius: u32) -> Option<Node> {
    match (&post.post_image, sections.image) {
        (Some(img), true) => Some(Node::image(img.clone(), square, radius)),
        _ => None,
    }
}

struct TwitterStyle;

impl PlatformStyle for TwitterStyle {
    fn card_width(&self) -> u32 {
        448
    }

    fn tokens(&self, theme: Theme) -> Tokens {
        match theme {
            Theme::Dark => Tokens {
                background: palette::BLACK,
                foreground: palette::WHITE,
                muted: palette::GRAY_500,
                border: palette::GRAY_800,
                surface: palette::GRAY_900,
            },
            Theme::Light => Tokens {
                background: palette::WHITE,
                foreground: palette::BLACK,
                muted: palette::GRAY_600,
                border: palette::GRAY_200,
                surface: palette::GRAY_200,
            },
        }
    }

    fn card_style(&self, t: &Tokens) -> Style {
        Style { background: Some(t.background), border: Some(t.border), radius: 12, padding: 16, ..Style::default() }
    }

    fn post(&self, ctx: &RenderContext<'_>) -> Vec<Node> {
        let p = ctx.post;
        let t = &ctx.tokens;

        let mut header = name_with_badge(Role::DisplayName, &p.display_name, p.verified, t.foreground, TextSize::Normal);
        header.push(Node::text(
            Role::Handle,
            format!("{} · {}", p.handle, p.timestamp),
            t.muted,
            TextSize::Normal,
            false,
        ));

        let mut body = vec![Node::row(Role::Header, Style { gap: 4, center: true, ..Style::default() }, header)];
        if ctx.sections.text {
            body.push(Node::text(Role::PostText, &p.post_text, t.foreground, TextSize::Normal, false));
        }
        body.extend(post_image(p, ctx.sections, false, 16));

        // reply, repost, like, share
        body.push(Node::row(
            Role::Engagement,
            Style { center: true, ..Style::default() },
            vec![
                counter(Role::Comments, Icon::Reply, Some(p.comments.to_string()), t.muted, TextSize::Normal),
                Node::spacer(),
                counter(Role::Shares, Icon::Repost, Some(p.shares.to_string()), t.muted, TextSize::Normal),
                Node::spacer(),
                counter(Role::Likes, Icon::Heart, Some(p.likes.to_string()), t.muted, TextSize::Normal),
                Node::spacer(),
                counter(Role::Group, Icon::Share, None, t.muted, TextSize::Normal),
            ],
        ));

        vec![Node::row(
            Role::Group,
            Style { gap: 12, ..Style::default() },
            vec![
                avatar(&p.profile_image, &p.display_name, 48, palette::GRAY_500, palette::WHITE),
                Node::column(Role::Group, Style { gap: 8, grow: true, ..Style::default() }, body),
            ],
        )]
    }

    fn comment(&self, ctx: &RenderContext<'_>, standalone: bool) -> Node {
        let c = ctx.comment;
        let t = &ctx.tokens;

        let mut header = name_with_badge(Role::CommentAuthor, &c.display_name, c.verified, t.foreground, TextSize::Normal);
        header.push(Node::text(
            Role::Handle,
            format!("@{} · {}", c.username, c.timestamp),
            t.muted,
            TextSize::Normal,
            false,
        ));

        let body = vec![
            row(4, header),
            Node::text(Role::CommentText, &c.text, t.foreground, TextSize::Normal, false),
            counter(Role::CommentLikes, Icon::Heart, Some(c.likes.to_string()), t.muted, TextSize::Normal),
        ];

        Node::row(
            Role::CommentBlock,
            Style {
                border: (!standalone).then_some(t.border),
                border_top_only: true,
                padding: if standalone { 0 } else { 12 },
                gap: 12,
                ..Style::default()
            },
            vec![
                avatar(&c.profile_image, &c.display_name, 40, palette::GRAY_500, palette::WHITE),
                Node::column(Role::Group, Style { gap: 6, grow: true, ..Style::default() }, body),
            ],
        )
    }
}

struct FacebookStyle;

impl PlatformStyle for FacebookStyle {
    fn card_width(&self) -> u32 {
        448
    }

    fn tokens(&self, theme: Theme) -> Tokens {
        match theme {
            Theme::Dark => Tokens {
                background: palette::GRAY_900,
                foreground: palette::WHITE,
                muted: palette::GRAY_400,
                border: palette::GRAY_700,
                surface: palette::GRAY_800,
            },
            Theme::Light => Tokens {
                background: palette::WHITE,
                foreground: palette::BLACK,
                muted: palette::GRAY_600,
                border: palette::GRAY_300,
                surface: palette::GRAY_200,
            },
        }
    }

    fn card_style(&self, t: &Tokens) -> Style {
        Style { background: Some(t.background), border: Some(t.border), radius: 8, ..Style::default() }
    }

    fn post(&self, ctx: &RenderContext<'_>) -> Vec<Node> {
        let p = ctx.post;
        let t = &ctx.tokens;

        let identity = Node::column(
            Role::Group,
            Style { gap: 4, ..Style::default() },
            vec![
                row(4, name_with_badge(Role::DisplayName, &p.display_name, p.verified, t.foreground, TextSize::Normal)),
                Node::text(Role::Timestamp, format!("{} ago", p.timestamp), t.muted, TextSize::Small, false),
            ],
        );
        let header = Node::row(
            Role::Header,
            Style { gap: 12, center: true, ..Style::default() },
            vec![avatar(&p.profile_image, &p.display_name, 40, palette::BLUE_500, palette::WHITE), identity],
        );

        let mut top = vec![header];
        if ctx.sections.text {
            top.push(Node::text(Role::PostText, &p.post_text, t.foreground, TextSize::Normal, false));
        }

        let mut nodes = vec![Node::column(Role::Group, Style { padding: 16, gap: 12, ..Style::default() }, top)];
        nodes.extend(post_image(p, ctx.sections, false, 0));

        // like, comment, share
        nodes.push(Node::row(
            Role::Engagement,
            Style { border: Some(t.surface), border_top_only: true, padding: 12, gap: 16, center: true, ..Style::default() },
            vec![
                counter(Role::Likes, Icon::ThumbsUp, Some(p.likes.to_string()), t.muted, TextSize::Small),
                counter(Role::Comments, Icon::Reply, Some(p.comments.to_string()), t.muted, TextSize::Small),
                counter(Role::Shares, Icon::Forward, Some(p.shares.to_string()), t.muted, TextSize::Small),
            ],
        ));
        nodes
    }

    fn comment(&self, ctx: &RenderContext<'_>, standalone: bool) -> Node {
        let c = ctx.comment;
        let t = &ctx.tokens;

        let bubble = Node::column(
            Role::Group,
            Style { background: Some(t.surface), radius: 16, padding: 8, gap: 4, ..Style::default() },
            vec![
                row(4, name_with_badge(Role::CommentAuthor, &c.display_name, c.verified, t.foreground, TextSize::Small)),
                Node::text(Role::CommentText, &c.text, t.foreground, TextSize::Small, false),
            ],
        );
        let meta = row(
            8,
            vec![
                Node::text(Role::Timestamp, &c.timestamp, t.muted, TextSize::Small, true),
                Node::text(Role::Group, "Like", t.muted, TextSize::Small, true),
                Node::text(Role::Group, "Reply", t.muted, TextSize::Small, true),
                counter(Role::CommentLikes, Icon::ThumbsUp, Some(c.likes.to_string()), t.muted, TextSize::Small),
            ],
        );

        Node::row(
            Role::CommentBlock,
            Style {
                border: (!standalone).then_some(t.surface),
                border_top_only: true,
                padding: 12,
                gap: 8,
                ..Style::default()
            },
            vec![
                avatar(&c.profile_image, &c.display_name, 32, palette::BLUE_500, palette::WHITE),
                Node::column(Role::Group, Style { gap: 4, grow: true, ..Style::default() }, vec![bubble, meta]),
            ],
        )
    }
}

struct InstagramStyle;

impl InstagramStyle {
    fn ring_avatar(image: &Option<ImageData>, display_name: &str, size: u32, t: &Tokens) -> Node {
        Node::avatar(Avatar {
            image: image.clone(),
            initial: initial_of(display_name),
            size,
            fill: t.background,
            initial_color: t.foreground,
            ring: Some((palette::PURPLE_500, palette::PINK_500)),
        })
    }
}

impl PlatformStyle for InstagramStyle {
    fn card_width(&self) -> u32 {
        384
    }

    fn tokens(&self, theme: Theme) -> Tokens {
        match theme {
            Theme::Dark => Tokens {
                background: palette::BLACK,
                foreground: palette::WHITE,
                muted: palette::GRAY_400,
                border: palette::GRAY_800,
                surface: palette::GRAY_900,
            },
            Theme::Light => Tokens {
                background: palette::WHITE,
                foreground: palette::BLACK,
                muted: palette::GRAY_500,
                border: palette::GRAY_200,
                surface: palette::GRAY_200,
            },
        }
    }

    fn card_style(&self, t: &Tokens) -> Style {
        Style { background: Some(t.background), border: Some(t.border), radius: 8, ..Style::default() }
    }

    fn post(&self, ctx: &RenderContext<'_>) -> Vec<Node> {
        let p = ctx.post;
        let t = &ctx.tokens;

        let mut identity = vec![Self::ring_avatar(&p.profile_image, &p.display_name, 32, t)];
        identity.extend(name_with_badge(Role::Username, &p.username, p.verified, t.foreground, TextSize::Small));
        let header = Node::row(
            Role::Header,
            Style { padding: 12, gap: 12, center: true, ..Style::default() },
            vec![row(8, identity), Node::spacer(), Node::icon(Role::Menu, Icon::More, t.foreground, TextSize::Normal)],
        );

        let mut nodes = vec![header];
        nodes.extend(post_image(p, ctx.sections, true, 0));

        // heart, comment, share ... bookmark
        let actions = Node::row(
            Role::Engagement,
            Style { center: true, ..Style::default() },
            vec![
                row(
                    16,
                    vec![
                        Node::icon(Role::Group, Icon::Heart, t.foreground, TextSize::Large),
                        Node::icon(Role::Group, Icon::Reply, t.foreground, TextSize::Large),
                        Node::icon(Role::Group, Icon::Share, t.foreground, TextSize::Large),
                    ],
                ),
                Node::spacer(),
                Node::icon(Role::Bookmark, Icon::Bookmark, t.foreground, TextSize::Large),
            ],
        );

        let mut footer = vec![
            actions,
            Node::text(Role::Likes, format!("{} likes", group_thousands(p.likes)), t.foreground, TextSize::Small, true),
        ];
        if ctx.sections.text {
            footer.push(Node::row(
                Role::Caption,
                Style { gap: 4, ..Style::default() },
                vec![
                    Node::text(Role::Username, &p.username, t.foreground, TextSize::Small, true),
                    Node::text(Role::PostText, &p.post_text, t.foreground, TextSize::Small, false)
                        .with_style(Style { grow: true, ..Style::default() }),
                ],
            ));
        }
        footer.push(Node::text(Role::Timestamp, format!("{} ago", p.timestamp), t.muted, TextSize::Small, false));

        nodes.push(Node::column(Role::Group, Style { padding: 12, gap: 6, ..Style::default() }, footer));
        nodes
    }

    fn comment(&self, ctx: &RenderContext<'_>, standalone: bool) -> Node {
        let c = ctx.comment;
        let t = &ctx.tokens;

        let mut line = name_with_badge(Role::CommentAuthor, &c.username, c.verified, t.foreground, TextSize::Small);
        line.push(
            Node::text(Role::CommentText, &c.text, t.foreground, TextSize::Small, false)
                .with_style(Style { grow: true, ..Style::default() }),
        );
        let meta = row(
            12,
            vec![
                Node::text(Role::Timestamp, &c.timestamp, t.muted, TextSize::Small, false),
                Node::text(Role::CommentLikes, format!("{} likes", group_thousands(c.likes)), t.muted, TextSize::Small, true),
                Node::text(Role::Group, "Reply", t.muted, TextSize::Small, true),
            ],
        );

        Node::row(
            Role::CommentBlock,
            Style {
                border: (!standalone).then_some(t.border),
                border_top_only: true,
                padding: 12,
                gap: 12,
                center: true,
                ..Style::default()
            },
            vec![
                Self::ring_avatar(&c.profile_image, &c.display_name, 28, t),
                Node::column(
                    Role::Group,
                    Style { gap: 4, grow: true, ..Style::default() },
                    vec![Node::row(Role::Group, Style { gap: 4, ..Style::default() }, line), meta],
                ),
                Node::icon(Role::Group, Icon::Heart, t.muted, TextSize::Small),
            ],
        )
    }
}
