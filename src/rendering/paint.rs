//! Paint command list built from a laid-out visual tree.
//!
//! Coordinates are CSS pixels relative to the card's top-left corner; the
//! rasterizer applies device scale and snapshot padding.

use crate::catalog::Font;
use crate::model::ImageData;
use crate::rendering::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH, ICON_SIZE};
use crate::rendering::layout::{layout_tree, LayoutNode, TextMetrics};
use crate::rendering::node::{Color, Icon, NodeKind, VisualTree};

/// Pixel mask applied to bitmap draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Rounded(u32),
    Circle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        rgba: Color,
    },
    /// One-pixel outline; `top_only` draws just the upper edge
    Border {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        top_only: bool,
        rgba: Color,
    },
    Circle {
        x: i32,
        y: i32,
        diameter: u32,
        rgba: Color,
    },
    /// Horizontal gradient disc, used for avatar rings
    GradientCircle {
        x: i32,
        y: i32,
        diameter: u32,
        from: Color,
        to: Color,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        tracking: u32,
        bold: bool,
        rgba: Color,
    },
    Icon {
        x: i32,
        y: i32,
        icon: Icon,
        scale: u32,
        rgba: Color,
    },
    Image {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        image: ImageData,
        /// Crop to fill instead of stretching
        cover: bool,
        mask: Mask,
    },
}

/// Lay out and paint a preview. Returns the card size and the command list.
pub fn paint_tree(tree: &VisualTree) -> ((u32, u32), Vec<PaintCommand>) {
    let layout = layout_tree(tree);
    let mut out = Vec::new();
    paint_node(&layout, 0, 0, tree.font, &mut out);
    ((layout.rect.width, layout.rect.height), out)
}

fn paint_node(l: &LayoutNode<'_>, origin_x: i32, origin_y: i32, font: Font, out: &mut Vec<PaintCommand>) {
    let x = origin_x + l.rect.x;
    let y = origin_y + l.rect.y;
    let (width, height) = (l.rect.width, l.rect.height);
    let style = &l.node.style;

    if let Some(bg) = style.background {
        out.push(PaintCommand::SolidRect { x, y, width, height, radius: style.radius, rgba: bg });
    }

    match &l.node.kind {
        NodeKind::Text(run) => {
            let m = TextMetrics::for_font(font);
            let line_h = m.line_height(run.size) as i32;
            // glyphs sit two scaled pixels below the top of their line box
            let baseline_pad = (2 * run.size.scale()) as i32;
            for (i, line) in l.lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                out.push(PaintCommand::Text {
                    x,
                    y: y + i as i32 * line_h + baseline_pad,
                    text: line.clone(),
                    scale: run.size.scale(),
                    tracking: m.tracking,
                    bold: run.bold,
                    rgba: run.color,
                });
            }
        }
        NodeKind::Icon { icon, color, size } => {
            let side = (ICON_SIZE * size.scale()) as i32;
            out.push(PaintCommand::Icon {
                x,
                y: y + (height as i32 - side) / 2,
                icon: *icon,
                scale: size.scale(),
                rgba: *color,
            });
        }
        NodeKind::Image { image, square, radius } => {
            out.push(PaintCommand::Image {
                x,
                y,
                width,
                height,
                image: image.clone(),
                cover: *square,
                mask: Mask::Rounded(*radius),
            });
        }
        NodeKind::Avatar(a) => {
            let (mut ax, mut ay, mut d) = (x, y, a.size);
            if let Some((from, to)) = a.ring {
                out.push(PaintCommand::GradientCircle { x, y, diameter: d, from, to });
                ax += 2;
                ay += 2;
                d = d.saturating_sub(4);
            }
            out.push(PaintCommand::Circle { x: ax, y: ay, diameter: d, rgba: a.fill });
            match &a.image {
                Some(img) => out.push(PaintCommand::Image {
                    x: ax,
                    y: ay,
                    width: d,
                    height: d,
                    image: img.clone(),
                    cover: true,
                    mask: Mask::Circle,
                }),
                None => {
                    let scale = if d >= 40 { 2 } else { 1 };
                    let glyph_w = (GLYPH_WIDTH * scale) as i32;
                    let glyph_h = (GLYPH_HEIGHT * scale) as i32;
                    out.push(PaintCommand::Text {
                        x: ax + (d as i32 - glyph_w) / 2,
                        y: ay + (d as i32 - glyph_h) / 2,
                        text: a.initial.to_string(),
                        scale,
                        tracking: 0,
                        bold: true,
                        rgba: a.initial_color,
                    });
                }
            }
        }
        NodeKind::Container(_) | NodeKind::Spacer => {}
    }

    for child in &l.children {
        paint_node(child, x, y, font, out);
    }

    if let Some(border) = style.border {
        out.push(PaintCommand::Border {
            x,
            y,
            width,
            height,
            radius: style.radius,
            top_only: style.border_top_only,
            rgba: border,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Theme;
    use crate::model::{CommentModel, PostModel};
    use crate::rendering::preview::render_preview;

    #[test]
    fn card_background_is_painted_first() {
        let tree = render_preview(
            "twitter",
            "text-post",
            &PostModel::default(),
            &CommentModel::default(),
            Theme::Dark,
            Font::Arial,
        )
        .unwrap();
        let ((w, h), cmds) = paint_tree(&tree);
        assert_eq!(w, 448);
        assert!(h > 0);
        match &cmds[0] {
            PaintCommand::SolidRect { width, rgba, .. } => {
                assert_eq!(*width, 448);
                assert_eq!(*rgba, crate::rendering::node::palette::BLACK);
            }
            other => panic!("unexpected first command: {:?}", other),
        }
        assert!(cmds.iter().any(|c| matches!(c, PaintCommand::Text { text, .. } if text == "John Doe")));
    }
}
