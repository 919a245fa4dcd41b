//! Box layout for visual trees.
//!
//! Rows lay children out left to right, giving leftover width to `grow`
//! children; columns stack children and stretch nested containers to the
//! column's inner width. Child rects are relative to their parent's origin.

use crate::catalog::Font;
use crate::rendering::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH, ICON_SIZE};
use crate::rendering::node::{Direction, Node, NodeKind, TextSize, VisualTree};

/// Tallest box an image may occupy, in CSS pixels
pub const MAX_IMAGE_HEIGHT: u32 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Glyph metrics for the active font family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub tracking: u32,
}

impl TextMetrics {
    pub fn for_font(font: Font) -> Self {
        Self { tracking: font.tracking() }
    }

    pub fn advance(&self, size: TextSize) -> u32 {
        (GLYPH_WIDTH + self.tracking) * size.scale()
    }

    pub fn line_height(&self, size: TextSize) -> u32 {
        (GLYPH_HEIGHT + 4) * size.scale()
    }

    pub fn text_width(&self, text: &str, size: TextSize) -> u32 {
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        n * self.advance(size) - self.tracking * size.scale()
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    pub rect: Rect,
    pub node: &'a Node,
    /// Wrapped lines, for text nodes only
    pub lines: Vec<String>,
    pub children: Vec<LayoutNode<'a>>,
}

/// Greedy word wrap. Words longer than a line are split.
pub fn wrap_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let chars_per_line = chars_per_line.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut cur = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > chars_per_line {
                if !cur.is_empty() {
                    lines.push(std::mem::take(&mut cur));
                }
                let rest = word.split_off(chars_per_line);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let cur_len = cur.chars().count();
            if cur_len + word.chars().count() + 1 > chars_per_line && !cur.is_empty() {
                lines.push(std::mem::replace(&mut cur, word));
            } else {
                if !cur.is_empty() {
                    cur.push(' ');
                }
                cur.push_str(&word);
            }
        }
        lines.push(cur);
    }
    // drop trailing empty lines produced by trailing newlines or empty input
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Lay out a whole preview at its card width
pub fn layout_tree(tree: &VisualTree) -> LayoutNode<'_> {
    let metrics = TextMetrics::for_font(tree.font);
    layout_node(&tree.root, tree.width, true, &metrics)
}

fn layout_node<'a>(node: &'a Node, available: u32, stretch: bool, m: &TextMetrics) -> LayoutNode<'a> {
    match &node.kind {
        NodeKind::Container(Direction::Column) => layout_column(node, available, stretch, m),
        NodeKind::Container(Direction::Row) => layout_row(node, available, stretch, m),
        NodeKind::Text(run) => {
            let per_line = (available / m.advance(run.size).max(1)) as usize;
            let lines = if run.text.is_empty() { vec![String::new()] } else { wrap_text(&run.text, per_line) };
            let width = lines.iter().map(|l| m.text_width(l, run.size)).max().unwrap_or(0);
            let height = lines.len() as u32 * m.line_height(run.size);
            LayoutNode { rect: sized(width, height), node, lines, children: Vec::new() }
        }
        NodeKind::Icon { size, .. } => {
            let side = ICON_SIZE * size.scale();
            let height = m.line_height(*size).max(side);
            leaf(node, side, height)
        }
        NodeKind::Avatar(a) => leaf(node, a.size, a.size),
        NodeKind::Image { image, square, .. } => {
            let width = available;
            let height = if *square || image.width() == 0 {
                width
            } else {
                let scaled = u64::from(width) * u64::from(image.height()) / u64::from(image.width());
                scaled.min(u64::from(MAX_IMAGE_HEIGHT)) as u32
            };
            leaf(node, width, height)
        }
        NodeKind::Spacer => leaf(node, if stretch { available } else { 0 }, 0),
    }
}

fn sized(width: u32, height: u32) -> Rect {
    Rect { x: 0, y: 0, width, height }
}

fn leaf(node: &Node, width: u32, height: u32) -> LayoutNode<'_> {
    LayoutNode { rect: sized(width, height), node, lines: Vec::new(), children: Vec::new() }
}

fn is_container(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Container(_))
}

fn layout_column<'a>(node: &'a Node, available: u32, stretch: bool, m: &TextMetrics) -> LayoutNode<'a> {
    let pad = node.style.padding;
    let inner = available.saturating_sub(pad * 2);
    let mut y = pad;
    let mut widest = 0;
    let mut children = Vec::with_capacity(node.children.len());

    for (i, child) in node.children.iter().enumerate() {
        if i > 0 {
            y = y.saturating_add(node.style.gap);
        }
        let mut l = layout_node(child, inner, is_container(child) && stretch, m);
        l.rect.x = pad as i32;
        l.rect.y = y.min(i32::MAX as u32) as i32;
        y = y.saturating_add(l.rect.height);
        widest = widest.max(l.rect.width);
        children.push(l);
    }

    let width = if stretch { available } else { widest + pad * 2 };
    LayoutNode { rect: sized(width, y.saturating_add(pad)), node, lines: Vec::new(), children }
}

fn layout_row<'a>(node: &'a Node, available: u32, stretch: bool, m: &TextMetrics) -> LayoutNode<'a> {
    let pad = node.style.padding;
    let inner = available.saturating_sub(pad * 2);
    let gaps = node.style.gap * node.children.len().saturating_sub(1) as u32;

    let mut used = gaps;
    let mut slots: Vec<Option<LayoutNode<'a>>> = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if child.style.grow {
            slots.push(None);
        } else {
            let l = layout_node(child, inner.saturating_sub(used), false, m);
            used += l.rect.width;
            slots.push(Some(l));
        }
    }

    let growers = node.children.iter().filter(|c| c.style.grow).count() as u32;
    let share = if growers > 0 { inner.saturating_sub(used) / growers } else { 0 };

    let mut children: Vec<LayoutNode<'a>> = node
        .children
        .iter()
        .zip(slots)
        .map(|(child, slot)| slot.unwrap_or_else(|| layout_node(child, share, true, m)))
        .collect();

    let tallest = children.iter().map(|c| c.rect.height).max().unwrap_or(0);
    let mut x = pad;
    for (i, l) in children.iter_mut().enumerate() {
        if i > 0 {
            x += node.style.gap;
        }
        l.rect.x = x as i32;
        let offset = if node.style.center { (tallest - l.rect.height) / 2 } else { 0 };
        l.rect.y = (pad + offset) as i32;
        x += l.rect.width;
    }

    let width = if stretch || growers > 0 { available } else { x + pad };
    LayoutNode { rect: sized(width, tallest.saturating_add(pad * 2)), node, lines: Vec::new(), children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::node::{palette, Role, Style};

    #[test]
    fn wrap_breaks_on_words_and_long_tokens() {
        assert_eq!(wrap_text("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn column_stacks_children_with_gap() {
        let node = Node::column(
            Role::Card,
            Style { padding: 10, gap: 5, ..Style::default() },
            vec![
                Node::text(Role::DisplayName, "Ann", palette::BLACK, TextSize::Normal, true),
                Node::text(Role::PostText, "Hello", palette::BLACK, TextSize::Normal, false),
            ],
        );
        let m = TextMetrics { tracking: 1 };
        let l = layout_node(&node, 200, true, &m);
        assert_eq!(l.rect.width, 200);
        assert_eq!(l.children[0].rect.y, 10);
        assert_eq!(l.children[1].rect.y, 10 + 22 + 5);
        assert_eq!(l.rect.height, 10 + 22 + 5 + 22 + 10);
    }

    #[test]
    fn tall_image_height_is_capped() {
        let img = crate::model::ImageData::from_rgba(image::RgbaImage::new(1, 7_000_000));
        let node = Node::image(img, false, 0);
        let l = layout_node(&node, 448, false, &TextMetrics { tracking: 1 });
        assert_eq!(l.rect.width, 448);
        assert_eq!(l.rect.height, MAX_IMAGE_HEIGHT);
    }

    #[test]
    fn spacer_takes_leftover_width() {
        let node = Node::row(
            Role::Engagement,
            Style::default(),
            vec![
                Node::text(Role::Likes, "1", palette::BLACK, TextSize::Normal, false),
                Node::spacer(),
                Node::text(Role::Shares, "2", palette::BLACK, TextSize::Normal, false),
            ],
        );
        let m = TextMetrics { tracking: 1 };
        let l = layout_node(&node, 100, true, &m);
        let last = &l.children[2];
        assert_eq!(last.rect.x as u32 + last.rect.width, 100);
    }
}
