//! Syntax tree pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the syntax tree as an indented list of `(depth, label)` rows
pub fn render_ast_pane(
    frame: &mut Frame,
    area: Rect,
    tree_lines: &[(usize, String)],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    // A bare Program row means nothing parsed
    if tree_lines.len() <= 1 {
        let paragraph = Paragraph::new("(empty program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if tree_lines.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(tree_lines.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = tree_lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(depth, label)| ListItem::new(tree_row(*depth, label)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// One tree row: guide characters, then the kind, then its detail
fn tree_row(depth: usize, label: &str) -> Line<'static> {
    let guide = if depth == 0 {
        String::new()
    } else {
        format!("{}└ ", "│ ".repeat(depth - 1))
    };

    let (kind, detail) = match label.split_once(": ") {
        Some((kind, detail)) => (kind.to_string(), format!(" {}", detail)),
        None => (label.to_string(), String::new()),
    };

    Line::from(vec![
        Span::styled(guide, Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(kind, Style::default().fg(DEFAULT_THEME.type_name)),
        Span::styled(detail, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}
