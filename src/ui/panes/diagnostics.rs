//! Diagnostics list pane rendering

use crate::ui::app::{DiagnosticEntry, Phase};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the diagnostics list with the selected entry highlighted
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    entries: &[DiagnosticEntry],
    selected: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Diagnostics ({}) ", entries.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if entries.is_empty() {
        let paragraph = Paragraph::new("No problems found")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = entries.iter().map(|e| ListItem::new(entry_line(e))).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    // The list widget scrolls itself to keep the selection visible
    let mut state = ListState::default().with_selected(Some(selected.min(entries.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn entry_line(entry: &DiagnosticEntry) -> Line<'static> {
    let (tag, tag_color) = match (entry.phase, entry.is_warning) {
        (Phase::Syntax, _) => (" SYN ", DEFAULT_THEME.error),
        (Phase::Semantic, false) => (" SEM ", DEFAULT_THEME.secondary),
        (Phase::Semantic, true) => (" WRN ", DEFAULT_THEME.warning),
    };

    Line::from(vec![
        Span::styled(tag, Style::default().bg(tag_color).fg(Color::Black)),
        Span::styled(
            format!(" {:>4}:{:<3} ", entry.location.line, entry.location.column),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(entry.message.clone(), Style::default().fg(DEFAULT_THEME.fg)),
    ])
}
