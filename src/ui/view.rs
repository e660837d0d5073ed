use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

use crate::models::{FieldRange, SortDirection};
use crate::schema::{FieldSpec, StatementType};
use crate::utils::format_field_value;

use super::app::{App, InputMode};
use super::state::ViewState;

const SLIDER_WIDTH: usize = 30;

pub fn draw(f: &mut Frame, app: &App) {
    let view = app.current_view();
    let filter_rows = view.statement.schema().fields.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Tab bar
            Constraint::Length(3),               // Symbol input
            Constraint::Length(filter_rows + 2), // Filter sliders
            Constraint::Min(5),                  // Table
            Constraint::Length(3),               // Status bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app.selected_tab);
    render_symbol_input(f, chunks[1], view, app.input_mode);
    render_filters(f, chunks[2], view);
    render_table(f, chunks[3], view);
    render_status_bar(f, chunks[4], view, app.input_mode);
}

fn render_tab_bar(f: &mut Frame, area: Rect, selected: usize) {
    let titles: Vec<&str> = StatementType::ALL.iter().map(|s| s.title()).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Statement Scope"),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .select(selected);

    f.render_widget(tabs, area);
}

fn render_symbol_input(f: &mut Frame, area: Rect, view: &ViewState, mode: InputMode) {
    let mut spans = vec![Span::raw(view.symbol.clone())];
    if mode == InputMode::EditingSymbol {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let title = if mode == InputMode::EditingSymbol {
        "Symbol (Enter to fetch, Esc to cancel)"
    } else {
        "Symbol (press e to edit)"
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}

fn render_filters(f: &mut Frame, area: Rect, view: &ViewState) {
    let label_width = view
        .statement
        .schema()
        .fields
        .iter()
        .map(|spec| spec.label.len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = view
        .statement
        .schema()
        .fields
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let range = view.ranges[spec.key];
            let filter = view.filters[spec.key];
            let selected = index == view.selected_filter;

            let label_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let bar_style = if view.has_data() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            Line::from(vec![
                Span::styled(format!("{:<width$} ", spec.label, width = label_width), label_style),
                Span::styled(slider_bar(&range, &filter), bar_style),
                Span::styled(
                    format!(
                        " {} - {}",
                        format_field_value(spec, filter.min),
                        format_field_value(spec, filter.max)
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Filters"))
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}

/// Fixed-width dual-handle slider: filled between the active bounds, dotted
/// outside them.
fn slider_bar(range: &FieldRange, filter: &FieldRange) -> String {
    let span = range.span();
    let position = |value: f64| -> usize {
        if span <= 0.0 {
            return 0;
        }
        let ratio = ((value - range.min) / span).clamp(0.0, 1.0);
        (ratio * (SLIDER_WIDTH - 1) as f64).round() as usize
    };

    let lo = position(filter.min);
    let hi = if span <= 0.0 {
        SLIDER_WIDTH - 1
    } else {
        position(filter.max)
    };

    (0..SLIDER_WIDTH)
        .map(|i| if i >= lo && i <= hi { '█' } else { '·' })
        .collect()
}

fn render_table(f: &mut Frame, area: Rect, view: &ViewState) {
    let fields = view.statement.schema().fields;

    let header_cells: Vec<Cell> = fields
        .iter()
        .enumerate()
        .map(|(index, spec)| header_cell(view, index, spec))
        .collect();
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = view
        .visible_rows()
        .iter()
        .map(|record| {
            let cells: Vec<Cell> = fields
                .iter()
                .map(|spec| {
                    let text = record
                        .value(spec.key)
                        .map(|value| format_field_value(spec, value))
                        .unwrap_or_else(|| "—".to_string());
                    Cell::from(text)
                })
                .collect();
            Row::new(cells).style(Style::default().fg(Color::Gray))
        })
        .collect();

    let row_count = rows.len();
    let widths = vec![Constraint::Ratio(1, fields.len() as u32); fields.len()];
    let title = format!("{} — {} rows", view.statement.title(), row_count);
    let table = Table::new(rows, widths).header(header).block(
        Block::default().borders(Borders::ALL).title(title),
    );

    // Filters may have shrunk the row set below the stored offset.
    let offset = view.table_offset.min(row_count.saturating_sub(1));
    let mut table_state = TableState::default().with_offset(offset);
    f.render_stateful_widget(table, area, &mut table_state);
}

fn header_cell(view: &ViewState, index: usize, spec: &FieldSpec) -> Cell<'static> {
    let is_sort_column = view.sort.key.as_deref() == Some(spec.key);
    let glyph = if is_sort_column {
        match view.sort.direction {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    } else {
        // Ghost glyph on inactive columns, like a dimmed chevron.
        "▲"
    };

    let glyph_style = if is_sort_column {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label_style = if index == view.selected_column {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    Cell::from(Line::from(vec![
        Span::styled(spec.label.to_string(), label_style),
        Span::raw(" "),
        Span::styled(glyph.to_string(), glyph_style),
    ]))
}

fn render_status_bar(f: &mut Frame, area: Rect, view: &ViewState, mode: InputMode) {
    let hints = if mode == InputMode::EditingSymbol {
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" fetch • ", Style::default().fg(Color::Gray)),
            Span::styled("Esc", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(Color::Gray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" views • ", Style::default().fg(Color::Gray)),
            Span::styled("e", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" symbol • ", Style::default().fg(Color::Gray)),
            Span::styled("f", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" fetch • ", Style::default().fg(Color::Gray)),
            Span::styled("↑↓", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" filter ", Style::default().fg(Color::Gray)),
            Span::styled("[]{}", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" bounds • ", Style::default().fg(Color::Gray)),
            Span::styled("←→", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" column ", Style::default().fg(Color::Gray)),
            Span::styled("s", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" sort • ", Style::default().fg(Color::Gray)),
            Span::styled("r", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" reset • ", Style::default().fg(Color::Gray)),
            Span::styled("PgUp/PgDn", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" scroll • ", Style::default().fg(Color::Gray)),
            Span::styled("q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" quit", Style::default().fg(Color::Gray)),
        ])
    };

    let status = Line::from(Span::styled(
        view.status.clone(),
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(vec![status, hints])
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}
