use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub form: Rect,
    pub crawl_status: Rect,
    pub tabs: Rect,
    pub pane: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

/// Split the screen top to bottom. The crawl status strip only takes room
/// once a crawl has been submitted.
pub fn areas(size: Rect, show_crawl_status: bool) -> UiAreas {
    let status_height = if show_crawl_status { 3 } else { 0 };
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(status_height),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[5]);

    UiAreas {
        size,
        header: vertical[0],
        form: vertical[1],
        crawl_status: vertical[2],
        tabs: vertical[3],
        pane: vertical[4],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}
