use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Centers a box of the given percentage size inside `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centers a box of fixed size, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, area);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 10);
    }

    #[test]
    fn centered_fixed_clamps_to_area() {
        let area = Rect::new(2, 1, 30, 10);
        let inner = centered_fixed(80, 6, area);
        assert_eq!(inner, Rect::new(2, 3, 30, 6));
    }
}
