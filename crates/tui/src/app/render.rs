use super::*;
use crate::view::{ActionView, ButtonView, DialogView};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let view = AuthView::project(self.controller.props(), self.controller.session());

        let [header, body, status] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header);
        self.render_button(frame, body, &view.button);
        self.render_status(frame, status);

        if let Some(ref dialog) = view.dialog {
            self.render_dialog(frame, area, dialog);
        }

        if self.show_help {
            self.render_help(frame, area);
        }
    }

    fn spinner(&self) -> &'static str {
        SPINNER[(self.tick % SPINNER.len() as u64) as usize]
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let provider = &self.config.button.provider;
        let provider_line = match (&self.provider_info, provider.is_empty()) {
            (_, true) => "Provider: [not set]".to_string(),
            (Some(info), false) => format!("Provider: {} ({})", info.display_name, provider),
            (None, false) => format!("Provider: {provider}"),
        };

        let mut lines = vec![Line::from(provider_line)];
        if let Some(ref info) = self.provider_info {
            if !info.help_text.is_empty() {
                lines.push(Line::styled(
                    info.help_text.clone(),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }

        if let Some(ref token) = self.refresh_token {
            let status = match self.token_status {
                None => String::new(),
                Some(TokenStatus::Checking) => " (checking...)".to_string(),
                Some(TokenStatus::Valid {
                    expires_in: Some(secs),
                }) => format!(" (valid, access token expires in {secs}s)"),
                Some(TokenStatus::Valid { expires_in: None }) => " (valid)".to_string(),
                Some(TokenStatus::Invalid(ref reason)) => format!(" (invalid: {reason})"),
            };
            lines.push(Line::styled(
                format!("Refresh token: {}{}", redact_token(token), status),
                Style::default().fg(Color::Green),
            ));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" oauth2-auth "))
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_button(&self, frame: &mut Frame, area: Rect, button: &ButtonView) {
        let label = if button.loading {
            format!("{} {}", self.spinner(), button.label)
        } else {
            button.label.clone()
        };
        let width = u16::try_from(Line::from(label.as_str()).width())
            .unwrap_or(u16::MAX)
            .saturating_add(6);
        let rect = layout::centered_fixed(width, 3, area);

        let accent = if button.enabled {
            Color::Blue
        } else {
            Color::DarkGray
        };

        let (style, block) = match button.variant {
            ButtonVariant::Contained => (
                Style::default()
                    .fg(Color::White)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
                Block::default().borders(Borders::ALL).border_style(
                    Style::default().fg(accent),
                ),
            ),
            ButtonVariant::Outlined => (
                Style::default().fg(accent),
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent)),
            ),
            ButtonVariant::Text => (
                Style::default().fg(accent).add_modifier(Modifier::UNDERLINED),
                Block::default(),
            ),
        };

        frame.render_widget(
            Paragraph::new(label).style(style).block(block).centered(),
            rect,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.last_toast {
            Some(ref toast) if toast.is_error() => Line::styled(
                format!(" ✖ {}", toast.message),
                Style::default().fg(Color::Red),
            ),
            Some(ref toast) => Line::styled(
                format!(" ✔ {}", toast.message),
                Style::default().fg(Color::Green),
            ),
            None => Line::styled(
                " [Enter] authorize   [?] help   [Ctrl+Q] quit",
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_dialog(&self, frame: &mut Frame, area: Rect, dialog: &DialogView) {
        let popup_area = layout::centered_rect(80, 90, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", dialog.title));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [content, input, footer] = Layout::vertical([
            Constraint::Min(8),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .areas(inner);

        let muted = Style::default().fg(Color::DarkGray);
        let mut lines: Vec<Line> = Vec::new();

        if let Some(subtitle) = dialog.subtitle {
            lines.push(Line::styled(subtitle, muted));
        }
        lines.push(Line::styled(
            dialog.steps_title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        for (i, step) in dialog.steps.iter().enumerate() {
            lines.push(Line::from(format!("  {}. {}", i + 1, step)));
        }
        lines.push(Line::default());

        if let Some(warning) = dialog.warning {
            lines.push(Line::styled(warning, Style::default().fg(Color::Yellow)));
            lines.push(Line::default());
        }

        lines.push(Line::from(vec![
            Span::raw(dialog.link_label),
            Span::styled(
                dialog.link_text,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::raw("  "),
            Span::styled(format!("[Ctrl+R] {}", dialog.reopen.label), action_style(&dialog.reopen)),
        ]));
        lines.push(Line::styled(dialog.auth_url.clone(), muted));

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            content,
        );

        let input_style = if dialog.input.disabled {
            muted
        } else {
            Style::default()
        };
        let input_text = if dialog.input.value.is_empty() {
            Paragraph::new(Line::styled(dialog.input.placeholder, muted))
        } else {
            Paragraph::new(dialog.input.value.clone()).style(input_style)
        };
        frame.render_widget(
            input_text.wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(input_style)
                    .title(format!(" {} ", dialog.input.label)),
            ),
            input,
        );

        let submit_label = if dialog.submit.spinner {
            format!("{} {}", self.spinner(), dialog.submit.label)
        } else {
            dialog.submit.label.to_string()
        };
        let footer_lines = vec![
            Line::styled(dialog.input.helper, muted),
            Line::default(),
            Line::from(vec![
                Span::styled(format!("[Esc] {}", dialog.cancel.label), action_style(&dialog.cancel)),
                Span::raw("    "),
                Span::styled(format!("[Enter] {submit_label}"), action_style(&dialog.submit)),
            ]),
        ];
        frame.render_widget(Paragraph::new(footer_lines), footer);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help_text = self.keybinds.help_text();
        let popup_area = layout::centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(help_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Press ? to close "),
            ),
            popup_area,
        );
    }
}

fn action_style(action: &ActionView) -> Style {
    if action.enabled {
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Shows only the first few characters of a credential.
pub(crate) fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() < token.len() {
        format!("{prefix}…[REDACTED]")
    } else {
        "[REDACTED]".to_string()
    }
}
