use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// Removes newlines and any surrounding whitespace, replacing them with a single space.
///
/// # Examples
///
/// ```rust
/// # use app_grid::utils::remove_newlines;
/// let text = "Line 1\n  Line 2 \r\n\tLine 3";
/// assert_eq!(remove_newlines(text), "Line 1 Line 2 Line 3");
/// ```
pub fn remove_newlines(str: impl AsRef<str>) -> String {
    let str = str.as_ref();
    if !str.contains(['\n', '\r']) {
        return str.to_owned();
    }
    str.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits the text into the parts matching the query and the ones in between, in order.
///
/// Every part is returned along with whether it matches the query or not. An empty query never matches.
///
/// # Examples
///
/// ```rust
/// # use app_grid::utils::split_matches;
/// assert_eq!(
///     split_matches("Star Notes", "Notes"),
///     vec![(false, "Star "), (true, "Notes")]
/// );
/// ```
pub fn split_matches<'t>(text: &'t str, query: &str) -> Vec<(bool, &'t str)> {
    if query.is_empty() {
        return vec![(false, text)];
    }
    let mut parts = Vec::new();
    let mut last = 0;
    for (start, matched) in text.match_indices(query) {
        if start > last {
            parts.push((false, &text[last..start]));
        }
        parts.push((true, matched));
        last = start + matched.len();
    }
    if last < text.len() {
        parts.push((false, &text[last..]));
    }
    parts
}

/// Builds a line highlighting the parts of the text matching the query
pub fn highlighted_line<'t>(text: &'t str, query: &str, style: Style, match_style: Style) -> Line<'t> {
    Line::from(
        split_matches(text, query)
            .into_iter()
            .map(|(matched, part)| Span::styled(part, if matched { match_style } else { style }))
            .collect::<Vec<_>>(),
    )
}

/// Truncates a slice of spans to fit within a maximum width
pub fn truncate_spans<'a>(spans: &[Span<'a>], max_width: u16) -> (Vec<Span<'a>>, u16) {
    let mut current_width: u16 = 0;
    let mut truncated_spans: Vec<Span<'a>> = Vec::new();

    for span in spans {
        let span_width = span.width() as u16;
        if current_width.saturating_add(span_width) <= max_width {
            current_width = current_width.saturating_add(span_width);
            truncated_spans.push(span.clone());
            continue;
        }

        // Take as many chars of this span as they fit
        let mut content = String::new();
        for c in span.content.chars() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0) as u16;
            if current_width.saturating_add(char_width) > max_width {
                break;
            }
            content.push(c);
            current_width = current_width.saturating_add(char_width);
        }
        if !content.is_empty() {
            truncated_spans.push(Span::styled(content, span.style));
        }
        break;
    }
    (truncated_spans, current_width)
}

/// Truncates a line and adds an ellipsis if truncation occurred
pub fn truncate_line_with_ellipsis<'a>(line: Line<'a>, max_width: u16) -> Line<'a> {
    let original_width = line.width() as u16;
    if original_width <= max_width {
        return line;
    }
    if max_width == 0 {
        return Line::default();
    }

    // Reserve space for the ellipsis
    let (mut spans, _) = truncate_spans(&line.spans, max_width.saturating_sub(1));
    let ellipsis_style = spans
        .last()
        .or_else(|| line.spans.first())
        .map_or(Style::default(), |s| s.style);
    spans.push(Span::styled("…", ellipsis_style));

    Line::from(spans).style(line.style)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_remove_newlines() {
        assert_eq!(remove_newlines("no newlines here"), "no newlines here");
        assert_eq!(remove_newlines("a\n\n  b\r\nc\n"), "a b c");
    }

    #[test]
    fn test_split_matches() {
        assert_eq!(split_matches("Notes", ""), vec![(false, "Notes")]);
        assert_eq!(split_matches("Notes", "x"), vec![(false, "Notes")]);
        assert_eq!(split_matches("Notes", "Notes"), vec![(true, "Notes")]);
        assert_eq!(
            split_matches("aXbXc", "X"),
            vec![(false, "a"), (true, "X"), (false, "b"), (true, "X"), (false, "c")]
        );
        assert_eq!(split_matches("© 2021 Orbit", "©"), vec![(true, "©"), (false, " 2021 Orbit")]);
    }

    #[test]
    fn test_highlighted_line() {
        let style = Style::new();
        let match_style = Style::new().yellow();
        let line = highlighted_line("Piano Lessons", "Less", style, match_style);
        assert_eq!(line.spans, vec![
            Span::styled("Piano ", style),
            Span::styled("Less", match_style),
            Span::styled("ons", style),
        ]);
    }

    #[test]
    fn test_truncate_spans() {
        let spans = vec![Span::raw("Hello"), Span::raw(" World")];
        let (truncated, width) = truncate_spans(&spans, 7);
        assert_eq!(truncated, vec![Span::raw("Hello"), Span::raw(" W")]);
        assert_eq!(width, 7);

        let (truncated, width) = truncate_spans(&spans, 20);
        assert_eq!(truncated, spans);
        assert_eq!(width, 11);
    }

    #[test]
    fn test_truncate_line_with_ellipsis() {
        let style = Style::new().fg(Color::Red);
        let line = Line::from(vec![Span::styled("Melody", style), Span::raw(" Apps")]);

        assert_eq!(truncate_line_with_ellipsis(line.clone(), 20), line);
        assert_eq!(
            truncate_line_with_ellipsis(line.clone(), 5).spans,
            vec![Span::styled("Melo", style), Span::styled("…", style)]
        );
        assert_eq!(truncate_line_with_ellipsis(line, 0).spans, Vec::<Span>::new());
    }
}
