// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Key;
use std::collections::BTreeSet;

pub const LCD_ROWS: usize = 9;
pub const LCD_COLS: usize = 38;

/// Truncates or pads `raw` to exactly one LCD row.
pub fn fit_line(raw: &str) -> String {
    let mut line: String = raw.chars().take(LCD_COLS).collect();
    let width = line.chars().count();
    line.extend(std::iter::repeat_n(' ', LCD_COLS - width));
    line
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Softkey {
    pub key: Key,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Footer {
    #[default]
    None,
    Softkeys(Vec<Softkey>),
    Text(String),
}

impl Footer {
    pub fn text(value: impl AsRef<str>) -> Self {
        Self::Text(fit_line(value.as_ref()))
    }

    /// Flattens either footer form into a single LCD row.
    pub fn to_line(&self) -> String {
        match self {
            Self::None => fit_line(""),
            Self::Text(text) => fit_line(text),
            Self::Softkeys(keys) => {
                let joined = keys
                    .iter()
                    .map(|softkey| format!("{} {}", softkey.key.as_str(), softkey.label))
                    .collect::<Vec<String>>()
                    .join(" ");
                fit_line(&joined)
            }
        }
    }
}

/// One rendered LCD image. Always `LCD_ROWS` lines of `LCD_COLS` chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdFrame {
    lines: Vec<String>,
    highlight_line: Option<usize>,
    inv_lines: BTreeSet<usize>,
    footer: Footer,
}

impl LcdFrame {
    pub fn builder<I, S>(lines: I) -> FrameBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FrameBuilder {
            lines: lines
                .into_iter()
                .map(|line| line.as_ref().to_owned())
                .collect(),
            highlight_line: None,
            inv_lines: BTreeSet::new(),
            footer: Footer::None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn highlight_line(&self) -> Option<usize> {
        self.highlight_line
    }

    pub fn highlighted_text(&self) -> Option<&str> {
        self.highlight_line.and_then(|index| self.line(index))
    }

    pub fn inv_lines(&self) -> &BTreeSet<usize> {
        &self.inv_lines
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Plain-text picture of the frame: `>` marks the highlighted row and `#`
    /// marks inverse rows in the left gutter.
    pub fn to_text(&self) -> String {
        let rule = format!(" +{}+", "-".repeat(LCD_COLS));
        let mut out = Vec::with_capacity(LCD_ROWS + 4);
        out.push(rule.clone());
        for (index, line) in self.lines.iter().enumerate() {
            let marker = if self.highlight_line == Some(index) {
                '>'
            } else if self.inv_lines.contains(&index) {
                '#'
            } else {
                ' '
            };
            out.push(format!("{marker}|{line}|"));
        }
        out.push(rule.clone());
        out.push(format!(" |{}|", self.footer.to_line()));
        out.push(rule);
        out.join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuilder {
    lines: Vec<String>,
    highlight_line: Option<usize>,
    inv_lines: BTreeSet<usize>,
    footer: Footer,
}

impl FrameBuilder {
    pub fn highlight(mut self, line: Option<usize>) -> Self {
        self.highlight_line = line;
        self
    }

    pub fn inverse(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.inv_lines.extend(lines);
        self
    }

    pub fn footer(mut self, footer: Footer) -> Self {
        self.footer = footer;
        self
    }

    /// Normalizes the line buffer to the LCD shape.
    ///
    /// # Panics
    ///
    /// Panics when a highlight or inverse index falls outside the LCD rows;
    /// that is a screen bug, not a runtime condition.
    pub fn build(self) -> LcdFrame {
        if let Some(index) = self.highlight_line {
            assert!(
                index < LCD_ROWS,
                "highlight line {index} outside {LCD_ROWS} LCD rows"
            );
        }
        if let Some(index) = self.inv_lines.iter().find(|index| **index >= LCD_ROWS) {
            panic!("inverse line {index} outside {LCD_ROWS} LCD rows");
        }

        let mut lines: Vec<String> = self
            .lines
            .iter()
            .take(LCD_ROWS)
            .map(|line| fit_line(line))
            .collect();
        lines.resize_with(LCD_ROWS, || fit_line(""));

        LcdFrame {
            lines,
            highlight_line: self.highlight_line,
            inv_lines: self.inv_lines,
            footer: self.footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Footer, LCD_COLS, LCD_ROWS, LcdFrame, Softkey, fit_line};
    use crate::Key;

    #[test]
    fn fit_line_pads_and_truncates_by_chars() {
        assert_eq!(fit_line("abc").chars().count(), LCD_COLS);
        let long = "x".repeat(60);
        assert_eq!(fit_line(&long), "x".repeat(LCD_COLS));
        let degrees = fit_line("PHASE 120.0°");
        assert_eq!(degrees.chars().count(), LCD_COLS);
        assert!(degrees.starts_with("PHASE 120.0°"));
    }

    #[test]
    fn builder_normalizes_short_and_long_buffers() {
        let short = LcdFrame::builder(["one", "two"]).build();
        assert_eq!(short.lines().len(), LCD_ROWS);
        assert!(short.lines().iter().all(|line| line.chars().count() == LCD_COLS));

        let long = LcdFrame::builder((0..12).map(|index| format!("row {index}"))).build();
        assert_eq!(long.lines().len(), LCD_ROWS);
        assert!(long.line(8).is_some_and(|line| line.starts_with("row 8")));
    }

    #[test]
    #[should_panic(expected = "outside 9 LCD rows")]
    fn highlight_outside_rows_is_a_producer_bug() {
        let _ = LcdFrame::builder(["a"]).highlight(Some(9)).build();
    }

    #[test]
    #[should_panic(expected = "inverse line 12")]
    fn inverse_outside_rows_is_a_producer_bug() {
        let _ = LcdFrame::builder(["a"]).inverse([8, 12]).build();
    }

    #[test]
    fn softkey_footer_flattens_to_one_row() {
        let footer = Footer::Softkeys(vec![
            Softkey {
                key: Key::F1,
                label: "MEAS",
            },
            Softkey {
                key: Key::F2,
                label: "DISP",
            },
        ]);
        let line = footer.to_line();
        assert!(line.starts_with("F1 MEAS F2 DISP"));
        assert_eq!(line.chars().count(), LCD_COLS);
        assert_eq!(Footer::None.to_line(), " ".repeat(LCD_COLS));
    }

    #[test]
    fn text_view_marks_highlight_and_inverse_rows() {
        let frame = LcdFrame::builder(["title", "item"])
            .highlight(Some(1))
            .inverse([8])
            .footer(Footer::text("QUIT"))
            .build();
        let text = frame.to_text();
        let rows: Vec<&str> = text.lines().collect();
        assert!(rows[2].starts_with(">|item"));
        assert!(rows[9].starts_with("#|"));
        assert!(rows[11].contains("QUIT"));
        assert_eq!(frame.highlighted_text().map(str::trim_end), Some("item"));
    }
}
