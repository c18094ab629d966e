use unicode_width::UnicodeWidthStr;

/// Plain-text table with columns padded to their widest cell.
pub struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    gap: usize,
}

impl TextTable {
    pub fn new<S: Into<String>>(header: Vec<S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            gap: 2,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = text_width(cell);
                match widths.get_mut(i) {
                    Some(max) => *max = (*max).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }

    /// Header, a dashed rule, then one line per row.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut output = String::new();

        self.render_line(&mut output, &self.header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.render_line(&mut output, &rule, &widths);
        for row in &self.rows {
            self.render_line(&mut output, row, &widths);
        }

        output
    }

    fn render_line(&self, output: &mut String, cells: &[String], widths: &[usize]) {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            line.push_str(cell);
            if i + 1 < cells.len() {
                let pad = widths[i].saturating_sub(text_width(cell)) + self.gap;
                line.push_str(&" ".repeat(pad));
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
}

pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(text_width("event"), 5);
    }

    #[test]
    fn test_arrow_width() {
        assert_eq!(text_width("a → b"), 5);
    }

    #[test]
    fn test_wide_width() {
        // 全角文字は幅2
        assert_eq!(text_width("テスト"), 6);
    }

    #[test]
    fn test_columns_aligned() {
        let mut table = TextTable::new(vec!["name", "title"]);
        table.push_row(vec!["agent-identifier".to_string(), "AgentIdentifier".to_string()]);
        table.push_row(vec!["event".to_string(), "Event".to_string()]);
        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("{:<18}title", "name"));
        assert_eq!(lines[3], format!("{:<18}Event", "event"));
    }

    #[test]
    fn test_no_rows() {
        let table = TextTable::new(vec!["name"]);
        assert_eq!(table.render(), "name\n----\n");
    }
}
