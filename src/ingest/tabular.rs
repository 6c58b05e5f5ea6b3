//! Delimited-text scanner.
//!
//! Permissive rather than RFC 4180: a quote outside a quoted field toggles
//! quoting instead of failing, and blank lines are skipped.

/// Field separator of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
        }
    }

    /// Pick the delimiter from the first line only: semicolon when it has a
    /// semicolon and no comma, comma otherwise.
    pub fn detect(text: &str) -> Self {
        let first_line = text.split('\n').next().unwrap_or("");
        let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);

        if first_line.contains(';') && !first_line.contains(',') {
            Self::Semicolon
        } else {
            Self::Comma
        }
    }
}

/// Split `text` into rows of cells.
///
/// - `""` inside a quoted field is a literal quote.
/// - The delimiter and CR/LF are literal inside quotes.
/// - CRLF counts as one row break; a blank line yields no row.
/// - An unterminated last line is still emitted.
pub fn parse(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            row.push(std::mem::take(&mut field));
        } else if (ch == '\n' || ch == '\r') && !in_quotes {
            if !field.is_empty() || !row.is_empty() {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
        } else {
            field.push(ch);
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn quoted_delimiter_is_literal() {
        assert_eq!(parse("a,\"b,c\",d\n", ','), owned(&[&["a", "b,c", "d"]]));
    }

    #[test]
    fn doubled_quote_collapses() {
        assert_eq!(parse("a,\"b\"\"c\",d", ','), owned(&[&["a", "b\"c", "d"]]));
    }

    #[test]
    fn semicolon_rows() {
        assert_eq!(parse("x;y\n1;2", ';'), owned(&[&["x", "y"], &["1", "2"]]));
    }

    #[test]
    fn crlf_and_lf_break_once() {
        assert_eq!(
            parse("a\r\nb\nc\rd", ','),
            owned(&[&["a"], &["b"], &["c"], &["d"]])
        );
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(parse("", ',').is_empty());
        assert!(parse("\n\r\n", ',').is_empty());
    }

    #[test]
    fn delimiter_only_line_is_a_row_of_blanks() {
        assert_eq!(parse(",,\n", ','), owned(&[&["", "", ""]]));
    }

    #[test]
    fn newline_inside_quotes_is_literal() {
        assert_eq!(parse("\"a\nb\",c", ','), owned(&[&["a\nb", "c"]]));
    }

    #[test]
    fn stray_quote_toggles_mode() {
        assert_eq!(parse("ab\"c,d\"e,f", ','), owned(&[&["abc,de", "f"]]));
    }

    #[test]
    fn detect_prefers_comma_when_both_present() {
        assert_eq!(Delimiter::detect("a;b,c\n1;2;3"), Delimiter::Comma);
        assert_eq!(Delimiter::detect("a;b;c\r\n1,2"), Delimiter::Semicolon);
        assert_eq!(Delimiter::detect(""), Delimiter::Comma);
    }
}
