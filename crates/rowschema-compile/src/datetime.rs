//! Date patterns.
//!
//! Dataset definitions describe dates with Unicode date-field patterns
//! (`dd-MM-yyyy`, `d MMM yyyy`, `yyyy'T'MM`). A pattern is translated once
//! into a chrono format string and reused for every record.
//!
//! Chrono is lenient about padding and signs (` 5`, `+2022`), so the input
//! is first matched against the pattern's shape: numeric fields must start
//! with an ASCII digit and literals must match exactly.

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};

use crate::error::FieldTypeError;

/// A validated date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    pattern: String,
    chrono_format: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Numeric field; `width` bounds it when another numeric field follows.
    Digits { width: usize },
    /// Month name.
    Letters,
}

impl DatePattern {
    /// Translate a pattern.
    ///
    /// Supported fields: `y` (`yy` is a two-digit year), `M`/`MM` (numeric
    /// month), `MMM`/`MMMM` (month name), `d`/`dd`. Text in single quotes is
    /// literal and `''` is a quote. Any other letter is rejected, as is a
    /// pattern missing a year, month or day.
    pub fn compile(pattern: &str) -> Result<Self, FieldTypeError> {
        let invalid = |reason: String| FieldTypeError::InvalidDateFormat {
            format: pattern.to_string(),
            reason,
        };

        let mut chrono_format = String::with_capacity(pattern.len() * 2);
        let mut segments = Vec::new();
        let (mut year, mut month, mut day) = (false, false, false);
        let mut chars = pattern.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    push_literal(&mut chrono_format, &mut segments, '\'');
                    continue;
                }
                let mut closed = false;
                while let Some(quoted) = chars.next() {
                    if quoted == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            push_literal(&mut chrono_format, &mut segments, '\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    push_literal(&mut chrono_format, &mut segments, quoted);
                }
                if !closed {
                    return Err(invalid("unterminated quoted text".to_string()));
                }
                continue;
            }

            if !ch.is_ascii_alphabetic() {
                push_literal(&mut chrono_format, &mut segments, ch);
                continue;
            }

            let mut width = 1;
            while chars.peek() == Some(&ch) {
                chars.next();
                width += 1;
            }

            let directive = match (ch, width) {
                ('y', 2) => "%y",
                ('y', _) => "%Y",
                ('M', 1 | 2) => "%m",
                ('M', 3) => "%b",
                ('M', 4) => "%B",
                ('d', 1 | 2) => "%d",
                _ => {
                    let token: String = std::iter::repeat_n(ch, width).collect();
                    return Err(invalid(format!("unsupported token '{token}'")));
                }
            };
            match ch {
                'y' => year = true,
                'M' => month = true,
                _ => day = true,
            }
            chrono_format.push_str(directive);
            segments.push(match (ch, width) {
                ('M', 3 | 4) => Segment::Letters,
                ('y', 1 | 3..) => Segment::Digits { width: 4 },
                _ => Segment::Digits { width: 2 },
            });
        }

        if !(year && month && day) {
            return Err(invalid(
                "pattern must contain a year, a month and a day".to_string(),
            ));
        }
        if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid("pattern cannot be represented".to_string()));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            chrono_format,
            segments,
        })
    }

    /// Parse a value. The whole input must match and denote a real date.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        if !self.matches_shape(value) {
            return None;
        }
        NaiveDate::parse_from_str(value, &self.chrono_format).ok()
    }

    fn matches_shape(&self, value: &str) -> bool {
        let mut rest = value;
        for (index, segment) in self.segments.iter().enumerate() {
            let taken = match segment {
                Segment::Literal(literal) => {
                    if !rest.starts_with(literal.as_str()) {
                        return false;
                    }
                    literal.len()
                }
                Segment::Digits { width } => {
                    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                    if digits == 0 {
                        return false;
                    }
                    match self.segments.get(index + 1) {
                        Some(Segment::Digits { .. }) => digits.min(*width),
                        _ => digits,
                    }
                }
                Segment::Letters => {
                    let letters = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
                    if letters == 0 {
                        return false;
                    }
                    letters
                }
            };
            rest = &rest[taken..];
        }
        rest.is_empty()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn chrono_format(&self) -> &str {
        &self.chrono_format
    }
}

fn push_literal(format: &mut String, segments: &mut Vec<Segment>, ch: char) {
    if ch == '%' {
        format.push_str("%%");
    } else {
        format.push(ch);
    }
    match segments.last_mut() {
        Some(Segment::Literal(literal)) => literal.push(ch),
        _ => segments.push(Segment::Literal(ch.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn translates_common_patterns() {
        let cases = [
            ("dd-MM-yyyy", "%d-%m-%Y"),
            ("yyyy/MM/dd", "%Y/%m/%d"),
            ("d MMM yy", "%d %b %y"),
            ("dd MMMM yyyy", "%d %B %Y"),
            ("yyyy'T'MM'T'dd", "%YT%mT%d"),
            ("dd''MM''yyyy", "%d'%m'%Y"),
            ("dd%MM%yyyy", "%d%%%m%%%Y"),
        ];
        for (pattern, expected) in cases {
            let compiled = DatePattern::compile(pattern).unwrap();
            assert_eq!(compiled.chrono_format(), expected, "pattern {pattern}");
        }
    }

    #[test]
    fn parses_valid_dates() {
        let pattern = DatePattern::compile("dd-MM-yyyy").unwrap();
        assert_eq!(pattern.parse("10-10-2022"), Some(ymd(2022, 10, 10)));
        assert_eq!(pattern.parse("29-02-2024"), Some(ymd(2024, 2, 29)));

        let named = DatePattern::compile("d MMM yyyy").unwrap();
        assert_eq!(named.parse("5 Mar 2021"), Some(ymd(2021, 3, 5)));
    }

    #[test]
    fn rejects_impossible_or_malformed_dates() {
        let pattern = DatePattern::compile("dd-MM-yyyy").unwrap();
        assert_eq!(pattern.parse("31-02-2022"), None);
        assert_eq!(pattern.parse("31-04-2022"), None);
        assert_eq!(pattern.parse("29-02-2023"), None);
        assert_eq!(pattern.parse("2022-10-10"), None);
        assert_eq!(pattern.parse("10-10-2022x"), None);
        assert_eq!(pattern.parse("-9"), None);
        assert_eq!(pattern.parse(""), None);
    }

    #[test]
    fn rejects_padding_and_signs() {
        let pattern = DatePattern::compile("dd-MM-yyyy").unwrap();
        for input in [" 10-10-2022", "10- 10-2022", "10-10-+2022", "10-10-2022 ", "10-10--2022", "+10-10-2022"] {
            assert_eq!(pattern.parse(input), None, "input {input:?}");
        }
    }

    #[test]
    fn accepts_unpadded_numbers() {
        let pattern = DatePattern::compile("dd-MM-yyyy").unwrap();
        assert_eq!(pattern.parse("1-1-2022"), Some(ymd(2022, 1, 1)));

        let compact = DatePattern::compile("yyyyMMdd").unwrap();
        assert_eq!(compact.parse("20221010"), Some(ymd(2022, 10, 10)));
        assert_eq!(compact.parse("2022 1010"), None);

        let spaced = DatePattern::compile("d MMM yyyy").unwrap();
        assert_eq!(spaced.parse("5 Mar 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(spaced.parse("5  Mar 2021"), None);
    }

    #[test]
    fn rejects_unsupported_patterns() {
        for pattern in ["dd-MM-yyyy HH:mm", "EEE dd MM yyyy", "MM-yyyy", "dd-'MM-yyyy", "ddd-MM-yyyy"] {
            let err = DatePattern::compile(pattern).unwrap_err();
            assert!(
                matches!(err, FieldTypeError::InvalidDateFormat { .. }),
                "pattern {pattern}"
            );
        }
    }
}
