use std::io::BufRead;

use terrors::OneOf;
use tracing::{debug, trace};

use crate::error::{FormatError, FormatErrorKind, IoError};
use crate::store::{Entry, Section, Store};

/// What a single line of input turned out to be.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Section(&'a str),
    Entry { key: &'a str, value: &'a str },
}

/// Parse INI text from `reader`, stopping at the first malformed line.
///
/// Lines are read whole, so there is no limit on their length. Nothing built before a
/// failure escapes this function.
pub fn parse<R: BufRead>(mut reader: R) -> Result<Store, OneOf<(IoError, FormatError)>> {
    let mut sections = Vec::<Section>::new();
    let mut buf = String::new();
    let mut number = 0;

    loop {
        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| OneOf::new(IoError::new(None, e)))?;
        if read == 0 {
            break;
        }
        number += 1;

        let line = strip_terminator(&buf);
        match classify(line).map_err(|kind| OneOf::new(format_error(number, line, kind)))? {
            Line::Blank => {}
            Line::Section(name) => {
                debug!(line = number, section = name, "opening section");
                sections.push(Section::new(name));
            }
            Line::Entry { key, value } => {
                let Some(section) = sections.last_mut() else {
                    return Err(OneOf::new(format_error(
                        number,
                        line,
                        FormatErrorKind::EntryOutsideSection,
                    )));
                };
                trace!(line = number, section = section.name(), key, value, "entry");
                section.push(Entry::new(key, value));
            }
        }
    }

    debug!(lines = number, sections = sections.len(), "parsed ini input");
    Ok(Store::from_sections(sections))
}

fn format_error(line: usize, content: &str, kind: FormatErrorKind) -> FormatError {
    debug!(line, %kind, "malformed line");
    FormatError {
        line,
        content: content.to_owned(),
        kind,
    }
}

/// Drop a single `\n` or `\r\n`.
fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn classify(line: &str) -> Result<Line<'_>, FormatErrorKind> {
    let line = line.trim_start();

    match line.chars().next() {
        None | Some(';' | '#') => Ok(Line::Blank),
        Some('[') => line[1..]
            .split_once(']')
            .map(|(name, _)| Line::Section(name))
            .ok_or(FormatErrorKind::UnterminatedSection),
        Some('=') => Err(FormatErrorKind::EmptyKey),
        Some(_) => line
            .split_once('=')
            .map(|(key, value)| Line::Entry { key, value })
            .ok_or(FormatErrorKind::Unrecognized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str) -> Result<Store, OneOf<(IoError, FormatError)>> {
        parse(text.as_bytes())
    }

    fn format_kind(text: &str) -> (usize, FormatErrorKind) {
        let err = parse_text(text)
            .expect_err("expected input to be rejected")
            .narrow::<FormatError, _>()
            .unwrap_or_else(|_| panic!("expected a format error"));
        (err.line, err.kind)
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify(""), Ok(Line::Blank));
        assert_eq!(classify("   \t"), Ok(Line::Blank));
        assert_eq!(classify("; comment"), Ok(Line::Blank));
        assert_eq!(classify("  # comment = not an entry"), Ok(Line::Blank));
        assert_eq!(classify("[db]"), Ok(Line::Section("db")));
        assert_eq!(classify("[db] trailing"), Ok(Line::Section("db")));
        assert_eq!(classify("[]"), Ok(Line::Section("")));
        assert_eq!(
            classify("  host=localhost"),
            Ok(Line::Entry {
                key: "host",
                value: "localhost"
            })
        );
        assert_eq!(
            classify("url=a=b"),
            Ok(Line::Entry {
                key: "url",
                value: "a=b"
            })
        );
        assert_eq!(
            classify("key ="),
            Ok(Line::Entry {
                key: "key ",
                value: ""
            })
        );
        assert_eq!(classify("[db"), Err(FormatErrorKind::UnterminatedSection));
        assert_eq!(classify("=value"), Err(FormatErrorKind::EmptyKey));
        assert_eq!(classify("  =value"), Err(FormatErrorKind::EmptyKey));
        assert_eq!(classify("just words"), Err(FormatErrorKind::Unrecognized));
    }

    #[test]
    fn strips_lf_and_crlf_only() {
        assert_eq!(strip_terminator("a=b\n"), "a=b");
        assert_eq!(strip_terminator("a=b\r\n"), "a=b");
        assert_eq!(strip_terminator("a=b"), "a=b");
        assert_eq!(strip_terminator("a=b \n"), "a=b ");
    }

    #[test]
    fn single_section_in_order() {
        let store = parse_text("[db]\nhost=localhost\nport=5432\n").unwrap();

        assert_eq!(store.sections().len(), 1);
        let db = &store.sections()[0];
        assert_eq!(db.name(), "db");
        let pairs: Vec<_> = db.entries().iter().map(|e| (e.key(), e.value())).collect();
        assert_eq!(pairs, vec![("host", "localhost"), ("port", "5432")]);
    }

    #[test]
    fn comments_and_blanks_keep_section_association() {
        let store = parse_text(
            "; leading comment\n\
             [first]\n\
             a=1\n\
             \n\
             # interlude\n\
             b=2\n\
             [second]\n\
             ; nothing here yet\n\
             c=3\n",
        )
        .unwrap();

        let names: Vec<_> = store.sections().iter().map(Section::name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(store.section("first").unwrap().entries().len(), 2);
        assert_eq!(store.section("second").unwrap().get("c"), Some("3"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn crlf_input() {
        let store = parse_text("[db]\r\nhost=localhost\r\n\r\nport=5432").unwrap();

        assert_eq!(store.get("host"), Some("localhost"));
        assert_eq!(store.get("port"), Some("5432"));
    }

    #[test]
    fn long_lines_are_kept_whole() {
        let value = "x".repeat(4096);
        let store = parse_text(&format!("[big]\nblob={value}\n")).unwrap();

        assert_eq!(store.get("blob"), Some(value.as_str()));
    }

    #[test]
    fn entry_before_section_is_rejected() {
        assert_eq!(
            format_kind("# header\nkey=value\n"),
            (2, FormatErrorKind::EntryOutsideSection)
        );
    }

    #[test]
    fn unterminated_section_is_rejected() {
        assert_eq!(
            format_kind("[ok]\na=1\n[unterminated\nb=2\n"),
            (3, FormatErrorKind::UnterminatedSection)
        );
    }

    #[test]
    fn leading_equals_is_rejected() {
        assert_eq!(format_kind("[s]\n=value\n"), (2, FormatErrorKind::EmptyKey));
    }

    #[test]
    fn unrecognized_line_is_rejected() {
        assert_eq!(
            format_kind("[s]\na=1\nnot an entry\n"),
            (3, FormatErrorKind::Unrecognized)
        );
    }

    #[test]
    fn error_keeps_offending_line() {
        let err = parse_text("[s]\r\ngarbage\r\n")
            .unwrap_err()
            .narrow::<FormatError, _>()
            .unwrap_or_else(|_| panic!("expected a format error"));

        assert_eq!(err.content, "garbage");
        assert_eq!(
            err.to_string(),
            "line 2: expected `[section]`, `key=value` or a comment: \"garbage\""
        );
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = b"[s]\nkey=\xff\xfe\n";
        let err = parse(bytes).unwrap_err();

        assert!(err.narrow::<IoError, _>().is_ok());
    }

    #[test]
    fn empty_input_gives_empty_store() {
        let store = parse_text("").unwrap();

        assert!(store.sections().is_empty());
        assert!(store.is_empty());
    }
}
