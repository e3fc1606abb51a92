use crate::errors::{ParseError, RosterError};
use crate::model::Student;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Read and parse a student file, then wait for `delay` before handing the
/// batch back.
pub async fn load_students(path: PathBuf, delay: Duration) -> Result<Vec<Student>, RosterError> {
    let contents = tokio::fs::read(&path)
        .await
        .map_err(|source| RosterError::Io {
            path: path.clone(),
            source,
        })?;
    let students = parse_students(&path, &contents)?;
    debug!(path = %path.display(), students = students.len(), "student file parsed");
    tokio::time::sleep(delay).await;
    Ok(students)
}

/// Parse headerless CSV contents. All rows must have the same number of
/// fields and quotes must be balanced; rows with less than three fields are
/// dropped.
pub fn parse_students(path: &Path, contents: &[u8]) -> Result<Vec<Student>, RosterError> {
    let parse_error = |source: ParseError| RosterError::Parse {
        path: path.to_owned(),
        source,
    };
    check_quotes(contents).map_err(parse_error)?;
    let records = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(contents)
        .into_records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| parse_error(e.into()))?;
    Ok(records
        .iter()
        .filter_map(|record| {
            let student = Student::from_record(record);
            if student.is_none() {
                trace!(path = %path.display(), ?record, "dropping short record");
            }
            student
        })
        .collect())
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted { opened_on: u64 },
    QuoteInQuoted { opened_on: u64 },
}

/// Reject quoting the csv reader would otherwise accept: a quote inside a
/// non-quoted field, anything but a separator or another quote after a
/// closing quote, and a quoted field running to the end of the input.
fn check_quotes(contents: &[u8]) -> Result<(), ParseError> {
    use QuoteState::*;
    let mut state = FieldStart;
    let mut line = 1;
    for &b in contents {
        state = match (state, b) {
            (FieldStart, b'"') => Quoted { opened_on: line },
            (FieldStart | Unquoted, b'"') => return Err(ParseError::BareQuote { line }),
            (FieldStart | Unquoted | QuoteInQuoted { .. }, b',' | b'\n' | b'\r') => FieldStart,
            (FieldStart | Unquoted, _) => Unquoted,
            (Quoted { opened_on }, b'"') => QuoteInQuoted { opened_on },
            (Quoted { opened_on }, _) => Quoted { opened_on },
            (QuoteInQuoted { opened_on }, b'"') => Quoted { opened_on },
            (QuoteInQuoted { .. }, _) => return Err(ParseError::ExtraneousQuote { line }),
        };
        if b == b'\n' {
            line += 1;
        }
    }
    match state {
        Quoted { opened_on } => Err(ParseError::UnterminatedQuote { line: opened_on }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(contents: &str) -> Result<Vec<Student>, RosterError> {
        parse_students(Path::new("students.csv"), contents.as_bytes())
    }

    #[test]
    fn test_parse() {
        let students = parse("C00001,Budi,SI\nC00002,Sari,TK\n").unwrap();
        assert_eq!(
            students,
            vec![
                Student::new("C00001", "Budi", "SI"),
                Student::new("C00002", "Sari", "TK"),
            ]
        );
    }

    #[test]
    fn test_first_row_is_data() {
        let students = parse("id,name,study_program\nC00001,Budi,SI\n").unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].id, "id");
    }

    #[test]
    fn test_short_rows_are_dropped() {
        assert!(parse("C00001,Budi\nC00002,Sari\n").unwrap().is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let students = parse("C00001,Budi,SI,2024\n").unwrap();
        assert_eq!(students, vec![Student::new("C00001", "Budi", "SI")]);
    }

    #[test]
    fn test_quoted_fields() {
        let students = parse("C00001,\"Budi, Jr.\",SI\n").unwrap();
        assert_eq!(students[0].name, "Budi, Jr.");
    }

    #[test]
    fn test_unbalanced_quote() {
        assert!(matches!(
            parse("C00001,\"Budi,SI\nC00002,Sari,TK\n"),
            Err(RosterError::Parse {
                source: ParseError::UnterminatedQuote { line: 1 },
                ..
            })
        ));
    }

    #[test]
    fn test_bare_quote() {
        assert!(matches!(
            parse("C00001,Budi,SI\nC00002,Sa\"ri,TK\n"),
            Err(RosterError::Parse {
                source: ParseError::BareQuote { line: 2 },
                ..
            })
        ));
    }

    #[test]
    fn test_text_after_closing_quote() {
        assert!(matches!(
            parse("C00001,\"Budi\"x,SI\n"),
            Err(RosterError::Parse {
                source: ParseError::ExtraneousQuote { line: 1 },
                ..
            })
        ));
    }

    #[test]
    fn test_escaped_quotes_and_line_breaks() {
        let students =
            parse("C00001,\"Budi \"\"BB\"\"\",SI\r\nC00002,\"Sari\nDewi\",TK\r\n").unwrap();
        assert_eq!(students[0].name, "Budi \"BB\"");
        assert_eq!(students[1].name, "Sari\nDewi");
    }

    #[test]
    fn test_inconsistent_field_counts() {
        assert!(matches!(
            parse("C00001,Budi,SI\nC00002,Sari\n"),
            Err(RosterError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_students(dir.path().join("missing.csv"), Duration::ZERO).await;
        assert!(matches!(result, Err(RosterError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "C00001,Budi,SI").unwrap();
        let students = load_students(file.path().to_owned(), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(students, vec![Student::new("C00001", "Budi", "SI")]);
    }
}
