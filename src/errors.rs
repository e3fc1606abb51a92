use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Login gagal: Batas maksimum login terlampaui")]
    LockedOut,
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("Registrasi gagal: id sudah digunakan")]
    Duplicate,
    #[error("Study program {0} is not found")]
    InvalidProgram(String),
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("{pending} import tasks terminated without reporting")]
    ImportAborted { pending: usize },
    #[error("cannot write students")]
    Output(#[source] csv::Error),
}

#[derive(Debug, Error)]
pub enum NotFound {
    #[error("Login gagal: data mahasiswa tidak ditemukan")]
    Credentials,
    #[error("Study program not found")]
    StudyProgram,
    #[error("Mahasiswa tidak ditemukan")]
    Student,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("quoted field starting on line {line} is never closed")]
    UnterminatedQuote { line: u64 },
    #[error("bare \" in non-quoted field on line {line}")]
    BareQuote { line: u64 },
    #[error("extraneous \" in quoted field on line {line}")]
    ExtraneousQuote { line: u64 },
}
