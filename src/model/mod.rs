pub use self::catalog::{STUDY_PROGRAMS, is_study_program, study_program_name};
pub use self::student::Student;

mod catalog;
mod student;
