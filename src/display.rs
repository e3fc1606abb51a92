use crate::errors::RosterError;
use crate::model::{STUDY_PROGRAMS, Student, study_program_name};
use std::io::Write;

pub fn display_students(students: &[Student]) {
    for s in students {
        match study_program_name(&s.study_program) {
            Some(program) => println!("  - {} {} ({}: {})", s.id, s.name, s.study_program, program),
            None => println!("  - {} {} ({}: unknown program)", s.id, s.name, s.study_program),
        }
    }
    println!("Students: {}", students.len());
}

pub fn display_study_programs() {
    println!("Study programs:");
    for (code, name) in STUDY_PROGRAMS {
        println!("  - {code}: {name}");
    }
}

/// Write the roster as headerless CSV, in the format accepted by the importer.
pub fn export_students<W: Write>(students: &[Student], out: W) -> Result<(), RosterError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    for s in students {
        writer.serialize(s).map_err(RosterError::Output)?;
    }
    writer
        .flush()
        .map_err(|e| RosterError::Output(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::parse_students;
    use std::path::Path;

    #[test]
    fn test_export() {
        let students = vec![
            Student::new("A12345", "Aditira", "TI"),
            Student::new("C00001", "Budi, Jr.", "SI"),
        ];
        let mut out = Vec::new();
        export_students(&students, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "A12345,Aditira,TI\nC00001,\"Budi, Jr.\",SI\n"
        );
        assert_eq!(parse_students(Path::new("export.csv"), &out).unwrap(), students);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_export_failure() {
        let students = vec![Student::new("A12345", "Aditira", "TI")];
        assert!(matches!(
            export_students(&students, ClosedPipe),
            Err(RosterError::Output(_))
        ));
    }
}
