use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub study_program: String,
}

impl Student {
    pub fn new(id: &str, name: &str, study_program: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            study_program: study_program.to_owned(),
        }
    }

    /// Build a student from a CSV row, using the first three fields as
    /// identifier, name and study program. Shorter rows give nothing.
    pub fn from_record(record: &csv::StringRecord) -> Option<Self> {
        match (record.get(0), record.get(1), record.get(2)) {
            (Some(id), Some(name), Some(study_program)) => {
                Some(Self::new(id, name, study_program))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.name, self.study_program)
    }
}

#[test]
fn test_from_record() {
    let record = csv::StringRecord::from(vec!["C00001", "Budi", "SI", "extra"]);
    assert_eq!(
        Student::from_record(&record),
        Some(Student::new("C00001", "Budi", "SI"))
    );
    let record = csv::StringRecord::from(vec!["C00001", "Budi"]);
    assert_eq!(Student::from_record(&record), None);
}

#[test]
fn test_display() {
    assert_eq!(
        Student::new("A12345", "Aditira", "TI").to_string(),
        "A12345 Aditira (TI)"
    );
}
