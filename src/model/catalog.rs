/// Study programs, as (code, display name) pairs.
pub const STUDY_PROGRAMS: [(&str, &str); 4] = [
    ("TI", "Teknik Informatika"),
    ("TK", "Teknik Komputer"),
    ("MI", "Manajemen Informatika"),
    ("SI", "Sistem Informasi"),
];

pub fn study_program_name(code: &str) -> Option<&'static str> {
    STUDY_PROGRAMS
        .iter()
        .find_map(|&(c, name)| if c == code { Some(name) } else { None })
}

pub fn is_study_program(code: &str) -> bool {
    study_program_name(code).is_some()
}

#[test]
fn test_study_program_name() {
    assert_eq!(study_program_name("TI"), Some("Teknik Informatika"));
    assert_eq!(study_program_name("SI"), Some("Sistem Informasi"));
    assert_eq!(study_program_name("ti"), None);
    assert_eq!(study_program_name(""), None);
    assert!(is_study_program("MI"));
    assert!(!is_study_program("XX"));
}
