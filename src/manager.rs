use crate::config::Config;
use crate::errors::{NotFound, RosterError};
use crate::loaders;
use crate::model::{Student, is_study_program, study_program_name};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

pub struct StudentManager {
    students: Vec<Student>,
    login_attempts: HashMap<String, u32>,
    max_login_attempts: u32,
    import_delay: Duration,
    submission_latency: Duration,
}

impl Default for StudentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentManager {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            students: vec![
                Student::new("A12345", "Aditira", "TI"),
                Student::new("B21313", "Dito", "TK"),
                Student::new("A34555", "Afis", "MI"),
            ],
            login_attempts: HashMap::new(),
            max_login_attempts: config.login.max_attempts,
            import_delay: config.import_delay(),
            submission_latency: config.submission_latency(),
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn login(&mut self, id: &str, name: &str) -> Result<String, RosterError> {
        if id.is_empty() || name.is_empty() {
            return Err(RosterError::Validation("ID and Name must not be empty"));
        }
        let attempts = self.login_attempts.get(id).copied().unwrap_or(0);
        if attempts >= self.max_login_attempts {
            warn!(id, attempts, "login refused, too many failed attempts");
            return Err(RosterError::LockedOut);
        }
        match self
            .students
            .iter()
            .find(|s| s.id == id && s.name == name)
        {
            Some(student) => {
                if attempts > 0 {
                    self.login_attempts.insert(id.to_owned(), 0);
                }
                info!(%student, "login succeeded");
                Ok(format!(
                    "Login berhasil: Selamat datang {name}! Kamu terdaftar di program studi: {}",
                    Self::study_program_name(&student.study_program)
                ))
            }
            None => {
                let attempts = self.login_attempts.entry(id.to_owned()).or_default();
                *attempts += 1;
                warn!(id, attempts = *attempts, "login failed");
                Err(NotFound::Credentials.into())
            }
        }
    }

    pub fn register(
        &mut self,
        id: &str,
        name: &str,
        study_program: &str,
    ) -> Result<String, RosterError> {
        if id.is_empty() || name.is_empty() || study_program.is_empty() {
            return Err(RosterError::Validation(
                "ID, Name or StudyProgram is undefined!",
            ));
        }
        if self.students.iter().any(|s| s.id == id) {
            warn!(id, "registration refused, identifier already in use");
            return Err(RosterError::Duplicate);
        }
        if !is_study_program(study_program) {
            return Err(RosterError::InvalidProgram(study_program.to_owned()));
        }
        let student = Student::new(id, name, study_program);
        info!(%student, "student registered");
        self.students.push(student);
        Ok(format!("Registrasi berhasil: {name} ({study_program})"))
    }

    pub fn study_program(code: &str) -> Result<&'static str, RosterError> {
        study_program_name(code).ok_or(NotFound::StudyProgram.into())
    }

    /// Display name of a study program, or an empty string for an unknown code.
    pub fn study_program_name(code: &str) -> &'static str {
        study_program_name(code).unwrap_or_default()
    }

    /// Apply `modifier` to the first student called `name`.
    pub fn modify_student<F>(&mut self, name: &str, modifier: F) -> Result<String, RosterError>
    where
        F: FnOnce(&mut Student),
    {
        let student = self
            .students
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or(NotFound::Student)?;
        modifier(&mut *student);
        info!(%student, "student modified");
        Ok("Program studi mahasiswa berhasil diubah.".to_owned())
    }

    /// Modifier moving a student to another study program. The code is not
    /// checked against the catalog.
    pub fn change_study_program(study_program: &str) -> impl FnOnce(&mut Student) + use<> {
        let study_program = study_program.to_owned();
        move |student| student.study_program = study_program
    }

    /// Import student files concurrently, one task per file. Batches are
    /// appended in the order the tasks complete. The first reported error is
    /// returned and batches merged before it are kept.
    #[instrument(skip_all, fields(files = paths.len()))]
    pub async fn import_students<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), RosterError> {
        if paths.is_empty() {
            return Ok(());
        }
        let (tx, mut rx) = mpsc::channel(paths.len());
        for path in paths {
            let path = path.as_ref().to_owned();
            let tx = tx.clone();
            let delay = self.import_delay;
            tokio::spawn(async move {
                let result = loaders::load_students(path, delay).await;
                // The receiver is gone if another file already failed.
                let _ = tx.send(result).await;
            });
        }
        drop(tx);
        self.merge_batches(rx, paths.len()).await
    }

    /// Append batches as they arrive until `pending` have been reported.
    async fn merge_batches(
        &mut self,
        mut rx: mpsc::Receiver<Result<Vec<Student>, RosterError>>,
        mut pending: usize,
    ) -> Result<(), RosterError> {
        while pending > 0 {
            match rx.recv().await {
                Some(Ok(batch)) => {
                    pending -= 1;
                    debug!(students = batch.len(), pending, "merging imported batch");
                    self.students.extend(batch);
                }
                Some(Err(e)) => {
                    warn!(error = %e, "import failed");
                    return Err(e);
                }
                None => {
                    warn!(pending, "import tasks terminated without reporting");
                    return Err(RosterError::ImportAborted { pending });
                }
            }
        }
        info!(students = self.students.len(), "import complete");
        Ok(())
    }

    pub async fn submit_assignments(&self, count: usize) {
        tokio::time::sleep(self.submission_latency).await;
        debug!(count, "assignments submitted");
    }
}
