use crate::display;
use crate::errors::RosterError;
use crate::manager::StudentManager;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, instrument};

const USAGE: &str = "\
Commands:
  list                       show the roster
  export                     print the roster as CSV
  login ID NAME              log a student in
  register ID NAME PROGRAM   register a new student
  program CODE               show a study program name
  programs                   list study programs
  change NAME PROGRAM        change the study program of a student
  import PATH...             import students from CSV files
  submit COUNT               submit assignments
  help                       show this message
  quit                       leave the shell";

#[derive(Debug, Eq, PartialEq)]
pub enum Command {
    List,
    Export,
    Login { id: String, name: String },
    Register { id: String, name: String, study_program: String },
    Program { code: String },
    Programs,
    Change { name: String, study_program: String },
    Import { paths: Vec<PathBuf> },
    Submit { count: usize },
    Help,
    Quit,
}

impl Command {
    /// Parse a shell line. Blank lines and comments give `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words = line.split_whitespace().collect::<Vec<_>>();
        let command = match words[..] {
            ["list"] => Command::List,
            ["export"] => Command::Export,
            ["login", id, name] => Command::Login {
                id: id.to_owned(),
                name: name.to_owned(),
            },
            ["register", id, name, study_program] => Command::Register {
                id: id.to_owned(),
                name: name.to_owned(),
                study_program: study_program.to_owned(),
            },
            ["program", code] => Command::Program {
                code: code.to_owned(),
            },
            ["programs"] => Command::Programs,
            ["change", name, study_program] => Command::Change {
                name: name.to_owned(),
                study_program: study_program.to_owned(),
            },
            ["import", ref paths @ ..] if !paths.is_empty() => Command::Import {
                paths: paths.iter().map(PathBuf::from).collect(),
            },
            ["submit", count] => Command::Submit {
                count: count
                    .parse()
                    .map_err(|_| format!("invalid assignment count: {count}"))?,
            },
            ["help"] => Command::Help,
            ["quit" | "exit"] => Command::Quit,
            _ => return Err(format!("cannot understand `{line}`, try `help`")),
        };
        Ok(Some(command))
    }
}

/// Run a command against the manager. Returns the message to show, if any.
pub async fn execute(
    manager: &mut StudentManager,
    command: Command,
) -> Result<Option<String>, RosterError> {
    let message = match command {
        Command::List => {
            display::display_students(manager.students());
            None
        }
        Command::Export => {
            display::export_students(manager.students(), std::io::stdout())?;
            None
        }
        Command::Login { id, name } => Some(manager.login(&id, &name)?),
        Command::Register {
            id,
            name,
            study_program,
        } => Some(manager.register(&id, &name, &study_program)?),
        Command::Program { code } => Some(StudentManager::study_program(&code)?.to_owned()),
        Command::Programs => {
            display::display_study_programs();
            None
        }
        Command::Change {
            name,
            study_program,
        } => Some(manager.modify_student(
            &name,
            StudentManager::change_study_program(&study_program),
        )?),
        Command::Import { paths } => {
            manager.import_students(&paths).await?;
            Some(format!("Students: {}", manager.students().len()))
        }
        Command::Submit { count } => {
            manager.submit_assignments(count).await;
            Some(format!("{count} assignments submitted"))
        }
        Command::Help => Some(USAGE.to_owned()),
        Command::Quit => None,
    };
    Ok(message)
}

/// Read commands line by line until the input ends or `quit` is entered.
#[instrument(skip_all)]
pub async fn run<R: AsyncBufRead + Unpin>(manager: &mut StudentManager, input: R) -> Result<()> {
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.wrap_err("cannot read command")? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        debug!(?command, "executing command");
        if command == Command::Quit {
            break;
        }
        match execute(manager, command).await {
            Ok(Some(message)) => println!("{message}"),
            Ok(None) => (),
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::NotFound;
    use std::io::Write;

    fn quick_manager() -> StudentManager {
        let config = Config::parse("[import]\ndelay_ms = 0\n[assignments]\nlatency_ms = 0\n").unwrap();
        StudentManager::with_config(&config)
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("  list ").unwrap(), Some(Command::List));
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# login A12345 Aditira").unwrap(), None);
        assert_eq!(
            Command::parse("login A12345 Aditira").unwrap(),
            Some(Command::Login {
                id: "A12345".to_owned(),
                name: "Aditira".to_owned()
            })
        );
        assert_eq!(
            Command::parse("import a.csv b.csv").unwrap(),
            Some(Command::Import {
                paths: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]
            })
        );
        assert_eq!(
            Command::parse("submit 4").unwrap(),
            Some(Command::Submit { count: 4 })
        );
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("login A12345").is_err());
        assert!(Command::parse("import").is_err());
        assert!(Command::parse("submit many").is_err());
        assert!(Command::parse("delete A12345").is_err());
    }

    #[tokio::test]
    async fn test_execute() {
        let mut manager = quick_manager();
        let register = Command::parse("register C00001 Budi SI").unwrap().unwrap();
        assert_eq!(
            execute(&mut manager, register).await.unwrap().as_deref(),
            Some("Registrasi berhasil: Budi (SI)")
        );
        let change = Command::parse("change Budi TK").unwrap().unwrap();
        execute(&mut manager, change).await.unwrap();
        assert_eq!(manager.students()[3].study_program, "TK");
        let program = Command::parse("program XX").unwrap().unwrap();
        assert!(matches!(
            execute(&mut manager, program).await,
            Err(RosterError::NotFound(NotFound::StudyProgram))
        ));
    }

    #[tokio::test]
    async fn test_run_keeps_state() {
        let mut manager = quick_manager();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "C00001,Budi,SI").unwrap();
        let script = format!(
            "login A12345 Wrong\nlogin A12345 Wrong\nlogin A12345 Wrong\nbogus\nimport {}\nquit\nregister C00002 Sari TK\n",
            file.path().display()
        );
        run(&mut manager, script.as_bytes()).await.unwrap();
        assert_eq!(manager.students().len(), 4);
        assert!(matches!(
            manager.login("A12345", "Aditira"),
            Err(RosterError::LockedOut)
        ));
    }
}
