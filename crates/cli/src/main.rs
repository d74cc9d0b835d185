use anyhow::{bail, Context};
use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use dtr_core::{parse_test_fields, CoreConfig, DiagnosticTest, DiagnosticTestStore, RecordError};

#[derive(Parser)]
#[command(name = "dtr")]
#[command(about = "Diagnostic test records CLI")]
struct Cli {
    /// SQLite location, e.g. sqlite://diagnostic_tests.db
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all diagnostic tests, newest first
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one diagnostic test as JSON
    Show {
        /// Record id
        id: String,
    },
    /// Create a diagnostic test
    Create {
        #[arg(long)]
        patient_name: String,
        #[arg(long)]
        test_type: String,
        #[arg(long)]
        result: String,
        /// Test date (YYYY-MM-DD)
        #[arg(long)]
        test_date: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a diagnostic test
    Delete {
        /// Record id
        id: String,
    },
    /// Apply pending schema migrations and report the schema version
    Migrate,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'dtr --help' for commands");
        return Ok(());
    };

    let config = CoreConfig::from_database_url(cli.database_url).context("invalid database url")?;
    let store = DiagnosticTestStore::open(&config)
        .with_context(|| format!("failed to open store at {}", config.database()))?;

    let output = execute(command, &store)?;
    println!("{output}");

    store.close()?;
    Ok(())
}

fn execute(command: Commands, store: &DiagnosticTestStore) -> anyhow::Result<String> {
    match command {
        Commands::List { json } => {
            let tests = store.find_all()?;
            if json {
                return Ok(serde_json::to_string_pretty(&tests)?);
            }
            if tests.is_empty() {
                return Ok("No diagnostic tests found.".to_string());
            }
            Ok(tests.iter().map(summary_line).collect::<Vec<_>>().join("\n"))
        }
        Commands::Show { id } => match store.find_one(&id)? {
            Some(test) => Ok(serde_json::to_string_pretty(&test)?),
            None => bail!("Diagnostic test not found: {id}"),
        },
        Commands::Create {
            patient_name,
            test_type,
            result,
            test_date,
            notes,
        } => {
            let fields = parse_test_fields(&serde_json::json!({
                "patientName": patient_name,
                "testType": test_type,
                "result": result,
                "testDate": test_date,
                "notes": notes,
            }))?;
            let test = store.create(fields)?;
            Ok(format!("Created diagnostic test with ID: {}", test.id))
        }
        Commands::Delete { id } => match store.delete(&id) {
            Ok(()) => Ok(format!("Deleted diagnostic test: {id}")),
            Err(RecordError::NotFound { .. }) => bail!("Diagnostic test not found: {id}"),
            Err(e) => Err(e.into()),
        },
        Commands::Migrate => Ok(format!("Schema version: {}", store.schema_version()?)),
    }
}

fn summary_line(test: &DiagnosticTest) -> String {
    format!(
        "ID: {}, Patient: {}, Test: {}, Result: {}, Date: {}, Created: {}",
        test.id,
        test.patient_name,
        test.test_type,
        test.result,
        test.test_date,
        test.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn create(store: &DiagnosticTestStore, patient_name: &str) -> String {
        let output = execute(
            Commands::Create {
                patient_name: patient_name.into(),
                test_type: "Blood Panel".into(),
                result: "Normal".into(),
                test_date: "2024-01-15".into(),
                notes: None,
            },
            store,
        )
        .unwrap();
        output.rsplit(' ').next().unwrap().to_string()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_arguments() {
        let cli = Cli::try_parse_from([
            "dtr",
            "--database-url",
            "sqlite::memory:",
            "create",
            "--patient-name",
            "Jane Doe",
            "--test-type",
            "CBC",
            "--result",
            "Normal",
            "--test-date",
            "2024-01-15",
        ])
        .unwrap();
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(
            cli.command,
            Some(Commands::Create { notes: None, .. })
        ));
    }

    #[test]
    fn create_then_list_and_show() {
        let store = DiagnosticTestStore::open_in_memory().unwrap();
        let id = create(&store, "Jane Doe");

        let listed = execute(Commands::List { json: false }, &store).unwrap();
        assert!(listed.contains(&format!("ID: {id}")));
        assert!(listed.contains("Patient: Jane Doe"));

        let shown = execute(Commands::Show { id: id.clone() }, &store).unwrap();
        let json: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(json["patientName"], "Jane Doe");
    }

    #[test]
    fn create_rejects_invalid_fields() {
        let store = DiagnosticTestStore::open_in_memory().unwrap();
        let err = execute(
            Commands::Create {
                patient_name: "J".into(),
                test_type: "Blood Panel".into(),
                result: "Normal".into(),
                test_date: "not a date".into(),
                notes: None,
            },
            &store,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Patient name must be at least 2 characters."));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn delete_unknown_id_fails() {
        let store = DiagnosticTestStore::open_in_memory().unwrap();
        let err = execute(Commands::Delete { id: "missing".into() }, &store).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn delete_removes_record() {
        let store = DiagnosticTestStore::open_in_memory().unwrap();
        let id = create(&store, "Jane Doe");
        execute(Commands::Delete { id }, &store).unwrap();
        let listed = execute(Commands::List { json: false }, &store).unwrap();
        assert_eq!(listed, "No diagnostic tests found.");
    }

    #[test]
    fn migrate_reports_schema_version() {
        let store = DiagnosticTestStore::open_in_memory().unwrap();
        let output = execute(Commands::Migrate, &store).unwrap();
        assert_eq!(output, "Schema version: 1");
    }
}
