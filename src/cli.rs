use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(
    name = "dbbackup",
    version,
    about = "Back up and restore databases with their native dump tools"
)]
pub struct Cli {
    /// Source database connection string (URL or key=value form)
    #[arg(long)]
    pub source: Option<String>,

    /// Target backup location (file path or storage key)
    #[arg(long)]
    pub target: Option<String>,

    /// Operation to run: backup or restore
    #[arg(long = "op", value_name = "OP")]
    pub operation: Option<String>,

    /// Storage backend: local or s3
    #[arg(long)]
    pub storage: Option<String>,

    /// Database type to assume when the connection string names none
    #[arg(long = "type", value_name = "TYPE")]
    pub db_type: Option<String>,

    /// JSON file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

const LONG_FLAGS: &[&str] = &[
    "source", "target", "op", "storage", "type", "config", "help", "version",
];

/// Accepts single-dash long flags (`-source=...`, `-op backup`) by rewriting
/// them to their double-dash form before clap sees them.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    let mut normalized = Vec::new();

    for (index, arg) in args.into_iter().enumerate() {
        if index == 0 || passthrough {
            normalized.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|text| {
            if text == "--" {
                passthrough = true;
                return None;
            }
            let name = text.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
            let name = name.split_once('=').map_or(name, |(name, _)| name);
            LONG_FLAGS.contains(&name).then(|| OsString::from(format!("-{}", text)))
        });
        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let args = args.iter().map(OsString::from);
        Cli::try_parse_from(normalize_args(args)).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn accepts_single_dash_long_flags() {
        let cli = parse(&[
            "dbbackup",
            "-op=backup",
            "-source=postgres://admin:pw@localhost:5432/sampledb",
            "-target",
            "./backups/x.sql",
            "-storage=local",
        ]);

        assert_eq!(cli.operation.as_deref(), Some("backup"));
        assert_eq!(
            cli.source.as_deref(),
            Some("postgres://admin:pw@localhost:5432/sampledb")
        );
        assert_eq!(cli.target.as_deref(), Some("./backups/x.sql"));
        assert_eq!(cli.storage.as_deref(), Some("local"));
    }

    #[test]
    fn accepts_double_dash_flags_and_key_value_sources() {
        let cli = parse(&[
            "dbbackup",
            "--source",
            "host=db user=app dbname=orders",
            "--type=postgres",
        ]);

        assert_eq!(cli.source.as_deref(), Some("host=db user=app dbname=orders"));
        assert_eq!(cli.db_type.as_deref(), Some("postgres"));
        assert_eq!(cli.operation, None);
    }

    #[test]
    fn leaves_unknown_and_positional_args_alone() {
        let args = ["dbbackup", "-x", "-sourcefoo", "--", "-source"].map(OsString::from);
        let normalized = normalize_args(args.clone());
        assert_eq!(normalized, args.to_vec());
    }

    #[test]
    fn empty_values_are_accepted() {
        let cli = parse(&["dbbackup", "-source="]);
        assert_eq!(cli.source.as_deref(), Some(""));
    }
}
