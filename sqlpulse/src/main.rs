use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use sqlpulse::config::{self, Config, DiffOptions, DumpFormat, DumpOptions, LoggingConfig, OutputFormat};
use sqlpulse::utils::logging::init_logging;
use sqlpulse::{output, SnapshotExtractor, SqlPulseClient};

#[derive(Parser)]
#[command(name = "sqlpulse")]
#[command(author, version, about = "Structural schema diff and DDL export for SQL Server databases")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the full DDL of a schema snapshot
    Dump {
        /// Schema snapshot (.json, .yaml or .yml)
        #[arg(short, long)]
        input: PathBuf,

        /// Export format
        #[arg(short, long, value_enum)]
        format: Option<DumpFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Compare two schema snapshots
    Diff {
        /// Snapshot of the desired schema
        #[arg(short, long)]
        source: PathBuf,

        /// Snapshot of the schema to migrate
        #[arg(short, long)]
        target: PathBuf,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Print a migration script after the report
        #[arg(long)]
        generate_migration: bool,

        /// Write the migration script to this file (implies --generate-migration)
        #[arg(long)]
        migration_file: Option<String>,

        /// Ignore collation differences
        #[arg(long)]
        ignore_collation: bool,

        /// Collapse whitespace before comparing definitions
        #[arg(long, value_name = "BOOL")]
        ignore_whitespace: Option<bool>,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Category toggles and name filters shared by both commands
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only these schemas (comma separated)
    #[arg(long, value_delimiter = ',')]
    schema: Vec<String>,

    /// Only these tables (comma separated)
    #[arg(long, value_delimiter = ',')]
    table: Vec<String>,

    #[arg(long)]
    no_tables: bool,

    #[arg(long)]
    no_views: bool,

    #[arg(long)]
    no_procedures: bool,

    #[arg(long)]
    no_functions: bool,

    #[arg(long)]
    no_triggers: bool,

    #[arg(long)]
    no_indexes: bool,

    #[arg(long)]
    no_foreign_keys: bool,

    /// Skip check constraints
    #[arg(long)]
    no_constraints: bool,
}

/// Option sets sharing the category toggles and name filters
trait CategoryFilters {
    /// Toggles in the order of [`FilterArgs::skipped`]
    fn toggles(&mut self) -> [&mut bool; 8];
    fn name_filters(&mut self) -> (&mut Vec<String>, &mut Vec<String>);
}

macro_rules! impl_category_filters {
    ($($options:ty),*) => {$(
        impl CategoryFilters for $options {
            fn toggles(&mut self) -> [&mut bool; 8] {
                [
                    &mut self.include_tables,
                    &mut self.include_views,
                    &mut self.include_procedures,
                    &mut self.include_functions,
                    &mut self.include_triggers,
                    &mut self.include_indexes,
                    &mut self.include_foreign_keys,
                    &mut self.include_constraints,
                ]
            }

            fn name_filters(&mut self) -> (&mut Vec<String>, &mut Vec<String>) {
                (&mut self.schema_filter, &mut self.table_filter)
            }
        }
    )*};
}

impl_category_filters!(DiffOptions, DumpOptions);

impl FilterArgs {
    fn skipped(&self) -> [bool; 8] {
        [
            self.no_tables,
            self.no_views,
            self.no_procedures,
            self.no_functions,
            self.no_triggers,
            self.no_indexes,
            self.no_foreign_keys,
            self.no_constraints,
        ]
    }

    /// Switch off skipped categories and replace the name filters given
    fn apply(&self, options: &mut impl CategoryFilters) {
        for (include, skip) in options.toggles().into_iter().zip(self.skipped()) {
            *include &= !skip;
        }

        let (schema_filter, table_filter) = options.name_filters();
        if !self.schema.is_empty() {
            *schema_filter = self.schema.clone();
        }
        if !self.table.is_empty() {
            *table_filter = self.table.clone();
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(level) = &cli.log_level {
        let logging = config.logging.get_or_insert_with(LoggingConfig::default);
        logging.level = level.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Dump {
            input,
            format,
            output,
            filters,
        } => {
            filters.apply(&mut config.dump);
            if let Some(format) = format {
                config.dump.format = format;
            }
            config.validate()?;
            init_logging(&config.logging)?;

            let client = SqlPulseClient::new(config);
            let dumped = client
                .dump(&SnapshotExtractor::new(&input))
                .await
                .with_context(|| format!("Failed to export {}", input.display()))?;

            output::emit(output.as_deref(), &dumped.content)?;
            if let Some(path) = &output {
                eprintln!("DDL written to {}", path);
            }
            eprintln!("\n{}", dumped.stats);
        }
        Commands::Diff {
            source,
            target,
            format,
            generate_migration,
            migration_file,
            ignore_collation,
            ignore_whitespace,
            filters,
        } => {
            filters.apply(&mut config.diff);
            config.diff.ignore_collation |= ignore_collation;
            if let Some(ignore_whitespace) = ignore_whitespace {
                config.diff.ignore_whitespace = ignore_whitespace;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            config.output.generate_migration |= generate_migration;
            if migration_file.is_some() {
                config.output.migration_file = migration_file;
            }
            config.validate()?;
            init_logging(&config.logging)?;

            let client = SqlPulseClient::new(config);
            let result = client
                .diff(&SnapshotExtractor::new(source), &SnapshotExtractor::new(target))
                .await?;

            if !result.has_differences() {
                println!("Schemas are identical");
                return Ok(());
            }

            output::write_stdout(&client.report(&result))?;

            let output_config = &client.config().output;
            if output_config.wants_migration() {
                let script = client.migration_script(&result);
                match &output_config.migration_file {
                    Some(path) => {
                        output::write_file(path, &script)
                            .with_context(|| format!("Failed to write migration file {}", path))?;
                        eprintln!("Migration script written to {}", path);
                    }
                    None => output::write_stdout(&format!("\n{}", script))?,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diff_filters(args: &[&str]) -> FilterArgs {
        let argv = ["sqlpulse", "diff", "-s", "dev.json", "-t", "prod.json"];
        let cli = Cli::try_parse_from(argv.iter().chain(args)).unwrap();
        match cli.command {
            Commands::Diff { filters, .. } => filters,
            Commands::Dump { .. } => panic!("expected the diff command"),
        }
    }

    #[test]
    fn test_filters_apply_to_both_option_sets() {
        let filters = diff_filters(&["--no-views", "--no-foreign-keys", "--table", "Users,Orders"]);

        let mut diff = DiffOptions::default();
        filters.apply(&mut diff);
        let mut dump = DumpOptions::default();
        filters.apply(&mut dump);

        for (views, foreign_keys, tables, table_filter) in [
            (diff.include_views, diff.include_foreign_keys, diff.include_tables, &diff.table_filter),
            (dump.include_views, dump.include_foreign_keys, dump.include_tables, &dump.table_filter),
        ] {
            assert!(!views);
            assert!(!foreign_keys);
            assert!(tables);
            assert_eq!(table_filter, &vec!["Users".to_string(), "Orders".to_string()]);
        }
    }

    #[test]
    fn test_filters_never_reenable_a_category() {
        let mut diff = DiffOptions {
            include_triggers: false,
            schema_filter: vec!["dbo".to_string()],
            ..DiffOptions::default()
        };
        diff_filters(&[]).apply(&mut diff);

        assert!(!diff.include_triggers);
        assert_eq!(diff.schema_filter, vec!["dbo"]);
    }
}
