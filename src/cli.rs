//! Command-line argument parsing for pg2xlsx.
//!
//! Uses clap to parse CLI arguments and merge them with the config file.

use crate::config::{Config, ConnectionParams, ExportConfig, RunMode};
use crate::error::{ExportError, Result};
use crate::export::QuerySource;
use clap::Parser;
use std::path::PathBuf;

/// Export the result of a PostgreSQL query to an xlsx spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "pg2xlsx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// PostgreSQL connection URL (e.g., postgres://user@host:port/database)
    #[arg(value_name = "CONNECTION_URL")]
    pub connection_url: Option<String>,

    /// Output file
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Run a single command (ignores other input)
    #[arg(short = 'c', long, value_name = "SQL")]
    pub command: Option<String>,

    /// Execute command from file (defaults to stdin)
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Database server host
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Database server port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<String>,

    /// Database name to connect to
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub dbname: Option<String>,

    /// Database user
    #[arg(short = 'u', long, value_name = "USER")]
    pub user: Option<String>,

    /// Never prompt for password
    #[arg(short = 'w', long)]
    pub no_password: bool,

    /// Add a row for column titles
    #[arg(long)]
    pub titles: bool,

    /// Author in the xlsx document properties (defaults to current login)
    #[arg(long, value_name = "NAME")]
    pub propuser: Option<String>,

    /// Test database connection and exit
    #[arg(short = 't', long)]
    pub test: bool,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "PG2XLSX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Connection parameters given directly on the command line.
    ///
    /// Individual flags override the parts of a connection URL.
    pub fn to_connection_params(&self) -> Result<ConnectionParams> {
        let mut params = match &self.connection_url {
            Some(url) => ConnectionParams::from_connection_string(url)?,
            None => ConnectionParams::default(),
        };

        params.merge(&ConnectionParams {
            host: self.host.clone(),
            port: self.port.clone(),
            dbname: self.dbname.clone(),
            user: self.user.clone(),
            ..Default::default()
        });

        Ok(params)
    }

    /// Builds the run configuration from CLI arguments and the config file.
    ///
    /// CLI arguments take precedence over the file.
    pub fn to_export_config(&self, file: &Config) -> Result<ExportConfig> {
        let mode = if self.test {
            RunMode::TestConnection
        } else {
            let output = self
                .output
                .clone()
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or_else(|| ExportError::config("You must specify an output file name"))?;
            RunMode::Export { output }
        };

        let mut connection = file.connection.clone();
        connection.merge(&self.to_connection_params()?);

        Ok(ExportConfig {
            connection,
            query_source: QuerySource::from_options(self.command.clone(), self.file.clone()),
            mode,
            titles: self.titles || file.export.titles,
            column_width: file.export.column_width,
            author: self.propuser.clone().or_else(|| file.export.author.clone()),
            no_password: self.no_password,
        })
    }
}
