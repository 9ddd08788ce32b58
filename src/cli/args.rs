//! Command line argument parsing
//!
//! Subcommands:
//! - `lookup`: Look a word up and print the canonical result
//! - `show-config`: Show configuration discovery information
//! - `init-config`: Write a default user configuration file

use crate::lexicon::types::ProviderId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    Lookup(LookupCommand),
    ShowConfig,
    InitConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCommand {
    pub word: String,
    pub from_language: Option<String>,
    pub target_language: Option<String>,
    pub provider: Option<ProviderId>,
    pub config_override: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Parser)]
#[command(name = "word-lookup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up definitions, synonyms and frequency for a word")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up a word
    Lookup {
        /// Word to look up
        word: String,
        /// Source language of the word
        #[arg(short = 'f', long = "from", value_name = "LANG")]
        from: Option<String>,
        /// Language the result should be in
        #[arg(short = 't', long = "to", value_name = "LANG")]
        to: Option<String>,
        /// Provider to query (free_dictionary or lexicala)
        #[arg(short = 'p', long = "provider", value_name = "ID")]
        provider: Option<ProviderId>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Show configuration discovery information
    ShowConfig,
    /// Create a default configuration file in the user's home directory
    InitConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Lookup {
                word,
                from,
                to,
                provider,
                config,
                json,
            }) => Ok(ExecutionMode::Lookup(LookupCommand {
                word: word.clone(),
                from_language: from.clone(),
                target_language: to.clone(),
                provider: *provider,
                config_override: config.clone(),
                json: *json,
            })),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            Some(Commands::InitConfig) => Ok(ExecutionMode::InitConfig),
            None => Err(
                "No command specified. Use 'word-lookup --help' to see available commands."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_command_parsing() {
        let args = Args::try_parse_from([
            "word-lookup",
            "lookup",
            "hola",
            "--from",
            "es",
            "--to",
            "en",
            "--provider",
            "lexicala",
            "--json",
        ])
        .unwrap();

        match args.mode().unwrap() {
            ExecutionMode::Lookup(command) => {
                assert_eq!(command.word, "hola");
                assert_eq!(command.from_language.as_deref(), Some("es"));
                assert_eq!(command.target_language.as_deref(), Some("en"));
                assert_eq!(command.provider, Some(ProviderId::Lexicala));
                assert!(command.json);
                assert!(command.config_override.is_none());
            }
            other => panic!("Expected Lookup mode, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_defaults() {
        let args = Args::try_parse_from(["word-lookup", "lookup", "hello"]).unwrap();

        match args.mode().unwrap() {
            ExecutionMode::Lookup(command) => {
                assert_eq!(command.word, "hello");
                assert!(command.from_language.is_none());
                assert!(command.target_language.is_none());
                assert!(command.provider.is_none());
                assert!(!command.json);
            }
            other => panic!("Expected Lookup mode, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result =
            Args::try_parse_from(["word-lookup", "lookup", "hello", "--provider", "wordnik"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_commands() {
        let args = Args::try_parse_from(["word-lookup", "show-config"]).unwrap();
        assert!(matches!(args.mode().unwrap(), ExecutionMode::ShowConfig));

        let args = Args::try_parse_from(["word-lookup", "init-config"]).unwrap();
        assert!(matches!(args.mode().unwrap(), ExecutionMode::InitConfig));
    }

    #[test]
    fn test_no_command_error() {
        let args = Args { command: None };
        assert!(args.mode().is_err());
    }
}
