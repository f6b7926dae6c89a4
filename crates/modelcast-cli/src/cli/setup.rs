use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "modelcast",
    bin_name = "modelcast",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Cast, validate and describe JSON documents with typed models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Definition file (TOML or JSON) declaring the models
    #[arg(short, long, global = true, help_heading = "Options")]
    pub defs: Option<PathBuf>,

    /// Config file
    #[arg(short, long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true, help_heading = "Options")]
    pub compact: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List defined models and their attributes
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Print the schema of a model
    #[command(display_order = 2)]
    Schema {
        /// Model name
        model: String,
    },

    /// Cast a JSON document through a model and print its serialized form
    #[command(display_order = 3)]
    Cast {
        /// Model name
        model: String,

        /// JSON input file (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Only include these attributes (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Leave out these attributes (comma separated)
        #[arg(long, value_delimiter = ',')]
        except: Vec<String>,
    },

    /// Check a JSON document against a model
    #[command(alias = "check", display_order = 4)]
    Validate {
        /// Model name
        model: String,

        /// JSON input file (stdin when omitted or "-")
        input: Option<PathBuf>,
    },

    /// Print the display form of a JSON document cast through a model
    #[command(display_order = 5)]
    Show {
        /// Model name
        model: String,

        /// JSON input file (stdin when omitted or "-")
        input: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["modelcast", "schema", "Contact", "--defs", "models.toml", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.defs, Some(PathBuf::from("models.toml")));
        assert!(matches!(cli.command, Commands::Schema { model } if model == "Contact"));
    }

    #[test]
    fn splits_filter_lists_on_commas() {
        let cli = Cli::try_parse_from([
            "modelcast",
            "cast",
            "Contact",
            "input.json",
            "--only",
            "name,birthday",
            "--except",
            "phones",
        ])
        .unwrap();
        match cli.command {
            Commands::Cast {
                input,
                only,
                except,
                ..
            } => {
                assert_eq!(input, Some(PathBuf::from("input.json")));
                assert_eq!(only, vec!["name", "birthday"]);
                assert_eq!(except, vec!["phones"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn input_is_optional() {
        let cli = Cli::try_parse_from(["modelcast", "check", "Point"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { input: None, .. }));
    }

    #[test]
    fn verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
