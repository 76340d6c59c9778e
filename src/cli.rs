use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(name = "js-packager", version)]
#[command(about = "Package a JavaScript/Node.js project into a zip for static analysis")]
pub struct Cli {
    /// Path of the project to package
    #[arg(long)]
    pub source: String,

    /// Directory the archive is written to
    #[arg(long, default_value = ".")]
    pub target: String,

    /// Test folder to leave out, relative to the source (turns off test-name heuristics)
    #[arg(long)]
    pub tests: Option<String>,

    /// Config file to read instead of ~/.config/js-packager/config.toml
    #[arg(long)]
    pub config: Option<String>,

    /// Log more detail (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn target_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["js-packager", "--source", "app"]).unwrap();

        assert_eq!(cli.target, ".");
        assert!(cli.tests.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["js-packager"]).is_err());
    }

    #[test]
    fn verbose_is_counted() {
        let cli = Cli::try_parse_from(["js-packager", "--source", "app", "-vv"]).unwrap();

        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["js-packager", "--source", "app", "-q", "-v"]).is_err());
    }
}
