use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bundle a project's source files into a single Markdown document"
)]
pub struct Cli {
    /// Directory to scan
    pub path: Option<PathBuf>,

    /// Extension to collect: dart, py or sql
    pub extension: Option<String>,

    /// YAML project file providing path, extension, title and exclude_dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Document title (defaults to the directory name)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Directory names to skip entirely (repeatable or comma-separated)
    #[arg(short = 'x', long = "exclude-dir", value_name = "NAME", value_delimiter = ',')]
    pub exclude_dir: Vec<String>,

    /// Where the timestamped Markdown file is written
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the document instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Abort on the first unreadable file instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Don't merge the built-in and user language profiles
    #[arg(long)]
    pub no_profile: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
