mod cmd;
mod logging;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ngr",
    version,
    about = "Wikilink, backlink and tag queries over a markdown notes workspace"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// Index the workspace and print statistics
    Index(IndexArgs),

    /// Find the note a wikilink label (or the link under a cursor) points to
    Definition(DefinitionArgs),

    /// List references pointing at a note
    References(ReferencesArgs),

    /// Suggest notes for a partially typed label
    Complete(CompleteArgs),

    /// Print the path a label links to, or where a new note for it belongs
    Resolve(ResolveArgs),

    /// List wikilinks that point at no note
    Dangling(OutputArgs),

    /// List tags, or the occurrences of one tag
    Tags(TagsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Quiet,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Shorthand for --output quiet (paths only)
    #[arg(long)]
    pub quiet: bool,
}

impl OutputArgs {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.quiet {
            OutputFormat::Quiet
        } else {
            self.output
        }
    }
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Print every indexed file
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["label", "file"])))]
pub struct DefinitionArgs {
    /// Link label, e.g. "My Note" or "folder/note"
    pub label: Option<String>,

    /// Note containing the link under the cursor
    #[arg(long, requires = "offset")]
    pub file: Option<String>,

    /// Byte offset of the cursor in --file
    #[arg(long, requires = "file")]
    pub offset: Option<usize>,

    /// Show every candidate instead of the best one
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ReferencesArgs {
    /// Note path relative to the vault root
    pub note: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct CompleteArgs {
    /// Partially typed label
    #[arg(default_value = "")]
    pub partial: String,

    /// Maximum number of suggestions
    #[arg(long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Link label
    pub label: String,

    /// Also print the preview label
    #[arg(long)]
    pub preview: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Tag to list occurrences of (leading '#' optional)
    pub tag: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Index(args) => cmd::index::run(config, profile, args),
        Commands::Definition(args) => cmd::definition::run(config, profile, args),
        Commands::References(args) => cmd::references::run(config, profile, args),
        Commands::Complete(args) => cmd::complete::run(config, profile, args),
        Commands::Resolve(args) => cmd::resolve::run(config, profile, args),
        Commands::Dangling(args) => cmd::dangling::run(config, profile, args),
        Commands::Tags(args) => cmd::tags::run(config, profile, args),
    }
}
