use clap::{Parser, Subcommand, ValueEnum};

pub mod commands;
pub mod output;

#[derive(Parser)]
#[command(
    name = "shaderlink",
    version,
    about = "Resolve shader #include directives to files on disk"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Workspace root (default: current directory)
    #[arg(long, global = true)]
    pub workspace: Option<String>,

    /// Include folder table (default: .shaderlink/include_folders.toml or shaderlink.toml)
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Settings file (default: .shaderlink/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<String>,

    /// Override a setting, e.g. launchOption.currentConfig.Platform=win64
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Log the game and shader config selected for each resolution
    #[arg(long, global = true)]
    pub debug_selection: bool,

    /// Verbose logging (per-probe diagnostics)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a single include
    Resolve {
        /// Include name as written in the directive
        name: String,
        /// Referencing document (file path or file:// URI)
        #[arg(long)]
        document: String,
        /// Skip the referencing document's folder, search include folders only
        #[arg(long)]
        no_local: bool,
    },

    /// Show the game and shader config the current settings select
    Select,

    /// Resolve every #include in the shader files under a path
    Links {
        /// File or directory to scan (default: workspace root)
        path: Option<String>,
        /// Include only files matching this glob
        #[arg(long)]
        include: Vec<String>,
        /// Exclude files matching this glob
        #[arg(long)]
        exclude: Vec<String>,
    },
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Compact,
}
