use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use shaderlink::cli::commands::{self, ResolverSetup};
use shaderlink::cli::{Cli, Commands};
use shaderlink::config::ResolverOptions;
use shaderlink::discovery::DiscoveryConfig;
use shaderlink::host::{ConsoleWarnings, TracingWarnings, WarningSink};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let workspace = cli
        .workspace
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| current_dir.clone());
    let workspace = workspace.canonicalize().unwrap_or(workspace);

    let setup = ResolverSetup {
        workspace: workspace.clone(),
        table: cli.table.as_ref().map(PathBuf::from),
        settings: cli.settings.as_ref().map(PathBuf::from),
        overrides: cli.overrides.clone(),
        options: ResolverOptions {
            log_selection: cli.debug_selection,
        },
    };

    // Ctrl-C abandons outstanding probes instead of killing mid-output
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Resolve {
            ref name,
            ref document,
            no_local,
        } => {
            let resolver = commands::build_resolver(&setup, Arc::new(ConsoleWarnings))?;
            let document = commands::document_uri(document, &current_dir);
            let (output, found) =
                commands::run_resolve(&resolver, name, &document, !no_local, &cancel, &cli.format)
                    .await?;
            println!("{}", output);
            if !found {
                std::process::exit(1);
            }
        }

        Commands::Select => {
            let resolver = commands::build_resolver(&setup, Arc::new(ConsoleWarnings))?;
            let output = commands::run_select(&resolver, &cancel, &cli.format).await?;
            println!("{}", output);
        }

        Commands::Links {
            ref path,
            ref include,
            ref exclude,
        } => {
            // One "not found" warning per directive would drown the report
            let warnings: Arc<dyn WarningSink> = Arc::new(TracingWarnings);
            let resolver = commands::build_resolver(&setup, warnings)?;
            let scan_path = match path {
                Some(p) => {
                    let p = PathBuf::from(p);
                    p.canonicalize().unwrap_or(p)
                }
                None => workspace.clone(),
            };
            let discovery = DiscoveryConfig {
                include: include.clone(),
                exclude: exclude.clone(),
            };
            let (output, unresolved) = commands::run_links(
                &resolver,
                &workspace,
                &scan_path,
                &discovery,
                &cancel,
                &cli.format,
            )
            .await?;
            println!("{}", output);
            if unresolved > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.debug_selection {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
