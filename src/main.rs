use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use buoy::config::{self, Config};
use buoy::domain::RulesetType;
use buoy::git::Git2Lister;
use buoy::golang::GoImportResolver;
use buoy::gomod::{self, Resolver, Selector};
use buoy::gowork::Workspace;
use buoy::ui;

const RULESET_HELP: &str = "Ruleset to evaluate the dependency refs: Any, ReleaseOrBranch, Release, Branch";

#[derive(Parser)]
#[command(name = "buoy", about = "Introspect go module dependencies.", version)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find latest versions of dependencies based on a release.
    ///
    /// For each dependency in the domain, pick the first available of: the
    /// highest patch release tag on the release line, the release branch, the
    /// default branch. A ruleset restricts which of these may be chosen;
    /// dependencies with no eligible ref are left out.
    Float {
        /// Path to the go.mod file
        gomod: PathBuf,

        #[arg(short, long, help = "Release as '<major>.<minor>' (i.e. 1.23 or v1.23)")]
        release: String,

        #[arg(
            short,
            long,
            help = "Release line of the modules when it differs from the release"
        )]
        module_release: Option<String>,

        #[arg(short, long, help = "Domain filter (i.e. knative.dev)")]
        domain: Option<String>,

        #[arg(long, help = RULESET_HELP)]
        ruleset: Option<RulesetType>,
    },

    /// Check that all dependencies in the domain are ready for a release.
    Check {
        /// Path to the go.mod file
        gomod: PathBuf,

        #[arg(short, long, help = "Release as '<major>.<minor>' (i.e. 1.23 or v1.23)")]
        release: String,

        #[arg(short, long, help = "Domain filter (i.e. knative.dev)")]
        domain: Option<String>,

        #[arg(long, help = RULESET_HELP)]
        ruleset: Option<RulesetType>,

        #[arg(short, long, help = "Print the state of every dependency")]
        verbose: bool,
    },

    /// List the dependencies in the domain.
    Needs {
        /// Paths to go.mod files
        #[arg(required = true)]
        gomods: Vec<PathBuf>,

        #[arg(short, long, help = "Domain filter (i.e. knative.dev)")]
        domain: Option<String>,

        #[arg(long, help = "Print a Graphviz digraph of module dependencies")]
        dot: bool,
    },

    /// Report whether the release branch of a module exists.
    Exists {
        /// Path to the go.mod file
        gomod: PathBuf,

        #[arg(short, long, help = "Release as '<major>.<minor>' (i.e. 1.23 or v1.23)")]
        release: String,

        #[arg(
            short,
            long,
            help = "Release line of the module when it differs from the release"
        )]
        module_release: Option<String>,

        #[arg(short, long, help = "Print the module, release branch and next release")]
        verbose: bool,

        #[arg(long, help = "Print the next release tag instead of the release branch")]
        next: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = config::load_config(cli.config.as_deref()).context("loading configuration")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Float {
            gomod,
            release,
            module_release,
            domain,
            ruleset,
        } => {
            let domain = domain.unwrap_or_else(|| config.domain.clone());
            let ruleset = ruleset.unwrap_or_else(|| config.ruleset());
            let selector = Selector::default_for(&domain, &Workspace::from_env()?)?;
            let refs = resolver(&config)?.float(
                &gomod,
                &release,
                module_release.as_deref(),
                &selector,
                ruleset,
            )?;
            ui::write_lines(&mut out, &refs)?;
        }

        Command::Check {
            gomod,
            release,
            domain,
            ruleset,
            verbose,
        } => {
            let domain = domain.unwrap_or_else(|| config.domain.clone());
            let ruleset = ruleset.unwrap_or_else(|| config.ruleset());
            let mut sink = io::sink();
            let report: &mut dyn Write = if verbose { &mut out } else { &mut sink };
            resolver(&config)?.check(&gomod, &release, &domain, ruleset, report)?;
        }

        Command::Needs { gomods, domain, dot } => {
            let domain = domain.unwrap_or_else(|| config.domain.clone());
            let graph = gomod::modules(gomods.as_slice(), &domain)?;
            if dot {
                let edges = graph
                    .packages
                    .iter()
                    .flat_map(|(m, deps)| deps.iter().map(move |d| (m.as_str(), d.as_str())));
                writeln!(out, "{}", ui::dot_graph(edges))?;
            } else {
                ui::write_lines(&mut out, &graph.dependencies)?;
            }
        }

        Command::Exists {
            gomod,
            release,
            module_release,
            verbose,
            next,
        } => {
            let mut sink = io::sink();
            let report: &mut dyn Write = if verbose { &mut out } else { &mut sink };
            let meta = resolver(&config)?.release_status(
                &gomod,
                &release,
                module_release.as_deref(),
                report,
            )?;
            if !verbose {
                let line = if next { &meta.release } else { &meta.release_branch };
                writeln!(out, "{}", line)?;
            }
            if !meta.release_branch_exists {
                out.flush()?;
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn resolver(config: &Config) -> Result<Resolver> {
    let imports = GoImportResolver::new(config.http.timeout())?.with_overrides(config.repos.clone());
    Ok(Resolver::new(imports, Git2Lister::new()))
}
