use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::linter::{has_errors, lint_project, print_lint_issues, LintSeverity};
use crate::locked::{derive_locked_tests, locked_tests_for_project, LockedTest};
use crate::logging::{init_logging, LogConfig};
use crate::model::{Component, ComponentKind};
use crate::service::GenerationService;
use crate::store::FsStore;

/// Command-line interface for canvasgen
#[derive(Debug, Parser)]
#[command(name = "canvasgen", version)]
#[command(about = "Render a component graph into a TypeScript backend", long_about = None)]
pub struct Cli {
    /// Directory of project documents (`<id>.json`, `<id>.yaml`)
    #[arg(long, global = true, env = "CANVASGEN_STORE", default_value = ".")]
    pub store: PathBuf,

    /// Generator config file (default: ./canvasgen.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List project ids in the store
    List,
    /// Generate a project and print the file summary as JSON
    Generate {
        /// Project id
        project: String,
    },
    /// Generate a project and print every file as JSON
    Preview {
        /// Project id
        project: String,

        /// Print only the raw content of this generated path
        #[arg(long)]
        path: Option<String>,
    },
    /// Generate a project into a zip archive
    Download {
        /// Project id
        project: String,

        /// Archive to write
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Generate a project into a directory
    Write {
        /// Project id
        project: String,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite existing files
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Show what would be written without touching the disk
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Lint a project's component graph
    Lint {
        /// Project id
        project: String,

        /// Exit with an error if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,

        /// Print issues as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the tests locked components commit to, as JSON
    LockedTests {
        /// Project id
        project: String,

        /// Only this component (locked or not)
        #[arg(long)]
        component: Option<String>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentTests<'a> {
    component_id: &'a str,
    name: &'a str,
    kind: ComponentKind,
    tests: Vec<LockedTest>,
}

impl<'a> ComponentTests<'a> {
    fn new(component: &'a Component, tests: Vec<LockedTest>) -> Self {
        ComponentTests {
            component_id: &component.id,
            name: &component.name,
            kind: component.kind,
            tests,
        }
    }
}

/// Parse arguments, set up logging and run the command.
///
/// # Errors
///
/// Returns an error if the config or a project cannot be loaded, output cannot
/// be written, or `lint --fail-on-error` finds errors.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LogConfig::from_env().with_verbosity(cli.verbose)) {
        eprintln!("Warning: {err:#}");
    }
    run(&cli)
}

/// Run an already parsed command.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .clone()
        .or_else(|| GeneratorConfig::discover(Path::new(".")));
    let config = GeneratorConfig::load(config_path.as_deref())?;
    let service = GenerationService::with_config(FsStore::new(&cli.store), config);

    match &cli.command {
        Commands::List => {
            for id in service.store().project_ids()? {
                println!("{id}");
            }
        }
        Commands::Generate { project } => {
            let summary = service.generate(project)?;
            print_json(&summary)?;
            tracing::info!(
                project = %project,
                files = summary.file_count,
                bytes = summary.total_bytes(),
                "generated"
            );
        }
        Commands::Preview { project, path } => {
            let preview = service.preview(project)?;
            match path {
                Some(path) => {
                    let Some(file) = preview.files.iter().find(|f| &f.path == path) else {
                        bail!("'{path}' is not generated for project '{project}'");
                    };
                    print!("{}", file.content);
                }
                None => print_json(&preview)?,
            }
        }
        Commands::Download { project, output } => {
            let file = File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            match service.download(project, BufWriter::new(file)) {
                Ok((meta, mut writer)) => {
                    writer
                        .flush()
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    println!("{} ({})", output.display(), meta.file_name);
                }
                Err(err) => {
                    // Leave nothing behind for a failed download.
                    fs::remove_file(output).ok();
                    return Err(err.into());
                }
            }
        }
        Commands::Write {
            project,
            output,
            force,
            dry_run,
        } => {
            let preview = service.preview(project)?;
            write_tree(&preview.files, output, *force, *dry_run)?;
        }
        Commands::Lint {
            project,
            fail_on_error,
            errors_only,
            json,
        } => {
            let project = service.project(project)?;
            let mut issues = lint_project(&project);
            if *errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            if *json {
                print_json(&issues)?;
            } else {
                print_lint_issues(&issues);
            }
            if *fail_on_error && has_errors(&issues) {
                let errors = issues
                    .iter()
                    .filter(|i| i.severity == LintSeverity::Error)
                    .count();
                bail!("lint found {errors} error(s)");
            }
        }
        Commands::LockedTests { project, component } => {
            let project = service.project(project)?;
            let listed: Vec<ComponentTests<'_>> = match component {
                Some(id) => {
                    let Some(component) = project.component(id) else {
                        bail!("Component '{id}' not found in project '{}'", project.id);
                    };
                    vec![ComponentTests::new(component, derive_locked_tests(component))]
                }
                None => locked_tests_for_project(&project)
                    .into_iter()
                    .map(|(c, tests)| ComponentTests::new(c, tests))
                    .collect(),
            };
            print_json(&listed)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

/// Write `files` below `output`. Existing files are kept unless `force`.
pub(crate) fn write_tree(
    files: &[crate::generator::GeneratedFile],
    output: &Path,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut written = 0usize;
    let mut skipped = 0usize;
    for file in files {
        let target = output.join(&file.path);
        if target.exists() && !force {
            println!("skip    {}", file.path);
            skipped += 1;
            continue;
        }
        if dry_run {
            println!("write   {}", file.path);
            written += 1;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, &file.content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        println!("write   {}", file.path);
        written += 1;
    }
    tracing::info!(
        output = %output.display(),
        written,
        skipped,
        dry_run,
        "project tree written"
    );
    Ok(())
}
