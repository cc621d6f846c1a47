//! `kinship`: edit, inspect and render a family tree file from the command line.

mod config;
mod render;
mod selection;
mod session;
mod view;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use kinship_core::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use kinship_core::{
    snapshot, FamilyTree, Gender, Individual, IndividualDraft, IndividualId, Position, SnapshotError, TreeError,
};
use selection::Selection;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn draft_args() -> [Arg; 6] {
    [
        Arg::new("name").long("name").help("Display name"),
        Arg::new("gender")
            .long("gender")
            .value_parser(value_parser!(Gender))
            .help("male, female or other"),
        Arg::new("description").long("description").help("Free text"),
        Arg::new("image").long("image").help("Portrait URI; empty to clear"),
        Arg::new("parent")
            .long("parent")
            .action(ArgAction::Append)
            .help("Parent id (repeatable)"),
        Arg::new("partner").long("partner").help("Partner id"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Individual id")
}

fn cli() -> Command {
    Command::new("kinship")
        .version(kinship_core::VERSION)
        .about("Edit, inspect and render a family tree file")
        .subcommand_required(true)
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .global(true)
                .default_value(snapshot::DEFAULT_FILE_NAME)
                .value_parser(value_parser!(PathBuf))
                .help("Family tree file to operate on"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("add")
                .about("Add a family member")
                .args(draft_args())
                .mut_arg("name", |a| a.required(true)),
        )
        .subcommand(
            Command::new("update")
                .about("Edit a family member; omitted fields keep their value")
                .arg(id_arg())
                .args(draft_args())
                .arg(
                    Arg::new("clear-parents")
                        .long("clear-parents")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("parent")
                        .help("Remove all parents"),
                )
                .arg(
                    Arg::new("no-partner")
                        .long("no-partner")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("partner")
                        .help("Clear the partner"),
                ),
        )
        .subcommand(Command::new("remove").about("Remove a family member").arg(id_arg()))
        .subcommand(
            Command::new("move")
                .about("Move a card on the canvas")
                .arg(id_arg())
                .arg(
                    Arg::new("x")
                        .long("x")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("y")
                        .long("y")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(Command::new("list").about("List family members"))
        .subcommand(Command::new("show").about("Show one member with relatives").arg(id_arg()))
        .subcommand(
            Command::new("edges").about("List drawable connections").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("candidates")
                .about("List who can be picked as partner or parent")
                .arg(
                    Arg::new("role")
                        .required(true)
                        .value_parser(["partner", "parent"]),
                )
                .arg(Arg::new("for").long("for").help("Individual being edited"))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .action(ArgAction::Append)
                        .help("Parent already chosen"),
                )
                .arg(Arg::new("partner").long("partner").help("Partner already chosen")),
        )
        .subcommand(
            Command::new("render").about("Write the canvas as SVG").arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .default_value("family_tree.svg")
                    .value_parser(value_parser!(PathBuf)),
            ),
        )
        .subcommand(Command::new("validate").about("Check every relationship invariant"))
        .subcommand(
            Command::new("import")
                .about("Replace the family file with a validated snapshot")
                .arg(
                    Arg::new("source")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write the tree to another file")
                .arg(
                    Arg::new("target")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the randomized editing simulator")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(
            Command::new("stress")
                .about("Run stress test")
                .arg(
                    Arg::new("individuals")
                        .long("individuals")
                        .default_value("200")
                        .value_parser(value_parser!(usize))
                        .help("Population cap"),
                )
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .default_value("5000")
                        .value_parser(value_parser!(usize))
                        .help("Number of iterations"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn ids_of(args: &ArgMatches, name: &str) -> Vec<IndividualId> {
    args.get_many::<String>(name)
        .map(|values| values.map(|v| IndividualId::from(v.as_str())).collect())
        .unwrap_or_default()
}

fn id_of(args: &ArgMatches) -> IndividualId {
    args.get_one::<String>("id").map(String::as_str).unwrap_or_default().into()
}

/// Overlay the flags that were given on `base`.
fn apply_draft_args(args: &ArgMatches, mut draft: IndividualDraft) -> IndividualDraft {
    if let Some(name) = args.get_one::<String>("name") {
        draft.name.clone_from(name);
    }
    if let Some(gender) = args.get_one::<Gender>("gender") {
        draft.gender = *gender;
    }
    if let Some(description) = args.get_one::<String>("description") {
        draft.description.clone_from(description);
    }
    if let Some(image) = args.get_one::<String>("image") {
        draft.image = Some(image.clone()).filter(|uri| !uri.is_empty());
    }
    if args.get_many::<String>("parent").is_some() {
        draft.parents = ids_of(args, "parent");
    }
    if let Some(partner) = args.get_one::<String>("partner") {
        draft.partner = Some(partner.as_str().into());
    }
    draft
}

fn report(err: &TreeError) -> anyhow::Error {
    if err.is_user_visible() {
        anyhow::anyhow!(err.user_message())
    } else {
        anyhow::anyhow!(err.clone())
    }
}

/// Read an import source. Unreadable files name the path, bad contents are a format error.
async fn read_import(source: &Path) -> anyhow::Result<Vec<Individual>> {
    match snapshot::read_file(source).await {
        Ok(records) => Ok(records),
        Err(SnapshotError::Io(e)) => Err(e).with_context(|| format!("reading {}", source.display())),
        Err(SnapshotError::Format(e)) => Err(report(&TreeError::from(e))),
    }
}

async fn edit(path: &Path, mut tree: FamilyTree, args: (&str, &ArgMatches)) -> anyhow::Result<()> {
    match args {
        ("add", args) => {
            let draft = apply_draft_args(args, IndividualDraft::default());
            let id = tree.add(draft).map_err(|e| report(&e))?;
            println!("Added {id}");
        }
        ("update", args) => {
            let id = id_of(args);
            let current = tree.get(&id).ok_or_else(|| report(&TreeError::NotFound(id.clone())))?;
            let mut draft = apply_draft_args(args, IndividualDraft::from_individual(current));
            if args.get_flag("clear-parents") {
                draft.parents.clear();
            }
            if args.get_flag("no-partner") {
                draft.partner = None;
            }
            tree.update(&id, draft).map_err(|e| report(&e))?;
            println!("Updated {id}");
        }
        ("remove", args) => {
            let removed = tree.remove(&id_of(args)).map_err(|e| report(&e))?;
            println!("Removed {} ({})", removed.name(), removed.id());
        }
        ("move", args) => {
            let id = id_of(args);
            let x = args.get_one::<f64>("x").copied().unwrap_or_default();
            let y = args.get_one::<f64>("y").copied().unwrap_or_default();
            tree.set_position(&id, Position::new(x, y)).map_err(|e| report(&e))?;
        }
        ("import", args) => {
            let source = args
                .get_one::<PathBuf>("source")
                .context("missing import source")?;
            let records = read_import(source).await?;
            let count = tree.replace_all(records).map_err(|e| report(&TreeError::from(e)))?;
            println!("Imported {count} family members from {}", source.display());
        }
        (other, _) => bail!("unknown editing command {other}"),
    }
    session::save(path, &tree).await
}

async fn inspect(tree: &FamilyTree, args: (&str, &ArgMatches)) -> anyhow::Result<ExitCode> {
    match args {
        ("list", _) => print!("{}", view::list(tree)),
        ("show", args) => {
            let id = id_of(args);
            let member = tree.get(&id).ok_or_else(|| report(&TreeError::NotFound(id.clone())))?;
            print!("{}", view::details(tree, member)?);
        }
        ("edges", args) => {
            let lines = tree.edges();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                print!("{}", view::edges(&lines));
            }
        }
        ("candidates", args) => {
            let editing = args.get_one::<String>("for").map(|v| IndividualId::from(v.as_str()));
            let parents = ids_of(args, "parent");
            let partner = args.get_one::<String>("partner").map(|v| IndividualId::from(v.as_str()));
            let selection = Selection {
                editing: editing.as_ref(),
                parents: &parents,
                partner: partner.as_ref(),
            };
            let offered = match args.get_one::<String>("role").map(String::as_str) {
                Some("partner") => selection::partner_candidates(tree, &selection),
                _ => selection::parent_candidates(tree, &selection),
            };
            for member in offered {
                println!("{}\t{}", member.id(), member.name());
            }
        }
        ("render", args) => {
            let output = args
                .get_one::<PathBuf>("output")
                .context("missing output path")?;
            tokio::fs::write(output, render::to_svg(tree))
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Rendered {} family members to {}", tree.len(), output.display());
        }
        ("export", args) => {
            let target = args
                .get_one::<PathBuf>("target")
                .context("missing export target")?;
            session::save(target, tree).await?;
            println!("Exported {} family members to {}", tree.len(), target.display());
        }
        ("validate", _) => {
            let violations = tree.check_invariants();
            if violations.is_empty() {
                println!("OK: {} family members, {} connections", tree.len(), tree.edges().len());
            } else {
                for violation in &violations {
                    println!("{violation}");
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        (other, _) => bail!("unknown command {other}"),
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("simulate", args)) => {
            let operations = *args.get_one::<u64>("operations").context("missing --ops")?;
            let seed = *args.get_one::<u64>("seed").context("missing --seed")?;
            let stop_on_violation = args.get_flag("stop-on-violation");

            println!("Running family tree simulator...");
            println!("Operations: {operations}");
            println!("Seed: {seed}");
            println!();

            let config = SimulatorConfig {
                seed,
                total_operations: operations,
                stop_on_first_violation: stop_on_violation,
                ..Default::default()
            };

            let report = run_simulator(config);
            println!("{}", report.generate_text());
            return Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Some(("stress", args)) => {
            let individuals = *args.get_one::<usize>("individuals").context("missing --individuals")?;
            let iterations = *args.get_one::<usize>("iterations").context("missing --iterations")?;

            let report = TestHarness::run_stress_test(individuals, iterations);

            println!("Stress Test Report:");
            println!("  Individuals: {}", report.individuals);
            println!("  Iterations: {}", report.iterations);
            println!("  Violations: {}", report.violations);
            println!("  Success: {}", report.success);
            return Ok(if report.success { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        _ => {}
    }

    let path = matches
        .get_one::<PathBuf>("file")
        .context("missing --file")?
        .clone();
    let config = config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)).await?;
    let tree = session::open(&path, config).await?;

    match matches.subcommand() {
        Some((name @ ("add" | "update" | "remove" | "move" | "import"), args)) => {
            edit(&path, tree, (name, args)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(command) => inspect(&tree, command).await,
        None => {
            cli().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
