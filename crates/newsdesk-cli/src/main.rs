use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use newsdesk_core::category::legacy;
use newsdesk_core::{
    build_picker_options, migrate_posts, Breadcrumb, CategoryNode, CategoryResolver, Config,
    NewsdeskError, PickerEntry, Result, StorageFormat, StoredCategory, Taxonomy,
    TracingObserver, SPECIAL_ROUTE_ALIASES,
};

mod args;
use args::{Cli, Commands, ConfigAction, Kind, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);
    let json = cli.json;
    let quiet = cli.quiet;

    let result = match cli.command {
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        Some(command) => load(&base_dir).and_then(|(config, taxonomy)| {
            let resolver = CategoryResolver::new(&taxonomy).with_observer(TracingObserver);
            run(command, &config, &resolver, json, quiet)
        }),
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("NEWSDESK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("NEWSDESK_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".newsdesk"))
        .unwrap_or_else(|| PathBuf::from(".newsdesk"))
}

/// Config plus the taxonomy built from it; a defective taxonomy stops here
fn load(base_dir: &Path) -> Result<(Config, Taxonomy)> {
    let config = Config::load(base_dir)?;
    let taxonomy = Taxonomy::builtin_with(&config.routing)?;
    tracing::debug!(
        categories = taxonomy.len(),
        aliases = taxonomy.aliases().len(),
        "taxonomy validated"
    );
    Ok((config, taxonomy))
}

fn run(
    command: Commands,
    config: &Config,
    resolver: &CategoryResolver<'_>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    match command {
        Commands::Tree => handle_tree(resolver.taxonomy(), json),
        Commands::Resolve { value, kind } => handle_resolve(resolver, &value, kind, json),
        Commands::Url {
            category,
            subcategory,
            subsubcategory,
        } => handle_url(
            resolver,
            category.as_deref(),
            subcategory.as_deref(),
            subsubcategory.as_deref(),
            json,
        ),
        Commands::Picker => handle_picker(resolver.taxonomy(), json),
        Commands::Routes => handle_routes(resolver.taxonomy(), json),
        Commands::Serialize { id, format } => {
            let format = format.map(StorageFormat::from).unwrap_or(config.storage.format);
            handle_serialize(resolver, id, format, json)
        }
        Commands::Migrate {
            input,
            output,
            dry_run,
        } => handle_migrate(
            resolver,
            &input,
            output.as_deref(),
            dry_run,
            &config.display.fallback_label,
            json,
        ),
        Commands::Validate => handle_validate(resolver, json, quiet),
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "newsdesk", &mut io::stdout());
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_tree(taxonomy: &Taxonomy, json: bool) -> Result<()> {
    if json {
        return print_json(taxonomy.all());
    }

    fn print_node(taxonomy: &Taxonomy, node: &CategoryNode, depth: usize) {
        println!(
            "{}{} {} {}",
            "  ".repeat(depth),
            node.display_name.bold(),
            format!("[{}]", node.id).cyan(),
            node.url_path.dimmed()
        );
        for child in taxonomy.children(node.id) {
            print_node(taxonomy, child, depth + 1);
        }
    }

    println!();
    for root in taxonomy.roots() {
        print_node(taxonomy, root, 0);
    }
    println!();
    Ok(())
}

fn print_breadcrumb(breadcrumb: &Breadcrumb<'_>, json: bool) -> Result<()> {
    let leaf = breadcrumb.leaf();
    if json {
        return print_json(&serde_json::json!({
            "id": leaf.id,
            "displayName": leaf.display_name,
            "hierarchicalName": breadcrumb.hierarchical_name(),
            "urlPath": leaf.url_path,
            "breadcrumb": breadcrumb,
        }));
    }

    println!("{}", breadcrumb.hierarchical_name().bold());
    println!("  {} {}", "id:".cyan(), leaf.id);
    println!("  {} {}", "url:".cyan(), leaf.url_path);
    println!("  {} {}", "level:".cyan(), leaf.level);
    Ok(())
}

fn handle_resolve(
    resolver: &CategoryResolver<'_>,
    value: &str,
    kind: Kind,
    json: bool,
) -> Result<()> {
    let stored = StoredCategory::parse(kind.into(), value).map_err(|e| {
        NewsdeskError::InvalidArgument(format!("'{}' is not a category id: {}", value, e))
    })?;
    let breadcrumb = resolver.resolve(&stored)?;
    print_breadcrumb(&breadcrumb, json)
}

fn handle_url(
    resolver: &CategoryResolver<'_>,
    category: Option<&str>,
    subcategory: Option<&str>,
    subsubcategory: Option<&str>,
    json: bool,
) -> Result<()> {
    let id = resolver.build_url_from_params(category, subcategory, subsubcategory)?;
    let breadcrumb = resolver.resolve_by_id(id)?;
    print_breadcrumb(&breadcrumb, json)
}

fn handle_picker(taxonomy: &Taxonomy, json: bool) -> Result<()> {
    let entries = build_picker_options(taxonomy);
    if json {
        return print_json(&entries);
    }

    println!();
    for entry in &entries {
        match entry {
            PickerEntry::GroupHeader { level, label } => {
                let indent = "  ".repeat(usize::from(level.saturating_sub(1)));
                if *level == 1 {
                    println!("{}{}", indent, label.bold());
                } else {
                    println!("{}{}", indent, label.dimmed());
                }
            }
            PickerEntry::Selectable {
                node_id,
                label,
                indent_level,
            } => {
                println!(
                    "{}{} {}",
                    "  ".repeat(usize::from(*indent_level)),
                    label,
                    format!("[{}]", node_id).cyan()
                );
            }
        }
    }
    println!();
    Ok(())
}

fn handle_routes(taxonomy: &Taxonomy, json: bool) -> Result<()> {
    let routes = taxonomy.url_mappings();
    if json {
        return print_json(&routes);
    }

    let width = routes.keys().map(|k| k.len()).max().unwrap_or(0);
    println!();
    for (path, id) in &routes {
        let marker = if taxonomy.alias_target(path).is_some() {
            "alias".yellow().to_string()
        } else {
            String::new()
        };
        println!("{:width$}  {:>4}  {}", path, id, marker, width = width);
    }
    println!();
    Ok(())
}

fn handle_serialize(
    resolver: &CategoryResolver<'_>,
    id: u32,
    format: StorageFormat,
    json: bool,
) -> Result<()> {
    let breadcrumb = resolver.resolve_by_id(id)?;
    let stored = resolver.serialize_as(&breadcrumb, format);
    if json {
        return print_json(&stored);
    }

    match stored {
        StoredCategory::Id(id) => println!("{}", id),
        StoredCategory::Path(value)
        | StoredCategory::Hierarchical(value)
        | StoredCategory::Display(value) => println!("{}", value),
    }
    Ok(())
}

fn handle_migrate(
    resolver: &CategoryResolver<'_>,
    input: &Path,
    output: Option<&Path>,
    dry_run: bool,
    fallback_label: &str,
    json: bool,
) -> Result<()> {
    let content = fs::read_to_string(input)?;
    let mut posts: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|e| NewsdeskError::PostsParse {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;

    let report = migrate_posts(resolver, &mut posts, fallback_label);

    if !dry_run && (report.upgraded > 0 || output.is_some()) {
        let target = output.unwrap_or(input);
        fs::write(target, serde_json::to_string_pretty(&posts)?)?;
        tracing::info!(path = %target.display(), "wrote upgraded posts");
    }

    if json {
        return print_json(&report);
    }

    println!();
    println!("{} {}", "Posts:".cyan(), report.total);
    println!("  {} {}", "already canonical:".green(), report.already_canonical);
    println!("  {} {}", "upgraded:".green(), report.upgraded);
    if report.skipped > 0 {
        println!("  {} {}", "skipped (not objects):".yellow(), report.skipped);
    }
    if !report.unresolved.is_empty() {
        println!("  {} {}", "unresolved:".red(), report.unresolved.len());
        for post in &report.unresolved {
            let id = post
                .post_id
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| format!("#{}", post.index));
            let value = post
                .fields
                .category
                .clone()
                .or_else(|| post.fields.category_id.map(|id| id.to_string()))
                .unwrap_or_default();
            println!(
                "    {} {:?} {} {}",
                id,
                value,
                "->".dimmed(),
                post.label.yellow()
            );
        }
    }
    if dry_run {
        println!("{}", "(dry run, nothing written)".dimmed());
    }
    println!();
    Ok(())
}

fn handle_validate(resolver: &CategoryResolver<'_>, json: bool, quiet: bool) -> Result<()> {
    let taxonomy = resolver.taxonomy();

    // Builtin aliases that no longer land on their original target
    let retired: Vec<&str> = SPECIAL_ROUTE_ALIASES
        .iter()
        .filter(|alias| {
            resolver
                .resolve_by_url_path(alias.fragment)
                .map(|b| b.id() != alias.target)
                .unwrap_or(true)
        })
        .map(|alias| alias.fragment)
        .collect();

    if json {
        return print_json(&serde_json::json!({
            "categories": taxonomy.len(),
            "aliases": taxonomy.aliases().len(),
            "leaves": legacy::flat_categories(taxonomy).len(),
            "retiredAliases": retired,
        }));
    }

    if !quiet {
        println!(
            "{} {} categories, {} aliases, {} selectable",
            "Taxonomy OK:".green(),
            taxonomy.len(),
            taxonomy.aliases().len(),
            legacy::flat_categories(taxonomy).len()
        );
    }
    for fragment in retired {
        println!(
            "{} legacy route '{}' no longer resolves to its original category",
            "[WARN]".yellow(),
            fragment
        );
    }
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(NewsdeskError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            // Refuse to save routing that would break the taxonomy
            Taxonomy::builtin_with(&config.routing)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
