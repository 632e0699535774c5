use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use self_upgrade::cli::orchestration::{self, UpgradePlan, UpgradeWorkflowArgs};
use self_upgrade::config;
use self_upgrade::installer::Installer;
use self_upgrade::resolver::rejections;
use self_upgrade::source::GitHubSource;
use self_upgrade::ui;
use self_upgrade::ReleaseResolver;

#[derive(clap::Parser)]
#[command(
    name = "self-upgrade",
    about = "Check for a newer published release and replace this binary with it"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Repository to check, as owner/name")]
    repo: Option<String>,

    #[arg(long, conflicts_with = "stable", help = "Include pre-release versions")]
    preview: bool,

    #[arg(long, help = "Only stable versions, overriding the config file")]
    stable: bool,

    #[arg(long, help = "Stay on the current major version")]
    compatible: bool,

    #[arg(long, value_name = "EXPR", help = "Version range to stay within, e.g. \">=1.2, <2.0\"")]
    constraint: Option<String>,

    #[arg(long, help = "Only report whether an update is available")]
    check: bool,

    #[arg(long, help = "Show published releases and why any are skipped")]
    list: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Log resolution details")]
    verbose: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.version {
        println!("self-upgrade {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let workflow_args = UpgradeWorkflowArgs {
        repository: args.repo.clone(),
        preview: args.preview,
        stable: args.stable,
        compatible: args.compatible,
        constraint: args.constraint.clone(),
    };

    let source = GitHubSource::from_config(&config.source);
    let current_version = env!("CARGO_PKG_VERSION");

    if args.list {
        return list_releases(&workflow_args, &config, &source, current_version);
    }

    ui::display_status("Checking for updates...");
    let planned = orchestration::plan_upgrade(&workflow_args, &config, &source, current_version);
    let plan = match planned {
        Ok(plan) => plan,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let (current, release) = match plan {
        UpgradePlan::UpToDate { current } => {
            ui::display_up_to_date(&current);
            return Ok(());
        }
        UpgradePlan::Available { current, release } => (current, release),
    };

    ui::display_update_available(&current, &release);

    if args.check {
        return Ok(());
    }

    let installer = Installer::for_current_exe(config.source.user_agent.clone())?;

    if args.dry_run {
        ui::display_status("Dry run:");
        ui::display_success(&format!("  Step 1: would download {}", release.download_url));
        ui::display_success(&format!(
            "  Step 2: would replace {}",
            installer.target().display()
        ));
        return Ok(());
    }

    if let Err(e) = installer.check_writable() {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    let skip_prompt = args.force || config.behavior.skip_confirmation;
    if !skip_prompt && !ui::confirm_action(&format!("Install {}?", release.display_tag))? {
        println!("Upgrade cancelled by user.");
        return Ok(());
    }

    ui::display_status(&format!("Installing {}", release.display_tag));
    if let Err(e) = installer.install(&release) {
        ui::display_error(&format!("Failed to install {}: {}", release.display_tag, e));
        std::process::exit(1);
    }

    ui::display_success(&format!(
        "Upgraded from {} to {}",
        current, release.display_tag
    ));
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "self_upgrade=debug"
    } else {
        "self_upgrade=warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

fn list_releases(
    args: &UpgradeWorkflowArgs,
    config: &config::Config,
    source: &GitHubSource,
    current_version: &str,
) -> Result<()> {
    let options = match orchestration::resolution_options(args, config) {
        Ok(options) => options,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    let repository = match orchestration::effective_repository(args, config) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let resolver = ReleaseResolver::new(
        source,
        repository,
        config.source.user_agent.clone(),
        current_version,
    )?;

    match resolver.catalog() {
        Ok(catalog) => {
            ui::display_catalog(&catalog);
            let current = resolver.current_version().to_string();
            for reason in rejections(&catalog, &options, &current) {
                ui::display_skip_notice(&reason);
            }
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
