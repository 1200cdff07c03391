use clap::{Parser, Subcommand, ValueEnum};

use git_autoflow::cli;
use git_autoflow::pipeline::MergeMethod;
use git_autoflow::ui;

#[derive(Parser)]
#[command(
    name = "git-autoflow",
    version,
    about = "Automate GitFlow release workflows over git and the GitHub CLI"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Echo every external command before running it")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Release workflow commands
    Release {
        #[command(subcommand)]
        action: ReleaseAction,
    },

    /// Rebase the current branch on top of a base branch
    Sync {
        #[arg(default_value = "develop", help = "Base branch to rebase onto")]
        base: String,
    },
}

#[derive(Subcommand)]
enum ReleaseAction {
    /// Run the full develop → main release pipeline
    Auto {
        #[arg(long = "version", help = "Force a specific version (vMAJOR.MINOR.PATCH)")]
        forced_version: Option<String>,

        #[arg(long, help = "Create the release PR but do not merge it")]
        no_auto_merge: bool,

        #[arg(long, value_enum, default_value_t = MergeMethodArg::Merge)]
        merge_method: MergeMethodArg,

        #[arg(short, long, help = "Skip confirmation prompts")]
        force: bool,
    },

    /// Show the version the next release would get, without changing anything
    NextVersion,
}

#[derive(Clone, Copy, ValueEnum)]
enum MergeMethodArg {
    Merge,
    Squash,
    Rebase,
}

impl From<MergeMethodArg> for MergeMethod {
    fn from(arg: MergeMethodArg) -> Self {
        match arg {
            MergeMethodArg::Merge => MergeMethod::Merge,
            MergeMethodArg::Squash => MergeMethod::Squash,
            MergeMethodArg::Rebase => MergeMethod::Rebase,
        }
    }
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Command::Release { action } => match action {
            ReleaseAction::Auto {
                forced_version,
                no_auto_merge,
                merge_method,
                force,
            } => cli::run_release(&cli::ReleaseArgs {
                config_path: args.config,
                forced_version,
                auto_merge: !no_auto_merge,
                merge_method: merge_method.into(),
                force,
                debug: args.debug,
            })
            .map(|_| ()),
            ReleaseAction::NextVersion => {
                cli::run_next_version(args.config.as_deref(), args.debug)
            }
        },
        Command::Sync { base } => cli::run_sync(&base, args.config.as_deref(), args.debug),
    };

    if let Err(e) = result {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}
