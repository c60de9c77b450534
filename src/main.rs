use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;

use reposite::cli::args::{BuildArgs, Cli, Commands, CompletionsArgs, OutputFormat};
use reposite::cli::commands;
use reposite::config::{Config, Paths};
use reposite::error::SiteError;
use reposite::github::GitHubClient;
use reposite::logging;

fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), SiteError> {
    let cli = Cli::parse();

    // Handle completions command early (no config or logging needed)
    if let Some(Commands::Completions(CompletionsArgs { shell })) = &cli.command {
        Cli::print_completions(*shell);
        return Ok(());
    }

    logging::init(logging::level_for(cli.verbose, cli.quiet))?;

    let paths = Paths::resolve(cli.config.as_deref())?;
    let mut config = Config::load_from(&paths)?;
    let format = cli
        .output
        .unwrap_or_else(|| OutputFormat::from_config(&config.output.format));

    // Config commands work on the file as written, before CLI overrides
    if let Some(Commands::Config(args)) = &cli.command {
        let output = commands::config(&mut config, &paths, args, format)?;
        print_output(&output);
        return Ok(());
    }

    if let Some(token) = &cli.token {
        config.set_token(token.clone());
    }
    if let Some(account) = &cli.account {
        config.site.account = account.clone();
        config.validate()?;
    }
    let layout = config.layout(&paths);

    let output = match &cli.command {
        Some(Commands::Cache(args)) => commands::cache(&layout, args, format)?,
        Some(Commands::Render(args)) => commands::render(&config, &layout, args, format)?,
        Some(Commands::Fetch) => {
            let client = GitHubClient::new(&config)?;
            commands::fetch(&client, &config, &layout, format)?
        }
        Some(Commands::Build(args)) => {
            let client = GitHubClient::new(&config)?;
            commands::build(&client, &config, &layout, args, format)?
        }
        None => {
            let client = GitHubClient::new(&config)?;
            commands::build(&client, &config, &layout, &BuildArgs::default(), format)?
        }

        // Handled above
        Some(Commands::Config(_)) | Some(Commands::Completions(_)) => String::new(),
    };

    print_output(&output);
    Ok(())
}

fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}
