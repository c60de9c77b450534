use std::io::{self, Write};

use colored::Colorize;

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::config::{Config, MissingLanguages, Paths};
use crate::error::{Result, SiteError};

/// Handle the config command
pub fn config(
    config: &mut Config,
    paths: &Paths,
    args: &ConfigArgs,
    format: OutputFormat,
) -> Result<String> {
    match &args.command {
        ConfigCommands::Show => config_show(config, format),
        ConfigCommands::Set { key, value } => config_set(config, paths, key, value, format),
        ConfigCommands::Path => config_path(paths, format),
        ConfigCommands::Init => config_init(config, paths, format),
    }
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Show current configuration
fn config_show(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Configuration".bold()));
            output.push_str(&"─".repeat(40));
            output.push('\n');

            output.push_str(&format!("\n{}\n", "[api]".cyan()));
            output.push_str(&format!("  base_url = {}\n", config.api.base_url));
            let token_display = config
                .api
                .token
                .as_deref()
                .map(mask_token)
                .unwrap_or_else(|| "(not set)".dimmed().to_string());
            output.push_str(&format!("  token = {}\n", token_display));
            output.push_str(&format!("  per_page = {}\n", config.api.per_page));
            output.push_str(&format!("  timeout_secs = {}\n", config.api.timeout_secs));

            output.push_str(&format!("\n{}\n", "[site]".cyan()));
            output.push_str(&format!("  account = {}\n", config.site.account));
            output.push_str(&format!("  title = {}\n", config.site.title));
            output.push_str(&format!("  headings = {:?}\n", config.site.headings));

            output.push_str(&format!("\n{}\n", "[cache]".cyan()));
            output.push_str(&format!("  repo_list = {}\n", config.cache.repo_list.display()));
            output.push_str(&format!(
                "  language_dir = {}\n",
                config.cache.language_dir.display()
            ));

            output.push_str(&format!("\n{}\n", "[output]".cyan()));
            output.push_str(&format!("  path = {}\n", config.output.path.display()));
            output.push_str(&format!("  format = {}\n", config.output.format));

            output.push_str(&format!("\n{}\n", "[fetch]".cyan()));
            output.push_str(&format!("  concurrency = {}\n", config.fetch.concurrency));

            output.push_str(&format!("\n{}\n", "[render]".cyan()));
            output.push_str(&format!(
                "  missing_languages = {}\n",
                match config.render.missing_languages {
                    MissingLanguages::Error => "error",
                    MissingLanguages::Empty => "empty",
                }
            ));

            Ok(output)
        }
        OutputFormat::Json => {
            // Don't expose the full token in JSON output either
            let mut safe_config = config.clone();
            safe_config.api.token = safe_config.api.token.as_deref().map(mask_token);
            Ok(serde_json::to_string_pretty(&safe_config)?)
        }
    }
}

/// Set a configuration value
fn config_set(
    config: &mut Config,
    paths: &Paths,
    key: &str,
    value: &str,
    format: OutputFormat,
) -> Result<String> {
    config.set_value(key, value)?;
    config.save_to(paths)?;

    let shown = if key == "api.token" {
        mask_token(value)
    } else {
        value.to_string()
    };

    match format {
        OutputFormat::Pretty => Ok(format!("{} Set {} = {}", "✓".green(), key, shown)),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "key": key,
                "value": shown
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Show configuration file path
fn config_path(paths: &Paths, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("Config file: {}\n", paths.config_file.display()));
            output.push_str(&format!(
                "Exists: {}\n",
                if paths.config_exists() {
                    "yes".green()
                } else {
                    "no".yellow()
                }
            ));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "path": paths.config_file.display().to_string(),
                "exists": paths.config_exists()
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Initialize configuration interactively
fn config_init(config: &mut Config, paths: &Paths, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Err(SiteError::InvalidArgument(
            "config init requires interactive mode (--output pretty)".to_string(),
        ));
    }

    println!("{}", "reposite Configuration".bold());
    println!("{}", "─".repeat(40));
    println!();

    print!("GitHub account [{}]: ", config.site.account);
    io::stdout().flush()?;

    let mut account = String::new();
    io::stdin().read_line(&mut account)?;
    let account = account.trim();
    if !account.is_empty() {
        config.site.account = account.to_string();
    }

    let token = rpassword::prompt_password("GitHub token (optional, input hidden): ")?;
    let token = token.trim();
    if !token.is_empty() {
        config.set_token(token.to_string());
    }

    config.validate()?;
    config.save_to(paths)?;

    Ok(format!(
        "\n{} Configuration saved to: {}\n\nRun '{}' to generate the site.",
        "✓".green(),
        paths.config_file.display(),
        "reposite build".cyan()
    ))
}
