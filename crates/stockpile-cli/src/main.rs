mod cli;
mod commands;
mod config;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use stockpile_client::{ApiClient, FileStorage, SessionHandle};

use cli::{CategoryCommands, Cli, Commands, OutputFormat, ProductCommands};
use config::Config;
use output::print_error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;
    let mut config = Config::open()?;
    let format = config.format_for(profile, cli.format);

    match &cli.command {
        Commands::Login(args) => {
            let client = make_client(&config, &cli, profile)?;
            commands::auth::login(&client, args).await?;
        }
        Commands::Logout => {
            let client = make_client(&config, &cli, profile)?;
            commands::auth::logout(&client)?;
        }
        Commands::Whoami => {
            let client = make_client(&config, &cli, profile)?;
            commands::auth::whoami(&client, profile)?;
        }
        Commands::Register(args) => {
            let client = make_client(&config, &cli, profile)?;
            commands::auth::register(&client, args).await?;
        }
        Commands::Dashboard => {
            let client = make_client(&config, &cli, profile)?;
            commands::dashboard::summary(&client, format).await?;
        }
        Commands::Product(args) => {
            let client = make_client(&config, &cli, profile)?;
            match &args.command {
                ProductCommands::List(list_args) => {
                    commands::products::list(&client, list_args, format).await?;
                }
                ProductCommands::Get(get_args) => {
                    commands::products::get(&client, get_args, format).await?;
                }
                ProductCommands::Create(field_args) => {
                    commands::products::create(&client, field_args, format).await?;
                }
                ProductCommands::Update(update_args) => {
                    commands::products::update(&client, update_args.id, &update_args.fields, format)
                        .await?;
                }
                ProductCommands::Delete(get_args) => {
                    commands::products::delete(&client, get_args).await?;
                }
            }
        }
        Commands::Category(args) => {
            let client = make_client(&config, &cli, profile)?;
            match &args.command {
                CategoryCommands::List => {
                    commands::categories::list(&client, format).await?;
                }
                CategoryCommands::Add(add_args) => {
                    commands::categories::add(&client, add_args).await?;
                }
                CategoryCommands::Remove(remove_args) => {
                    commands::categories::remove(&client, remove_args).await?;
                }
            }
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    config.server_for(profile, cli.server.as_deref())
                );
                println!("{}: {format}", "Format".cyan());
            }
            cli::ConfigCommands::Set(set_args) => {
                apply_config_set(&mut config, profile, &set_args.key, &set_args.value)?;
                config.save()?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}

fn apply_config_set(config: &mut Config, profile: &str, key: &str, value: &str) -> Result<()> {
    match key {
        "server" => config.set_server(profile, value.to_string()),
        "format" => {
            let format = <OutputFormat as clap::ValueEnum>::from_str(value, true)
                .map_err(|_| anyhow::anyhow!("Invalid format \"{value}\" (expected table or json)"))?;
            config.set_format(profile, format);
        }
        other => anyhow::bail!("Unknown config key: {other}. Valid keys: server, format"),
    }
    Ok(())
}

fn make_client(config: &Config, cli: &Cli, profile: &str) -> Result<ApiClient> {
    let server = config.server_for(profile, cli.server.as_deref());
    let storage = FileStorage::for_profile(profile)?;
    let session = SessionHandle::load(Arc::new(storage))?;
    Ok(ApiClient::new(&server, session))
}
