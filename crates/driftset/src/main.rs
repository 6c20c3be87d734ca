//! `driftset` - CLI for the drift car setup notebook
//!
//! This binary opens the interactive shell by default and offers one-shot
//! commands for scripting.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use driftset::car::{CarForm, Field};
use driftset::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, ListCommand, SetCommand, ShowCommand,
};
use driftset::ui::{DetailScreen, ListScreen, Navigation};
use driftset::{init_logging, App, CarRepository, Config, Error, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.into_command() {
        Command::Shell => handle_shell(&config).await,
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Add(cmd) => handle_add(&config, cmd).await,
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Set(cmd) => handle_set(&config, &cmd).await,
        Command::Delete(cmd) => handle_delete(&config, &cmd).await,
        Command::Fields => {
            driftset::app::write_field_keys(&mut std::io::stdout())?;
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_repository(config: &Config) -> anyhow::Result<CarRepository> {
    let path = config.database_path();
    let storage = Storage::open_with(&path, config.storage.journal_mode)
        .with_context(|| format!("opening car database {}", path.display()))?;
    Ok(CarRepository::new(storage)?)
}

fn find_car(repository: &CarRepository, id: i64) -> driftset::Result<CarForm> {
    repository.find(id).ok_or(Error::CarNotFound { id })
}

async fn handle_shell(config: &Config) -> anyhow::Result<()> {
    let repository = open_repository(config)?;
    let mut app = App::new(repository, config.shell.clone(), std::io::stdout());
    app.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut list = ListScreen::new(open_repository(config)?);
    if let Some(search) = &cmd.search {
        list.set_search_query(search.as_str());
    }
    let cars = list.visible_cars();

    if cmd.json {
        let records: Vec<_> = cars.iter().map(CarForm::to_record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if cars.is_empty() {
        println!("No cars.");
    } else {
        for car in &cars {
            println!("{:>4}  {}", car.id, car.name);
        }
    }
    Ok(())
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let mut list = ListScreen::new(open_repository(config)?);
    list.open_add_dialog();
    list.set_new_car_name(cmd.name);

    match list.confirm_add().await? {
        Some(Navigation::Detail { car, .. }) => println!("Added '{}' with id {}", car.name, car.id),
        _ => anyhow::bail!("car name must not be blank"),
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let repository = open_repository(config)?;
    let car = find_car(&repository, cmd.id)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&car.to_record())?);
        return Ok(());
    }

    let detail = DetailScreen::open(repository, car, false);
    println!("{}", detail.title());
    for section in detail.sections() {
        println!();
        println!("[{}]", section.heading);
        for row in section.rows {
            println!("  {:<20} {}", row.label, row.value);
        }
    }
    Ok(())
}

async fn handle_set(config: &Config, cmd: &SetCommand) -> anyhow::Result<()> {
    let field: Field = cmd.field.parse()?;
    let repository = open_repository(config)?;
    let car = find_car(&repository, cmd.id)?;

    let mut detail = DetailScreen::open(repository.clone(), car, false);
    detail.toggle_edit();
    detail.set_mirror(cmd.mirror);
    let written = detail.set_field(field, &cmd.value);
    detail.toggle_edit();
    detail.settle().await?;

    let stored = find_car(&repository, cmd.id)?;
    for field in written {
        println!("{} = {}", field.key(), stored.text(field));
    }
    Ok(())
}

async fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let repository = open_repository(config)?;
    let car = find_car(&repository, cmd.id)?;

    if !cmd.yes {
        println!("This will delete '{}' (id {}).", car.name, car.id);
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let name = car.name.clone();
    let mut detail = DetailScreen::open(repository, car, false);
    detail.request_delete();
    detail.confirm_delete().await?;
    println!("Deleted '{name}'.");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!(
                    "  Journal mode:       {}",
                    config.storage.journal_mode.pragma()
                );
                println!();
                println!("[Shell]");
                println!("  Prompt:             {:?}", config.shell.prompt);
                println!("  Show field keys:    {}", config.shell.show_field_keys);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
