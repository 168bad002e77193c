//! Milk Monster command line interface
//!
//! # Usage
//!
//! ```bash
//! # Generate a monster from a product label
//! monster generate --product-name おいしい牛乳 --category 牛乳 \
//!     --non-fat-solid 8.3 --milk-fat 3.8 --manufacturer 明治
//!
//! # List the collection, newest first
//! monster list
//!
//! # Raw outcome JSON
//! monster --json list
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use milk_monster::{
    CollectionOutcome, GenerationForm, GenerationOutcome, Monster, MonsterConfig, MonsterPipeline,
    Rarity,
};

const UNSAVED_HINT: &str = "画像は生成されましたが、図鑑には登録されていません。";

#[derive(Parser)]
#[command(name = "monster")]
#[command(version)]
#[command(about = "Generate milk monsters from dairy product labels and browse the collection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print the raw outcome JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and save a monster
    Generate {
        /// Product name as printed on the package
        #[arg(long)]
        product_name: String,

        /// Product category: 牛乳, 加工乳 or 乳飲料
        #[arg(long)]
        category: String,

        /// Non-fat milk solids, percent
        #[arg(long)]
        non_fat_solid: String,

        /// Milk fat, percent
        #[arg(long)]
        milk_fat: String,

        /// Manufacturer name
        #[arg(long)]
        manufacturer: String,
    },

    /// List all saved monsters, newest first
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,milk_monster=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the command succeeded
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = MonsterConfig::from_env().context("loading configuration")?;
    let pipeline = MonsterPipeline::from_config(&config).context("building pipeline")?;

    match cli.command {
        Commands::Generate {
            product_name,
            category,
            non_fat_solid,
            milk_fat,
            manufacturer,
        } => {
            let form = GenerationForm {
                product_name: Some(product_name),
                category: Some(category),
                non_fat_solid: Some(non_fat_solid),
                milk_fat: Some(milk_fat),
                manufacturer: Some(manufacturer),
            };
            let outcome = pipeline.generate(&form).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_generation(&outcome);
            }
            Ok(outcome.is_success())
        }
        Commands::List => {
            let outcome = pipeline.list().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_collection(&outcome);
            }
            Ok(outcome.error.is_none())
        }
    }
}

fn print_generation(outcome: &GenerationOutcome) {
    println!("{}", outcome.message);
    if let Some(monster) = &outcome.monster {
        print_card(monster);
    }
    if let Some(fields) = &outcome.field_errors {
        for (field, messages) in fields {
            println!("  {}: {}", field, messages.join(" "));
        }
    } else if let Some(error) = &outcome.error {
        println!("  {}", error);
    }
    if outcome.failure.is_some_and(|kind| kind.is_unsaved_generation()) {
        println!("  {}", UNSAVED_HINT);
    }
}

fn print_collection(outcome: &CollectionOutcome) {
    if let Some(error) = &outcome.error {
        println!("{}", error);
        return;
    }
    if outcome.monsters.is_empty() {
        println!("まだモンスターがいません。");
        return;
    }
    for monster in &outcome.monsters {
        print_card(monster);
    }
}

fn print_card(monster: &Monster) {
    println!(
        "{} [{}] {}  HP {}  ATK {}",
        monster.name,
        monster.attribute,
        Rarity::stars(monster.rarity),
        monster.hp,
        monster.attack
    );
    println!("  {}", monster.image_url);
}
