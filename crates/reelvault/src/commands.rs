//! CLI commands for the movie table demo.

use std::path::PathBuf;

use anyhow::Result;
use aws_sdk_dynamodb::Client;
use clap::Parser;
use dialoguer::Confirm;

use reelvault_core::codec;
use reelvault_core::expr::{ExpressionBuilder, Predicate, UpdateBuilder};
use reelvault_core::movie::{Movie, MovieKey};
use reelvault_core::scan::post_filter;
use reelvault_core::schema::{movies_schema, FIELD_RATING, FIELD_TITLE, FIELD_YEAR};
use reelvault_core::store::TableStore;

use crate::deploy;
use crate::seed;
use crate::store::dynamodb::{create_client, get_table_state, AwsConfig, DynamoStore};

/// reelvault - a movie catalog demo on DynamoDB
#[derive(Debug, Parser)]
#[command(name = "reelvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub action: Action,
}

/// Available actions.
#[derive(Debug, clap::Subcommand)]
pub enum Action {
    /// Deploy or destroy the movie table infrastructure.
    Deploy(DeployCommand),

    /// List the tables in the target account.
    ListTables(ListTablesCommand),

    /// Insert or replace a single movie.
    Put(PutCommand),

    /// Fetch a single movie by year and title.
    Get(GetCommand),

    /// Scan for movies by year, then filter by rating client-side.
    Scan(ScanCommand),

    /// Update the rating of a movie.
    Update(UpdateCommand),

    /// Delete a movie by year and title.
    Delete(DeleteCommand),

    /// Load movies from a JSON seed file.
    Seed(SeedCommand),
}

/// Deploy or destroy the movie table.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy the movie table infrastructure.

By default, this command creates the movies DynamoDB table with its
composite primary key (partition key Year, sort key Title).

The command shows a plan of changes before applying and asks for
confirmation.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the table instead of creating it.
    #[arg(long)]
    pub destroy: bool,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// List tables in the target account.
#[derive(Debug, clap::Parser)]
pub struct ListTablesCommand {
    /// Maximum number of table names per page.
    #[arg(long, default_value = "5")]
    pub limit: i32,
}

/// Insert or replace a movie.
#[derive(Debug, clap::Parser)]
pub struct PutCommand {
    /// Release year (partition key).
    #[arg(long)]
    pub year: i32,

    /// Title (sort key).
    #[arg(long)]
    pub title: String,

    /// Plot summary.
    #[arg(long)]
    pub plot: Option<String>,

    /// Rating, 0.0 when omitted.
    #[arg(long, default_value = "0.0")]
    pub rating: f64,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Fetch a movie.
#[derive(Debug, clap::Parser)]
pub struct GetCommand {
    /// Release year (partition key).
    #[arg(long)]
    pub year: i32,

    /// Title (sort key).
    #[arg(long)]
    pub title: String,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Scan for movies with the two-stage filter.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Scan the movie table with a two-stage filter.

The store evaluates the coarse filter (Year >= --year) and returns only
Title, Year, and Rating. The precise rating filter (> --min-rating) runs
client-side over the decoded records.")]
pub struct ScanCommand {
    /// Minimum release year for the server-side filter.
    #[arg(long, default_value = "2014")]
    pub year: i32,

    /// Minimum rating for the client-side filter (exclusive).
    #[arg(long, default_value = "4.0")]
    pub min_rating: f64,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Update a movie's rating.
#[derive(Debug, clap::Parser)]
pub struct UpdateCommand {
    /// Release year (partition key).
    #[arg(long)]
    pub year: i32,

    /// Title (sort key).
    #[arg(long)]
    pub title: String,

    /// New rating.
    #[arg(long)]
    pub rating: f64,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Delete a movie.
#[derive(Debug, clap::Parser)]
pub struct DeleteCommand {
    /// Release year (partition key).
    #[arg(long)]
    pub year: i32,

    /// Title (sort key).
    #[arg(long)]
    pub title: String,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Load movies from a JSON seed file.
#[derive(Debug, clap::Parser)]
pub struct SeedCommand {
    /// Path to the seed file.
    #[arg(long, default_value = "data/movies.json")]
    pub file: PathBuf,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Table name to use.
    #[arg(long, default_value = "movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Main entry point for the CLI.
pub async fn run(cli: Cli) -> Result<()> {
    let aws_config = AwsConfig::default();
    tracing::debug!(endpoint = %aws_config.target_display(), "connecting");
    let client = create_client(&aws_config).await?;

    match cli.action {
        Action::Deploy(cmd) => run_deploy(&client, cmd).await,
        Action::ListTables(cmd) => {
            let store = DynamoStore::new(client, "movies");
            run_list_tables(&store, cmd).await
        }
        Action::Put(cmd) => {
            let store = DynamoStore::new(client, cmd.table_name.clone());
            run_put(&store, cmd).await
        }
        Action::Get(cmd) => {
            let store = DynamoStore::new(client, cmd.table_name.clone());
            run_get(&store, cmd).await
        }
        Action::Scan(cmd) => {
            let store = DynamoStore::new(client, cmd.table_name.clone());
            run_scan(&store, cmd).await
        }
        Action::Update(cmd) => {
            let store = DynamoStore::new(client, cmd.table_name.clone());
            run_update(&store, cmd).await
        }
        Action::Delete(cmd) => {
            let store = DynamoStore::new(client, cmd.table_name.clone());
            run_delete(&store, cmd).await
        }
        Action::Seed(cmd) => {
            let store = DynamoStore::new(client, cmd.table_name.clone());
            run_seed(&store, cmd).await
        }
    }
}

async fn run_deploy(client: &Client, cmd: DeployCommand) -> Result<()> {
    let schema = movies_schema();
    let current_state = get_table_state(client, &cmd.table_name).await?;

    if cmd.destroy {
        let plan = deploy::calculate_destroy_plan(current_state, &cmd.table_name);

        println!("Destroy Plan:");
        for line in deploy::format_destroy_plan(&plan) {
            println!("  {line}");
        }

        if matches!(plan, deploy::DestroyPlan::AlreadyGone { .. }) {
            println!("Nothing to destroy.");
            return Ok(());
        }

        if !cmd.force {
            let confirmed = Confirm::new()
                .with_prompt("Are you sure you want to delete this table? ALL DATA WILL BE LOST")
                .default(false)
                .interact()?;

            if !confirmed {
                anyhow::bail!("cancelled by user");
            }
        }

        deploy::execute_destroy_plan(client, &plan).await?;
        println!("Table destroyed successfully.");
    } else {
        let plan = deploy::calculate_deploy_plan(current_state, &cmd.table_name);

        println!("Deploy Plan:");
        for line in deploy::format_deploy_plan(&plan, &schema) {
            println!("  {line}");
        }

        if matches!(plan, deploy::DeployPlan::NoChanges { .. }) {
            println!("Infrastructure is up to date.");
            return Ok(());
        }

        if !cmd.force {
            let confirmed = Confirm::new()
                .with_prompt("Apply these changes?")
                .default(true)
                .interact()?;

            if !confirmed {
                anyhow::bail!("cancelled by user");
            }
        }

        deploy::execute_deploy_plan(client, &plan, &schema).await?;
        println!("Infrastructure deployed successfully.");
    }

    Ok(())
}

async fn run_list_tables(store: &DynamoStore, cmd: ListTablesCommand) -> Result<()> {
    println!("Tables:");

    let mut start_table: Option<String> = None;
    let mut index = 0;

    // Page through the listing; each call returns at most `limit` names.
    loop {
        let page = store.list_tables(Some(cmd.limit), start_table).await?;
        for name in &page.names {
            println!("{index} ----- {name}");
            index += 1;
        }
        match page.next {
            Some(next) => start_table = Some(next),
            None => break,
        }
    }

    Ok(())
}

async fn run_put(store: &DynamoStore, cmd: PutCommand) -> Result<()> {
    let mut movie = Movie::new(cmd.year, cmd.title).with_rating(cmd.rating);
    if let Some(plot) = cmd.plot {
        movie = movie.with_plot(plot);
    }

    store.put_item(codec::encode(&movie)).await?;

    println!(
        "Successfully added '{}' ({}) to table {}",
        movie.title, movie.year, cmd.table_name
    );
    Ok(())
}

async fn run_get(store: &DynamoStore, cmd: GetCommand) -> Result<()> {
    let key = MovieKey::new(cmd.year, cmd.title.clone());

    match store.get_item(&codec::encode_key(&key)).await? {
        Some(item) => {
            let movie = codec::decode(&item)?;
            println!("Found item:");
            println!("Year:   {}", movie.year);
            println!("Title:  {}", movie.title);
            println!("Plot:   {}", movie.plot.as_deref().unwrap_or(""));
            println!("Rating: {}", movie.rating);
        }
        None => {
            println!("Could not find '{}' ({})", cmd.title, cmd.year);
        }
    }

    Ok(())
}

async fn run_scan(store: &DynamoStore, cmd: ScanCommand) -> Result<()> {
    let schema = movies_schema();

    // Coarse server-side filter on year; the precise rating check runs
    // client-side below.
    let spec = ExpressionBuilder::new(&schema)
        .with_filter(Predicate::greater_than_equal(FIELD_YEAR, cmd.year))
        .with_projection([FIELD_TITLE, FIELD_YEAR, FIELD_RATING])
        .build()?;

    let items = store.scan(&spec).await?;
    let movies = items
        .iter()
        .map(codec::decode)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut count = 0;
    for movie in post_filter(movies, |m| m.rating > cmd.min_rating) {
        println!("Title:  {}", movie.title);
        println!("Rating: {}", movie.rating);
        println!();
        count += 1;
    }

    println!(
        "Found {count} movie(s) with a rating above {} in {}",
        cmd.min_rating, cmd.year
    );
    Ok(())
}

async fn run_update(store: &DynamoStore, cmd: UpdateCommand) -> Result<()> {
    let schema = movies_schema();
    let key = MovieKey::new(cmd.year, cmd.title.clone());

    let update = UpdateBuilder::new(&schema)
        .set(FIELD_RATING, cmd.rating)
        .build()?;

    store.update_item(codec::encode_key(&key), &update).await?;

    println!(
        "Successfully updated '{}' ({}) rating to {}",
        cmd.title, cmd.year, cmd.rating
    );
    Ok(())
}

async fn run_delete(store: &DynamoStore, cmd: DeleteCommand) -> Result<()> {
    let key = MovieKey::new(cmd.year, cmd.title.clone());

    store.delete_item(codec::encode_key(&key)).await?;

    println!(
        "Deleted '{}' ({}) from table {}",
        cmd.title, cmd.year, cmd.table_name
    );
    Ok(())
}

async fn run_seed(store: &DynamoStore, cmd: SeedCommand) -> Result<()> {
    let movies = seed::load_movies(&cmd.file)?;

    println!("Movies to insert:");
    for movie in movies.iter().take(5) {
        println!("  {} - {}", movie.year, movie.title);
    }
    if movies.len() > 5 {
        println!("  ... and {} more", movies.len() - 5);
    }

    if !cmd.force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Insert {} movies?", movies.len()))
            .default(true)
            .interact()?;

        if !confirmed {
            anyhow::bail!("cancelled by user");
        }
    }

    let inserted = seed::seed_movies(store, &movies).await?;
    println!("Success: {inserted} movies inserted.");

    Ok(())
}
