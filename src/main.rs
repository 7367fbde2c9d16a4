//! Blog Posts API - serverless CRUD over DynamoDB and S3.
//!
//! This binary runs the API under the Lambda runtime (the default) or as a
//! local HTTP server, and carries two operator commands.

use aws_sdk_dynamodb::types::KeyType;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_posts_api::{
    blob::{create_s3_client, LinkSigner, S3LinkSigner},
    config::{AwsConfig, CheckConfig, Cli, Command, LambdaConfig, PresignConfig, ServeConfig},
    post::PostService,
    server::{create_router, lambda_app, RouterConfig},
    store::{create_dynamodb_client, DynamoPostStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Lambda(config) => run_lambda(config).await,
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
        Command::Presign(config) => run_presign(config).await,
    }
}

/// Build the post service over DynamoDB and S3.
async fn build_service(config: &AwsConfig) -> PostService<DynamoPostStore, S3LinkSigner> {
    let sdk_config = config.load_sdk_config().await;

    let dynamodb = create_dynamodb_client(&sdk_config, config.dynamodb_endpoint.as_deref());
    let s3 = create_s3_client(&sdk_config, config.s3_endpoint.as_deref());

    PostService::with_link_ttl(
        DynamoPostStore::new(dynamodb, config.table.clone()),
        S3LinkSigner::new(s3, config.bucket.clone()),
        config.link_ttl(),
    )
}

fn log_aws_config(config: &AwsConfig) {
    info!("Configuration:");
    info!(
        "  Region: {}",
        config.region.as_deref().unwrap_or("(provider chain)")
    );
    info!("  Table: {}", config.table);
    if let Some(ref endpoint) = config.dynamodb_endpoint {
        info!("  DynamoDB endpoint: {}", endpoint);
    }
    info!("  Bucket: {}", config.bucket);
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  Image link TTL: {}s", config.link_ttl);
}

// =============================================================================
// Lambda Command
// =============================================================================

async fn run_lambda(config: LambdaConfig) -> ExitCode {
    init_logging(config.verbose, true);

    if let Err(e) = config.aws.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    log_aws_config(&config.aws);

    let service = build_service(&config.aws).await;
    let router = create_router(
        service,
        RouterConfig::new().with_tracing(!config.no_tracing),
    );

    info!("Starting Lambda runtime");

    if let Err(e) = lambda_http::run(lambda_app(router)).await {
        error!("Lambda runtime error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose, false);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    log_aws_config(&config.aws);

    let service = build_service(&config.aws).await;
    let router = create_router(
        service,
        RouterConfig::new().with_tracing(!config.no_tracing),
    );

    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/health", addr);
    info!("  curl http://{}/posts", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true, false);
    }

    println!("Blog Posts API Configuration Check");
    println!("═══════════════════════════════════");
    println!();

    if let Err(e) = config.aws.validate() {
        println!("✗ Configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let sdk_config = config.aws.load_sdk_config().await;
    match sdk_config.region() {
        Some(region) => println!("✓ Region: {}", region),
        None => {
            println!("✗ Region: not set (use --region or AWS_REGION)");
            return ExitCode::FAILURE;
        }
    }
    println!();

    // Table
    print!("Checking table '{}'... ", config.aws.table);
    let dynamodb = create_dynamodb_client(&sdk_config, config.aws.dynamodb_endpoint.as_deref());
    match dynamodb
        .describe_table()
        .table_name(&config.aws.table)
        .send()
        .await
    {
        Ok(output) => {
            println!("✓ found");
            if let Some(table) = output.table() {
                if let Some(status) = table.table_status() {
                    println!("  Status: {}", status.as_str());
                }
                if let Some(count) = table.item_count() {
                    println!("  Items (approximate): {}", count);
                }
                let partition_key = table
                    .key_schema()
                    .iter()
                    .find(|k| *k.key_type() == KeyType::Hash)
                    .map(|k| k.attribute_name().to_string());
                match partition_key.as_deref() {
                    Some("id") => println!("  Partition key: id"),
                    Some(other) => {
                        println!("  ✗ Partition key is '{}', expected 'id'", other);
                        return ExitCode::FAILURE;
                    }
                    None => println!("  Partition key: (unknown)"),
                }
            }
        }
        Err(e) => {
            println!("✗ failed");
            println!();
            println!(
                "Error: {}",
                aws_sdk_dynamodb::error::DisplayErrorContext(&e)
            );
            println!();
            println!("Please check:");
            println!("  - Your AWS credentials are configured correctly");
            println!("  - The table '{}' exists in this region", config.aws.table);
            return ExitCode::FAILURE;
        }
    }

    // Bucket
    print!("Checking bucket '{}'... ", config.aws.bucket);
    let s3 = create_s3_client(&sdk_config, config.aws.s3_endpoint.as_deref());
    match s3.head_bucket().bucket(&config.aws.bucket).send().await {
        Ok(_) => println!("✓ found"),
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", aws_sdk_s3::error::DisplayErrorContext(&e));
            println!();
            println!("Please check:");
            println!("  - The bucket '{}' exists and is accessible", config.aws.bucket);
            if config.aws.s3_endpoint.is_some() {
                println!("  - The S3 endpoint is correct and reachable");
            }
            return ExitCode::FAILURE;
        }
    }

    // Optional presign of a known image
    if let Some(ref key) = config.test_image {
        print!("Presigning '{}'... ", key);
        let signer = S3LinkSigner::new(s3, config.aws.bucket.clone());
        match signer.presign_get(key, config.aws.link_ttl()).await {
            Ok(url) => {
                println!("✓ ok");
                println!("  {}", url);
            }
            Err(e) => {
                println!("✗ failed");
                println!("  {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!();
    println!("═══════════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}

// =============================================================================
// Presign Command
// =============================================================================

async fn run_presign(config: PresignConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let sdk_config = config.aws.load_sdk_config().await;
    let s3 = create_s3_client(&sdk_config, config.aws.s3_endpoint.as_deref());
    let signer = S3LinkSigner::new(s3, config.aws.bucket.clone());

    match signer.presign_get(&config.key, config.aws.link_ttl()).await {
        Ok(url) => {
            println!("{}", url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Under Lambda, CloudWatch timestamps each line and does not render ANSI
/// colours, so both are turned off.
fn init_logging(verbose: bool, lambda: bool) {
    let env_filter = if verbose {
        "blog_posts_api=debug,tower_http=debug"
    } else {
        "blog_posts_api=info,tower_http=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());
    let fmt_layer = tracing_subscriber::fmt::layer().with_ansi(!lambda);

    if lambda {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.without_time())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
