//! Configuration management for the blog posts API.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with the `BLOG_` prefix (plus `AWS_REGION`)
//! - Defaults matching the production deployment
//!
//! # Commands
//!
//! - *(none)* / `lambda` - Run under the AWS Lambda runtime
//! - `serve` - Run a local HTTP server
//! - `check` - Verify the table and bucket are reachable
//! - `presign` - Print a time-limited link for one image key
//!
//! # Environment Variables
//!
//! - `AWS_REGION` - AWS region (default: SDK provider chain)
//! - `BLOG_TABLE` - DynamoDB table name (default: blog-db)
//! - `BLOG_BUCKET` - S3 bucket holding images (default: blog-api-s3-bucket)
//! - `BLOG_DYNAMODB_ENDPOINT` - Custom DynamoDB endpoint (DynamoDB Local)
//! - `BLOG_S3_ENDPOINT` - Custom S3 endpoint (MinIO, LocalStack)
//! - `BLOG_LINK_TTL` - Image link validity in seconds (default: 259200)
//! - `BLOG_HOST` / `BLOG_PORT` - Local server bind address (serve only)

use std::time::Duration;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use clap::{Args, Parser, Subcommand};

use crate::blob::{DEFAULT_LINK_TTL, MAX_LINK_TTL};

// =============================================================================
// Default Values
// =============================================================================

/// Default DynamoDB table holding posts.
pub const DEFAULT_TABLE_NAME: &str = "blog-db";

/// Default S3 bucket holding post images.
pub const DEFAULT_BUCKET_NAME: &str = "blog-api-s3-bucket";

/// Default local server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default local server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default image link validity in seconds (72 hours).
pub const DEFAULT_LINK_TTL_SECS: u64 = DEFAULT_LINK_TTL.as_secs();

// =============================================================================
// CLI Arguments
// =============================================================================

/// Blog Posts API - a serverless CRUD API for blog posts.
///
/// Without a subcommand the binary runs as an AWS Lambda function.
#[derive(Parser, Debug, Clone)]
#[command(name = "blog-posts-api")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub lambda: LambdaConfig,
}

impl Cli {
    /// The command to run; Lambda mode when none was given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Lambda(self.lambda))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run under the AWS Lambda runtime (default)
    Lambda(LambdaConfig),

    /// Run a local HTTP server
    Serve(ServeConfig),

    /// Check that the table and bucket are reachable
    Check(CheckConfig),

    /// Print a presigned link for an image key
    Presign(PresignConfig),
}

/// Options shared by every command that talks to AWS.
#[derive(Args, Debug, Clone)]
pub struct AwsConfig {
    /// AWS region. Falls back to the SDK provider chain when unset.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// DynamoDB table holding posts (partition key: `id`).
    #[arg(long, default_value = DEFAULT_TABLE_NAME, env = "BLOG_TABLE")]
    pub table: String,

    /// S3 bucket holding post images.
    #[arg(long, default_value = DEFAULT_BUCKET_NAME, env = "BLOG_BUCKET")]
    pub bucket: String,

    /// Custom DynamoDB endpoint URL (e.g. DynamoDB Local).
    #[arg(long, env = "BLOG_DYNAMODB_ENDPOINT")]
    pub dynamodb_endpoint: Option<String>,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long, env = "BLOG_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Validity of presigned image links, in seconds.
    #[arg(long, default_value_t = DEFAULT_LINK_TTL_SECS, env = "BLOG_LINK_TTL")]
    pub link_ttl: u64,
}

impl AwsConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.table.trim().is_empty() {
            return Err("Table name is required. Set --table or BLOG_TABLE".to_string());
        }

        if self.bucket.trim().is_empty() {
            return Err("Bucket name is required. Set --bucket or BLOG_BUCKET".to_string());
        }

        if self.link_ttl == 0 || self.link_ttl > MAX_LINK_TTL.as_secs() {
            return Err(format!(
                "link_ttl must be between 1 and {} seconds (7 days)",
                MAX_LINK_TTL.as_secs()
            ));
        }

        Ok(())
    }

    /// Link validity window as a duration.
    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl)
    }

    /// Load the shared AWS SDK configuration. The region is read once here.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref region) = self.region {
            loader = loader.region(Region::new(region.clone()));
        }

        loader.load().await
    }
}

/// Lambda runtime configuration.
#[derive(Args, Debug, Clone)]
pub struct LambdaConfig {
    #[command(flatten)]
    pub aws: AwsConfig,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

/// Local server configuration.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "BLOG_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "BLOG_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub aws: AwsConfig,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }
        self.aws.validate()
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connectivity check configuration.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub aws: AwsConfig,

    /// Also presign a link for this image key.
    #[arg(long)]
    pub test_image: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Presign command configuration.
#[derive(Args, Debug, Clone)]
pub struct PresignConfig {
    /// Object key of the image inside the bucket.
    pub key: String,

    #[command(flatten)]
    pub aws: AwsConfig,
}

impl PresignConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("Object key must not be empty".to_string());
        }
        self.aws.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
