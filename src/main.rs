//! CLI entry point for blog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_rs::server::SiteRoot;

#[derive(Parser)]
#[command(name = "blog-rs")]
#[command(version)]
#[command(about = "A minimal static site generator for HTML fragments", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate static files
    Build {
        /// Site to build at the root URL (defaults to every site, each
        /// under its own path prefix)
        site: Option<String>,
    },

    /// Build, then start a local server
    Serve {
        /// Site to serve at the root; without it every site is served
        /// under its own path prefix
        site: Option<String>,
    },

    /// Remove generated files
    Clean {
        /// Site to clean (defaults to the whole public folder)
        site: Option<String>,
    },

    /// List the posts and pages of a site
    List {
        /// Site whose content is listed
        site: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_rs=debug,info"
    } else {
        "blog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let blog = blog_rs::Blog::new(&base_dir)?;

    match cli.command {
        Commands::Build { site } => {
            blog.build(site.as_deref())?;
            println!("Built successfully!");
        }

        Commands::Serve { site } => {
            blog.build(site.as_deref())?;

            let root = match &site {
                Some(name) => SiteRoot::Single(blog.site(name)?.output_dir),
                None => SiteRoot::Multi(blog.public_dir.clone()),
            };
            blog_rs::server::start(root, &blog.config.listen_addr()).await?;
        }

        Commands::Clean { site } => {
            blog.clean(site.as_deref())?;
            println!("Cleaned successfully!");
        }

        Commands::List { site } => {
            blog_rs::commands::list::run(&blog, &site)?;
        }
    }

    Ok(())
}
