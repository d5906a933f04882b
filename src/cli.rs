// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "d2ship")]
#[command(about = "Build, publish and run DHIS2 data instances through d2-docker")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to d2ship.yml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List instances known to the gateway
    List,

    /// List registry projects
    Projects,

    /// List data images published in a project
    Images {
        project: String,
    },

    /// Build a local image from a template and start it
    Create(CreateArgs),

    /// Start instances
    Start {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Stop instances
    Stop {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Commit the current state of instances into their images
    Commit {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Push instance images to the registry
    Push {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Pull instance images from the registry
    Pull {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Remove instance images
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the logs download URL of an instance
    Logs {
        id: String,

        /// Maximum number of log lines
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Print the database download URL of an instance
    Db {
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Template image reference (registry/project/dhis2-data:version-name)
    #[arg(long)]
    pub image: String,

    /// Name of the new local image
    #[arg(long)]
    pub name: String,

    /// Host port of the instance
    #[arg(long, default_value = "")]
    pub port: String,

    /// Restart the existing local image instead of building a new one
    #[arg(long)]
    pub existing: bool,

    #[arg(long)]
    pub db_port: Option<String>,

    #[arg(long)]
    pub deploy_path: Option<String>,

    #[arg(long)]
    pub java_opt: Option<String>,
}
