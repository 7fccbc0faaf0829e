use anyhow::Result;
use clap::{Parser, Subcommand};
use streams_console::{
    cli::{self, ListArgs, Session},
    config::{CliConfig, OutputFormat},
};
use streams_models::CreateInstanceRequest;

#[derive(Parser)]
#[command(name = "streams-console")]
#[command(about = "Manage hosted streaming instances from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL override
    #[arg(long, global = true, env = "STREAMS_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, global = true, env = "STREAMS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Logged-in username, used for ownership checks
    #[arg(long, global = true, env = "STREAMS_USER")]
    user: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List instances
    List {
        #[command(flatten)]
        args: ListArgs,
    },

    /// List instances and keep the list up to date until Ctrl-C
    Watch {
        #[command(flatten)]
        args: ListArgs,
    },

    /// Show an instance
    Show {
        /// Instance ID
        id: String,

        /// Show connection information instead of details
        #[arg(long)]
        connection: bool,
    },

    /// Create a new instance
    Create {
        /// Instance name
        #[arg(long)]
        name: String,

        /// Cloud provider (e.g. aws)
        #[arg(long)]
        provider: String,

        /// Cloud region (e.g. us-east-1)
        #[arg(long)]
        region: String,

        /// Plan, e.g. developer.x1
        #[arg(long)]
        plan: Option<String>,
    },

    /// Delete an instance
    Delete {
        /// Instance ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Transfer an instance to another owner
    TransferOwner {
        /// Instance ID
        id: String,

        /// Username of the new owner
        new_owner: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = CliConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(user) = cli.user {
        config.username = Some(user);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let session = Session::new(config, cli.token)?;

    match cli.command {
        Commands::List { args } => cli::list::execute(&session, &args).await?,
        Commands::Watch { args } => cli::watch::execute(&session, &args).await?,
        Commands::Show { id, connection } => cli::show::execute(&session, &id, connection).await?,
        Commands::Create {
            name,
            provider,
            region,
            plan,
        } => {
            let request = CreateInstanceRequest {
                name,
                cloud_provider: provider,
                region,
                plan,
            };
            cli::create::execute(&session, request).await?;
        }
        Commands::Delete { id, yes } => cli::delete::execute(&session, &id, yes).await?,
        Commands::TransferOwner { id, new_owner } => {
            cli::transfer_owner::execute(&session, &id, new_owner).await?;
        }
    }

    Ok(())
}
