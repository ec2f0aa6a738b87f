//! Clap derive structures for the `canvass` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// canvass -- admin console for the Canvass campaign platform
#[derive(Debug, Parser)]
#[command(
    name = "canvass",
    version,
    about = "Manage campaigns, landing pages, and prospects from the command line",
    long_about = "Admin console for the Canvass marketing-campaign platform.\n\n\
        Lists and edits campaigns and landing pages, browses the prospect\n\
        store with server-declared search filters, and drives the campaign\n\
        email outbox.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Platform profile to use
    #[arg(long, short = 'p', env = "CANVASS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Platform URL (overrides profile)
    #[arg(long, short = 'u', env = "CANVASS_URL", global = true)]
    pub url: Option<String>,

    /// Admin email (overrides profile)
    #[arg(long, env = "CANVASS_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CANVASS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CANVASS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CANVASS_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Command Tree ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage campaigns
    Campaigns(CampaignsArgs),

    /// Manage landing pages
    Landingpages(LandingpagesArgs),

    /// Browse and count prospects
    Prospects(ProspectsArgs),

    /// Send campaign emails and inspect delivery stats
    Outbox(OutboxArgs),

    /// Show the signed-in admin
    Whoami,

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Campaigns ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub command: CampaignsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CampaignsCommand {
    /// List campaigns
    List(ListOpts),

    /// Show one campaign
    Get {
        /// Campaign id
        id: String,
    },

    /// Delete a campaign (asks for confirmation)
    Delete {
        /// Campaign id
        id: String,
    },
}

// ── Landing pages ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LandingpagesArgs {
    #[command(subcommand)]
    pub command: LandingpagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LandingpagesCommand {
    /// List landing pages
    List(ListOpts),

    /// Show one landing page
    Get {
        /// Landing page id
        id: String,
    },

    /// Delete a landing page (asks for confirmation)
    Delete {
        /// Landing page id
        id: String,
    },
}

// ── Prospects ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProspectsArgs {
    #[command(subcommand)]
    pub command: ProspectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProspectsCommand {
    /// List prospects matching the filter flags
    List {
        #[command(flatten)]
        list: ListOpts,

        #[command(flatten)]
        filter: FilterOpts,
    },

    /// Count prospects matching the filter flags
    Count {
        #[command(flatten)]
        filter: FilterOpts,
    },

    /// Show the server-declared search criteria
    Criteria,
}

/// Filter flags mapped onto the prospect search criteria. Flags for
/// fields the server does not declare are ignored.
#[derive(Debug, Default, Args)]
pub struct FilterOpts {
    /// Exact age (mutually exclusive with the age range)
    #[arg(long, conflicts_with_all = ["min_age", "max_age"])]
    pub age: Option<f64>,

    /// Minimum age
    #[arg(long)]
    pub min_age: Option<f64>,

    /// Maximum age
    #[arg(long)]
    pub max_age: Option<f64>,

    /// Gender (repeatable)
    #[arg(long)]
    pub gender: Vec<String>,

    /// Blood group (repeatable)
    #[arg(long)]
    pub blood_group: Vec<String>,

    /// City (repeatable)
    #[arg(long)]
    pub city: Vec<String>,

    /// Born on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub born_after: Option<String>,

    /// Born on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub born_before: Option<String>,

    /// Minimum height in cm
    #[arg(long)]
    pub min_height: Option<f64>,

    /// Maximum height in cm
    #[arg(long)]
    pub max_height: Option<f64>,
}

impl FilterOpts {
    /// True when no filter flag was given at all.
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.min_age.is_none()
            && self.max_age.is_none()
            && self.gender.is_empty()
            && self.blood_group.is_empty()
            && self.city.is_empty()
            && self.born_after.is_none()
            && self.born_before.is_none()
            && self.min_height.is_none()
            && self.max_height.is_none()
    }
}

// ── Shared list options ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListOpts {
    /// Page to fetch
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page
    #[arg(long, default_value = "25")]
    pub per_page: u32,

    /// Fetch every page and concatenate
    #[arg(long, conflicts_with = "page")]
    pub all: bool,
}

// ── Outbox ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OutboxArgs {
    #[command(subcommand)]
    pub command: OutboxCommand,
}

#[derive(Debug, Subcommand)]
pub enum OutboxCommand {
    /// Send a campaign's emails to matching prospects
    Send {
        /// Campaign id
        campaign_id: String,

        /// Re-send to prospects that were already notified
        #[arg(long)]
        force: bool,
    },

    /// Show a campaign's delivery counters
    Stats {
        /// Campaign id
        campaign_id: String,
    },
}

// ── Config / completions ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
