use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use ffcs_core::{ObjectId, model::status::TransitionPolicy};
use url::Url;

#[derive(Args, serde::Deserialize, Clone, Debug)]
pub struct Config {
    #[arg(long, env = "FFCS_BASE_URL")]
    base_url: Url,
    #[arg(long, env = "FFCS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
    #[arg(long, env = "FFCS_TRANSITION_POLICY", default_value_t)]
    #[serde(default)]
    transition_policy: TransitionPolicy,
}

impl Config {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: None,
            transition_policy: TransitionPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_transition_policy(mut self, transition_policy: TransitionPolicy) -> Self {
        self.transition_policy = transition_policy;

        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn transition_policy(&self) -> TransitionPolicy {
        self.transition_policy
    }
}

#[derive(Parser)]
#[command(version, about = "Query and advance plates and wells in the FFCS database")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,
    #[arg(long, env = "FFCS_LOG_DIR")]
    pub log_dir: Option<Utf8PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the service can reach its database
    Ping,
    /// List the campaigns of a user
    Campaigns { user_account: String },
    /// Print the next free `xtal-N` number on a plate
    NextXtalNumber { plate_id: String },
    /// Show the most recently fished crystal of a campaign
    LastFishedXtal {
        user_account: String,
        campaign_id: String,
    },
    /// Export every pending well of a plate to soaking
    ExportToSoak {
        user_account: String,
        campaign_id: String,
        plate_id: String,
    },
    /// Print one well
    Well { well_id: ObjectId },
}
