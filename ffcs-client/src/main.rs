use anyhow::Context;
use clap::Parser;
use ffcs_client::{
    Client,
    config::{Cli, Command},
    logging::initialize_logging,
};
use ffcs_core::model::CampaignScope;
use serde::Serialize;

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().unwrap_or_default();
    let Cli {
        config,
        log_dir,
        command,
    } = Cli::parse();

    initialize_logging(log_dir);

    let client = Client::from_config(&config).context("failed to set up the service client")?;

    match command {
        Command::Ping => print(&client.check_if_db_connected()?)?,
        Command::Campaigns { user_account } => print(&client.get_campaigns(&user_account)?)?,
        Command::NextXtalNumber { plate_id } => println!("{}", client.get_next_xtal_number(&plate_id)?),
        Command::LastFishedXtal {
            user_account,
            campaign_id,
        } => print(&client.find_last_fished_xtal(&CampaignScope::new(user_account, campaign_id))?)?,
        Command::ExportToSoak {
            user_account,
            campaign_id,
            plate_id,
        } => {
            let key = CampaignScope::new(user_account, campaign_id).plate(plate_id);
            let outcome = client
                .export_to_soak(&key)
                .with_context(|| format!("failed to export plate {}", key.plate_id))?;
            println!("{} wells exported", outcome.modified_count);
        }
        Command::Well { well_id } => print(&client.get_one_well(well_id)?)?,
    }

    Ok(())
}
