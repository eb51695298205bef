use clap::Subcommand;
use focus_core::clock::format_hhmm;
use focus_core::Config;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// List the configured routines
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        RoutineAction::List { json: true } => {
            println!("{}", serde_json::to_string_pretty(&config.routines)?);
        }
        RoutineAction::List { json: false } => {
            for slot in &config.routines {
                println!(
                    "{}-{}  {} {}",
                    format_hhmm(slot.start),
                    format_hhmm(slot.end),
                    slot.name,
                    slot.icon.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
