use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lisp2scs::{ShowModelManager, TranslationEvent};

#[derive(Parser)]
#[command(name = "lisp2scs")]
#[command(about = "Convert LiSP cue lists to and from SCS productions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a show as an SCS production
    Export {
        /// Show file (JSON)
        show: PathBuf,

        /// Production file to write (.scs11)
        output: PathBuf,
    },

    /// Append the cues of an SCS production to a show
    Import {
        /// Production file (.scs11)
        input: PathBuf,

        /// Show file to update; created if missing
        show: PathBuf,

        /// Directory $(Cue) paths resolve to [default: the production's directory]
        #[arg(long, env = "LISP2SCS_BASE")]
        base: Option<PathBuf>,
    },

    /// Check whether a production can be imported
    Validate {
        /// Production file (.scs11)
        input: PathBuf,

        /// Show whose plugin settings to check against
        #[arg(long)]
        show: Option<PathBuf>,
    },
}

fn report(warnings: &[TranslationEvent]) {
    for warning in warnings {
        println!("warning: {}", warning);
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let cli = Cli::parse();

    let manager = ShowModelManager::new();
    match cli.command {
        Commands::Export { show, output } => {
            manager.load_from_file(&show).await?;
            let warnings = manager.export_scs_file(&output).await?;
            report(&warnings);
            println!("Exported {} to {}", show.display(), output.display());
        }
        Commands::Import { input, show, base } => {
            if tokio::fs::try_exists(&show).await? {
                manager.load_from_file(&show).await?;
            }
            let warnings = manager.import_scs_file(&input, base.as_deref()).await?;
            report(&warnings);
            manager.save_to_file(&show).await?;
            println!("Imported {} into {}", input.display(), show.display());
        }
        Commands::Validate { input, show } => {
            if let Some(show) = show {
                manager.load_from_file(&show).await?;
            }
            let validation = manager.validate_scs_file(&input).await?;
            if validation.is_valid() {
                println!("{} can be imported", input.display());
            } else {
                for failure in &validation.failures {
                    println!("error: {}", failure);
                }
                anyhow::bail!("{} cannot be imported", input.display());
            }
        }
    }
    Ok(())
}
