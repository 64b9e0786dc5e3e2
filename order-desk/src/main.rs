use clap::Parser;
use order_desk::cli::{self, Cli};
use order_desk::{ApiResponse, DeskState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // 1. dotenv, config, logging
    let config = setup_environment();

    // 2. Services over the hosted backend
    let state = DeskState::connect(config)?;

    // 3. Run the command
    match cli::run(&args, &state).await {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(e) if args.json => {
            let response: ApiResponse<()> = e.clone().into();
            println!("{}", serde_json::to_string_pretty(&response)?);
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(code = e.code.code(), "{}", e);
            Err(e.into())
        }
    }
}
