use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match irmap::cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(irmap::errors::get_exit_code(&e))
        }
    }
}
