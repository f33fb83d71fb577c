use std::process;

use buildplan_cli::UserCancelled;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = buildplan_cli::main(&args).await {
        if e.downcast_ref::<UserCancelled>().is_some() {
            eprintln!("Cancelled");
            process::exit(130);
        }
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
