use clap::Parser;

use budgetly::cli::Cli;
use budgetly::config::{get_config, init_config_from};
use budgetly::runtime::modes::{self, Mode};
use budgetly::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    let mode = modes::detect_mode(cli.command.as_ref());
    match (mode, cli.command) {
        (Mode::Cli, Some(command)) => {
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        _ => {
            // guard 需要存活到进程结束，否则日志丢失
            let _guard = init_logging(&get_config().logging)?;
            modes::run_server().await
        }
    }
}
