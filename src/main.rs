use std::{env, process};

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use mysh::{
    input_handler::{self, LineReader},
    Config, Control, Engine, ShellError,
};

fn main() {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config);
    if let Err(e) = loaded {
        warn!("{}, using defaults", e);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let source = input_handler::open_input(&args).unwrap_or_else(|e| fail(e));

    let engine = Engine::new(&config);
    let lines = LineReader::new(source, &config.prompt);

    for line in lines {
        let line = line.unwrap_or_else(|e| fail(e));
        match engine.run_line(&line) {
            Ok(Control::Continue) => {}
            Ok(Control::Exit) => {
                debug!("exit requested");
                process::exit(0);
            }
            Err(e) => fail(e),
        }
    }

    println!("\nShutting down...");
}

fn fail(e: ShellError) -> ! {
    debug!(code = e.exit_code(), "fatal error");
    eprintln!("{}", e);
    process::exit(e.exit_code());
}

fn init_logging(config: &Config) {
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
