use clap::Parser;
use swiftocr::cli::{self, Args};
use swiftocr::{app, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) if cli::is_usage_display(&e) => {
      // --help and --version go to stdout; bare usage goes to stderr.
      let code = if e.use_stderr() { 1 } else { 0 };
      let _ = e.print();
      std::process::exit(code);
    }
    Err(e) => {
      eprintln!("Error: {}", cli::error_line(&e));
      std::process::exit(1);
    }
  };

  if let Err(e) = logging::init(args.verbose) {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }

  let stdout = std::io::stdout();
  let result = app::execute(
    &args,
    swiftocr::default_engine,
    tokio::io::stdin(),
    stdout.lock(),
  )
  .await;

  if let Err(e) = result {
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}
