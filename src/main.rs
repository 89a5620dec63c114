use std::env;
use std::process;

use r9cc::{Config, generate_assembly_for};

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
    .format_timestamp(None)
    .init();

  let args: Vec<String> = env::args().collect();
  if args.len() != 2 {
    let program = args.first().map(String::as_str).unwrap_or("r9cc");
    eprintln!("{program}: invalid number of arguments");
    eprintln!("usage: {program} <expr>");
    process::exit(1);
  }

  let config = match Config::from_env() {
    Ok(config) => config,
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  };
  log::debug!("compiling for {}", config.target);

  match generate_assembly_for(&args[1], config.target) {
    Ok(asm) => print!("{asm}"),
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  }
}
