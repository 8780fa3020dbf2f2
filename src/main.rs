//! ft_otp stores a 64 hex characters key and prints time based one-time passwords from it.
//!
//! # Usage
//!
//! ```bash
//! # Obfuscate the key found in key.hex into ft_otp.key
//! ft_otp -g key.hex
//!
//! # Print the code for the current 30 seconds window
//! ft_otp -k ft_otp.key
//!
//! # Same, with 60 seconds windows
//! FT_OTP_INTERVAL=60 ft_otp -k ft_otp.key
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{ArgGroup, Parser};
use ft_otp::{storage, Config, DEFAULT_INTERVAL, DEFAULT_KEY_FILE};

#[derive(Parser)]
#[command(name = "ft_otp", version)]
#[command(about = "Generate time based one-time passwords from a stored key", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["generate", "key"])))]
struct Cli {
    /// Read a 64 hex characters key from FILE and store it obfuscated
    #[arg(short = 'g', value_name = "FILE")]
    generate: Option<PathBuf>,

    /// Print the current code for the key stored in FILE
    #[arg(short = 'k', value_name = "FILE")]
    key: Option<PathBuf>,

    /// Duration of a code, in seconds
    #[arg(long, env = "FT_OTP_INTERVAL", default_value_t = DEFAULT_INTERVAL)]
    interval: u64,

    /// Where -g writes the obfuscated key
    #[arg(long, env = "FT_OTP_KEY_FILE", default_value = DEFAULT_KEY_FILE)]
    key_file: PathBuf,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::default();
        config.interval(self.interval)?;
        config.key_file(&self.key_file);
        Ok(config)
    }
}

fn save_key(input: &Path, config: &Config) -> anyhow::Result<()> {
    let text = storage::read_key_input(input)?;
    let record = ft_otp::store_key(&text)?;
    storage::save(config.get_key_file(), &record)?;
    log::info!("stored key from {}", input.display());
    println!(
        "Key was successfully saved in {}.",
        config.get_key_file().display()
    );
    Ok(())
}

fn print_code(key_file: &Path, config: &Config) -> anyhow::Result<()> {
    let record = storage::load(key_file)?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before 1970")?
        .as_secs();
    let code = ft_otp::generate_code(&record, now, config)
        .with_context(|| format!("can't use {}", key_file.display()))?;
    log::info!(
        "code valid for {}s",
        config.get_interval() - now % config.get_interval()
    );
    println!("{}", code);
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    log::debug!("{:?}", config);
    match (&cli.generate, &cli.key) {
        (Some(input), _) => save_key(input, &config),
        (None, Some(key_file)) => print_code(key_file, &config),
        (None, None) => anyhow::bail!("one of -g or -k is required"),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
