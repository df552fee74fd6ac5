use clap::Parser;
use playwav::{play_wav, PcmConfig, DEFAULT_DEVICE};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Play a 16 bit PCM wav file on an ALSA device
#[derive(Debug, Parser)]
#[command(name = "playwav", version, about)]
struct Args {
    /// PCM playback device node
    #[arg(long, env = "PLAYWAV_DEVICE", default_value = DEFAULT_DEVICE)]
    device: PathBuf,

    /// Log device info and negotiated hardware parameters
    #[arg(short, long)]
    verbose: bool,

    /// Path to a wav file
    file: PathBuf,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(-1);
        }
        Err(e) => e.exit(),
    };

    let default_filter = if args.verbose {
        "playwav=debug"
    } else {
        "playwav=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let config = PcmConfig::default().with_device(args.device);

    if let Err(err) = play_wav(&args.file, &config) {
        eprintln!("playwav: {err}");
        process::exit(-1);
    }
}
