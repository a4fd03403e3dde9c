use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use lsbstego::carrier::Channel;
use lsbstego::cli::{
    extract_message, extract_to_file, hide_message, render_message, show_capacity,
    CapacityOptions, CarrierOptions, ExtractOptions, HideOptions,
};
use lsbstego::codec::ExtractPolicy;
use lsbstego::selector::Strategy;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("LSBSTEGO_VERSION");
const BUILD: &str = env!("LSBSTEGO_BUILD");
const PROFILE: &str = env!("LSBSTEGO_PROFILE");
const GIT_HASH: &str = env!("LSBSTEGO_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "lsbstego")]
#[command(author, about = "Hide messages in the least significant bits of images and raw files", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Carrier selection shared by every subcommand
#[derive(Args)]
struct CarrierArgs {
    /// Position strategy: all, nth:N or diagonal
    #[arg(long, default_value = "all", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Pixel channel carrying the bits (image carriers)
    #[arg(long, default_value = "red", value_parser = parse_channel)]
    channel: Channel,

    /// Treat the carrier as raw bytes instead of an image
    #[arg(long)]
    raw: bool,

    /// Row width of a raw carrier, needed for the diagonal strategy
    #[arg(long)]
    width: Option<usize>,
}

impl CarrierArgs {
    fn carrier_options(&self) -> CarrierOptions {
        CarrierOptions {
            raw: self.raw,
            channel: self.channel,
            width: self.width,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message in a carrier
    Hide {
        /// Carrier image (or raw file with --raw)
        carrier: PathBuf,

        /// Output file
        output: PathBuf,

        /// Message to hide
        message: String,

        /// Allow a lossy output format such as JPEG (the message will not survive)
        #[arg(long)]
        allow_lossy: bool,

        #[command(flatten)]
        args: CarrierArgs,
    },

    /// Extract a hidden message from a carrier
    #[command(alias = "x")]
    Extract {
        /// Carrier holding the message
        carrier: PathBuf,

        /// Fail if no message terminator is found
        #[arg(long)]
        strict: bool,

        /// Print the message as hex
        #[arg(long)]
        hex: bool,

        /// Write the raw message bytes to a file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: CarrierArgs,
    },

    /// Show how many bytes a carrier can hold
    #[command(alias = "c")]
    Capacity {
        /// Carrier to inspect
        carrier: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        args: CarrierArgs,
    },
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_channel(s: &str) -> Result<Channel, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("Warning: logger unavailable: {}", e);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("lsbstego {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let result = match command {
        Commands::Hide {
            carrier,
            output,
            message,
            allow_lossy,
            args,
        } => {
            let options = HideOptions {
                strategy: args.strategy,
                carrier: args.carrier_options(),
                allow_lossy,
            };

            hide_message(&carrier, &output, message.as_bytes(), &options).map(|bits| {
                println!(
                    "Message hidden in {} ({} bits, strategy {})",
                    output.display(),
                    bits,
                    options.strategy
                );
            })
        }

        Commands::Extract {
            carrier,
            strict,
            hex,
            output,
            args,
        } => {
            let options = ExtractOptions {
                strategy: args.strategy,
                policy: if strict {
                    ExtractPolicy::Strict
                } else {
                    ExtractPolicy::Lenient
                },
                carrier: args.carrier_options(),
            };

            match output {
                Some(path) => extract_to_file(&carrier, &path, &options).map(|len| {
                    println!("Extracted {} bytes to {}", len, path.display());
                }),
                None => extract_message(&carrier, &options).map(|message| {
                    println!("Extracted message: {}", render_message(&message, hex));
                }),
            }
        }

        Commands::Capacity {
            carrier,
            json,
            args,
        } => {
            let options = CapacityOptions {
                strategy: args.strategy,
                carrier: args.carrier_options(),
                json,
            };

            show_capacity(&carrier, &options).map(|report| print!("{}", report))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
