mod commands;
mod error;
mod util;

use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(
        name = "l",
        visible_alias = "list",
        about = "List the entries of an attribute blob"
    )]
    List {
        #[structopt(
            name = "file",
            parse(from_os_str),
            help = "Path to the attribute blob, or - for stdin"
        )]
        path: PathBuf,
    },

    #[structopt(
        name = "j",
        visible_alias = "json",
        about = "Print an attribute blob as JSON"
    )]
    Json {
        #[structopt(
            long,
            help = "Print every entry in stored order, including shadowed duplicates"
        )]
        raw: bool,

        #[structopt(
            name = "file",
            parse(from_os_str),
            help = "Path to the attribute blob, or - for stdin"
        )]
        path: PathBuf,
    },

    #[structopt(
        name = "c",
        visible_alias = "create",
        about = "Create an attribute blob from a JSON entry array"
    )]
    Create {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Path to write the blob to, or - for stdout"
        )]
        output: PathBuf,

        #[structopt(long, help = "Allow names that break the naming rules")]
        no_check: bool,

        #[structopt(
            name = "json",
            parse(from_os_str),
            help = "Path to the JSON entry array, or - for stdin"
        )]
        input: PathBuf,
    },

    #[structopt(
        name = "t",
        visible_alias = "validate",
        about = "Check that attribute blobs decode cleanly"
    )]
    Validate {
        #[structopt(
            name = "files",
            parse(from_os_str),
            required = true,
            help = "Paths to attribute blobs"
        )]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "attr",
    about = "Inspect, convert and create binary attribute blobs.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "attr (l|j|c|t) [FLAGS|OPTIONS] <file>..."
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(
        long,
        help = "Blobs are read and written as base64 text",
        global = true
    )]
    base64: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let result = match opts.cmd {
        Commands::List { path } => commands::list(&path, opts.base64),
        Commands::Json { raw, path } => commands::json(&path, opts.base64, raw),
        Commands::Create {
            output,
            no_check,
            input,
        } => commands::create(&input, &output, opts.base64, no_check),
        Commands::Validate { files } => commands::validate(&files, opts.base64),
    };

    if let Err(e) = result {
        eprintln!("Error: {:?}", anyhow::Error::from(e));
        std::process::exit(1);
    }
}
