use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use shared_fs::NUMSECTORS;
use yfs::{DEFAULT_NUM_INODES, FileDisk, format};
use yfs_log::{Logger, format_text};

#[derive(Parser)]
#[command(version, about = "Formats an empty YFS disk image", long_about = None)]
struct Args {
    #[arg(long, default_value_t = DEFAULT_NUM_INODES)]
    num_inodes: u32,
    #[arg(long, default_value_t = NUMSECTORS)]
    num_blocks: u32,
    /// Overwrite an existing image
    #[arg(long)]
    force: bool,
    disk: PathBuf,
}

fn print_sink(record: &log::Record) {
    eprintln!("{}", format_text(record));
}

static LOGGER: Logger<1> = Logger { sinks: [print_sink] };

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::set_logger(&LOGGER).context("installing the logger")?;
    log::set_max_level(log::LevelFilter::Info);

    if args.disk.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite it)", args.disk.display());
    }

    let mut disk = FileDisk::create(&args.disk, args.num_blocks)
        .with_context(|| format!("creating {}", args.disk.display()))?;
    let header = format(&mut disk, args.num_inodes).context("formatting the image")?;
    disk.sync_all().context("flushing the image")?;

    println!(
        "{}: {} blocks, {} inodes, data starts at block {}",
        args.disk.display(),
        header.num_blocks,
        header.num_inodes,
        header.first_data_block()
    );
    Ok(())
}
