//! isextract - Command-line interface for InstallShield 3 archives
//!
//! Lists and extracts the files of an InstallShield 3 archive, and decodes
//! raw PKWare DCL streams.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use isextract::{explode, Archive, CompressionHeader, ExtractOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "isextract")]
#[command(about = "List and extract InstallShield 3 archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the files in an archive
    #[command(alias = "l")]
    List {
        /// Archive to list
        archive: PathBuf,
    },

    /// Extract files from an archive
    #[command(alias = "x")]
    Extract {
        /// Archive to extract
        archive: PathBuf,

        /// Output directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Extract only these files
        #[arg(short, long, num_args = 1..)]
        files: Vec<String>,

        /// Recreate the archive's directories
        #[arg(long)]
        full_paths: bool,

        /// Force overwrite of existing files
        #[arg(short = 'F', long)]
        force: bool,

        /// Do not apply recorded modification times
        #[arg(long)]
        no_times: bool,
    },

    /// Decompress a raw PKWare DCL stream
    Explode {
        /// Input compressed file
        input: PathBuf,

        /// Output decompressed file
        output: PathBuf,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a raw compressed stream
    Info {
        /// Compressed file to analyze
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    log_init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::List { archive } => list_archive(&archive),
        Commands::Extract {
            archive,
            dir,
            files,
            full_paths,
            force,
            no_times,
        } => {
            let options = ExtractOptions::default()
                .with_full_paths(full_paths)
                .with_overwrite(force)
                .with_preserve_times(!no_times);
            extract_archive(&archive, &dir, &files, &options, cli.quiet)
        }
        Commands::Explode {
            input,
            output,
            force,
        } => explode_file(&input, &output, force, cli.verbose, cli.quiet),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn log_init(verbose: bool, quiet: bool) {
    use simplelog::*;

    let filter = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn list_archive(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let archive = Archive::open(path)?;

    println!("Archive contains the following files:");
    println!(
        "{:<24} {:<20} {:>10} {:>10}  {}",
        "Name", "Directory", "Size", "Packed", "Modified"
    );
    for entry in archive.entries() {
        let modified = entry
            .modified()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<20} {:>10} {:>10}  {}",
            entry.name, entry.directory, entry.uncompressed_size, entry.compressed_size, modified
        );
    }
    println!("{} files", archive.len());

    Ok(())
}

fn extract_archive(
    path: &Path,
    dir: &Path,
    files: &[String],
    options: &ExtractOptions,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let archive = Archive::open(path)?;
    let start_time = Instant::now();

    if !files.is_empty() {
        let mut failed = 0;
        for name in files {
            match archive.extract_file(name, dir, options) {
                Ok(out) => {
                    if !quiet {
                        println!("  {}", out.display());
                    }
                }
                Err(e) => {
                    eprintln!("✗ {}: {}", name, e);
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(format!("{} of {} files failed", failed, files.len()).into());
        }
        return Ok(());
    }

    // Show progress bar for bulk extraction
    let progress = if !quiet {
        let pb = ProgressBar::new(archive.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let report = archive.extract_with(dir, options, |entry| {
        if let Some(ref pb) = progress {
            pb.set_message(entry.name.clone());
            pb.inc(1);
        }
    })?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("Extraction complete");
    }

    if !quiet {
        println!("✓ Extracted {} files", report.extracted.len());
        println!("  Time: {:.2?}", start_time.elapsed());
    }
    for (name, e) in &report.failed {
        eprintln!("✗ {}: {}", name, e);
    }

    if !report.is_success() {
        return Err(format!("{} of {} files failed", report.failed.len(), archive.len()).into());
    }
    Ok(())
}

fn explode_file(
    input: &Path,
    output: &Path,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    if verbose {
        println!(
            "Decompressing '{}' to '{}'",
            input.display(),
            output.display()
        );
    }

    let start_time = Instant::now();
    let compressed_data = fs::read(input)?;

    let mut decompressed_data = Vec::new();
    let stats = explode(&compressed_data[..], &mut decompressed_data)
        .map_err(|e| format!("Decompression failed: {}", e))?;

    fs::write(output, &decompressed_data)?;

    let unused = compressed_data.len() as u64 - stats.input_bytes;
    if unused > 0 {
        eprintln!("Warning: {} unused bytes of input", unused);
    }

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:   {} bytes", stats.input_bytes);
        println!("  Output:  {} bytes", stats.output_bytes);
        println!("  Ratio:   {:.1}%", stats.ratio());
        println!("  Time:    {:.2?}", start_time.elapsed());
        if verbose {
            println!("  Literals: {}", stats.literal_count);
            println!("  Matches:  {} (longest {})", stats.match_count, stats.longest_match);
        }
    }

    Ok(())
}

fn show_file_info(input: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    if data.len() < 2 {
        return Err("File too small to be a PKWare DCL stream".into());
    }

    println!("PKWare DCL Stream Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", data.len());

    match CompressionHeader::from_bytes(data[0], data[1]) {
        Ok(header) => {
            println!("  Compression Mode: {:?} ({})", header.mode, data[0]);
            println!(
                "  Dictionary Size: {} bytes ({} bits)",
                header.dict_size.max_distance(),
                data[1]
            );
        }
        Err(e) => {
            println!("  Status: ✗ Invalid header");
            if verbose {
                println!("  Error: {}", e);
            }
            return Ok(());
        }
    }

    let mut sink = std::io::sink();
    match explode(&data[..], &mut sink) {
        Ok(stats) => {
            println!("  Decompressed Size: {} bytes", stats.output_bytes);
            println!("  Compression Ratio: {:.1}%", stats.ratio());
            println!("  Status: ✓ Valid stream");
        }
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted stream");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}
