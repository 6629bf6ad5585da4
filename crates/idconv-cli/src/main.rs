//! CSV ID Converter CLI
//!
//! Batch-converts CSV files with an "ID Subjektu" column into normalized
//! single-column "ID" CSVs, optionally unioning identifiers from a merge
//! directory. Running with no subcommand performs a full batch run over the
//! `input/` and `merge/` folders in the current directory.

use clap::{Parser, Subcommand};
use idconv_core::{
    build_merge_pool, classify, convert_file, parse_csv, run_batch, Classification,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "idconv")]
#[command(about = "CSV subject-ID converter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every eligible CSV file in the input folder
    Run {
        /// Input directory containing files to convert
        #[arg(short, long, default_value = "input")]
        input: PathBuf,

        /// Merge directory contributing extra IDs to every conversion
        #[arg(short, long, default_value = "merge")]
        merge: PathBuf,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a single CSV file
    Convert {
        /// Path to the input CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Output path (default: <stem>_converted<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Merge directory contributing extra IDs
        #[arg(short, long)]
        merge: Option<PathBuf>,
    },

    /// Report how a candidate file would be classified
    Classify {
        /// Path to the CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Scan the merge directory and report per-file ID counts
    Pool {
        /// Merge directory to scan
        #[arg(short, long, default_value = "merge")]
        dir: PathBuf,

        /// Print the scan report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse and display a single CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> idconv_core::Result<()> {
    let cli = Cli::parse();

    // a bare `idconv` in the project root is the whole batch job
    let command = cli.command.unwrap_or(Commands::Run {
        input: PathBuf::from("input"),
        merge: PathBuf::from("merge"),
        json: false,
    });

    match command {
        Commands::Run { input, merge, json } => cmd_run(&input, &merge, json),
        Commands::Convert {
            file,
            output,
            merge,
        } => cmd_convert(&file, output.as_deref(), merge.as_deref()),
        Commands::Classify { file } => cmd_classify(&file),
        Commands::Pool { dir, json } => cmd_pool(&dir, json),
        Commands::Parse { file } => cmd_parse(&file),
    }
}

fn cmd_run(input: &Path, merge: &Path, json: bool) -> idconv_core::Result<()> {
    let summary = run_batch(input, merge)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn cmd_convert(
    file: &Path,
    output: Option<&Path>,
    merge: Option<&Path>,
) -> idconv_core::Result<()> {
    let pool = merge.map(|dir| build_merge_pool(dir).0);
    let pool_ref = pool.as_ref().filter(|p| !p.is_empty());

    let result = convert_file(file, output, pool_ref)?;

    println!();
    println!("Output: {}", result.output_path.display());
    println!("IDs written: {}", result.ids_written);
    if result.pool_added > 0 {
        println!("Added from merge pool: {}", result.pool_added);
    }

    Ok(())
}

fn cmd_classify(file: &Path) -> idconv_core::Result<()> {
    let label = match classify(file) {
        Classification::AlreadyConverted => "already converted",
        Classification::Convertible => "convertible",
        Classification::Ineligible => "ineligible",
    };

    println!("{}: {}", file.display(), label);

    Ok(())
}

fn cmd_pool(dir: &Path, json: bool) -> idconv_core::Result<()> {
    let (pool, report) = build_merge_pool(dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if pool.is_empty() {
        println!("Merge pool is empty");
    }

    Ok(())
}

fn cmd_parse(file: &Path) -> idconv_core::Result<()> {
    let table = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    // Print header
    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    // Print first 10 rows
    for row in table.rows.iter().take(10) {
        println!("{}", row.cells.join("\t"));
    }

    if table.row_count() > 10 {
        println!("... ({} more rows)", table.row_count() - 10);
    }

    Ok(())
}
