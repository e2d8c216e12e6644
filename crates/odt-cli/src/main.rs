//! ODT Table CLI
//!
//! Command-line tool for inspecting and merging OOMMF and mumax3 tables.

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use odt_core::export::format_value;
use odt_core::{
    export, merge, parse_columns, parse_units, read, scan_directory, write_csv, write_json,
    ExportFormat, Table,
};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "odt-cli")]
#[command(about = "OOMMF / mumax3 table tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Output extra/debug info while parsing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of a table file
    Columns {
        /// Path to an .odt or table.txt file
        file: PathBuf,

        /// Keep the raw simulator column names
        #[arg(long)]
        raw: bool,
    },

    /// List the units of an .odt file
    Units {
        /// Path to an .odt file
        file: PathBuf,

        /// Keep the raw simulator column names
        #[arg(long)]
        raw: bool,
    },

    /// Parse and display a single table file
    Show {
        /// Path to an .odt or table.txt file
        file: PathBuf,

        /// Keep the raw simulator column names
        #[arg(long)]
        raw: bool,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fourier transform the columns of a table file
    Fft {
        /// Path to an .odt or table.txt file
        file: PathBuf,

        /// Independent variable to transform against
        #[arg(short, long, default_value = "t")]
        x: String,

        /// Columns to transform (default: every column but X)
        #[arg(short, long)]
        columns: Vec<String>,

        /// Write the transformed table to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },

    /// Merge several table files into one
    Merge {
        /// Table files, in merge order
        files: Vec<PathBuf>,

        /// Directories to scan for table files (appended after FILES)
        #[arg(short, long)]
        dir: Vec<PathBuf>,

        /// Align rows on simulation time instead of stacking them
        #[arg(short = 't', long)]
        merge_time: bool,

        /// Write the merged table to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder().filter_level(log_level).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> odt_core::Result<()> {
    match command {
        Commands::Columns { file, raw } => cmd_columns(&file, raw),
        Commands::Units { file, raw } => cmd_units(&file, raw),
        Commands::Show { file, raw, limit } => cmd_show(&file, raw, limit),
        Commands::Fft {
            file,
            x,
            columns,
            output,
            format,
        } => cmd_fft(&file, &x, &columns, output, format),
        Commands::Merge {
            files,
            dir,
            merge_time,
            output,
            format,
            limit,
        } => cmd_merge(files, &dir, merge_time, output, format, limit),
    }
}

fn cmd_columns(file: &PathBuf, raw: bool) -> odt_core::Result<()> {
    for column in parse_columns(file, !raw)? {
        println!("{}", column);
    }
    Ok(())
}

fn cmd_units(file: &PathBuf, raw: bool) -> odt_core::Result<()> {
    let units = parse_units(file, !raw)?;
    let width = units.keys().map(|k| k.len()).max().unwrap_or(0);

    for (column, unit) in &units {
        println!("{:width$}  {}", column, unit, width = width);
    }
    Ok(())
}

fn cmd_show(file: &PathBuf, raw: bool, limit: Option<usize>) -> odt_core::Result<()> {
    let table = read(file, !raw)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    print_table(&table, limit.unwrap_or(10));
    Ok(())
}

fn cmd_fft(
    file: &PathBuf,
    x: &str,
    columns: &[String],
    output: Option<PathBuf>,
    format: ExportFormat,
) -> odt_core::Result<()> {
    let table = read(file, true)?.with_x(x)?;
    let selected: Vec<&str> = columns.iter().map(String::as_str).collect();
    let y = (!selected.is_empty()).then_some(selected.as_slice());

    let transformed = table.rfft(None, y)?;
    write_table(&transformed, output, format, None)
}

fn cmd_merge(
    mut files: Vec<PathBuf>,
    dirs: &[PathBuf],
    merge_time: bool,
    output: Option<PathBuf>,
    format: ExportFormat,
    limit: Option<usize>,
) -> odt_core::Result<()> {
    if !dirs.is_empty() {
        files.extend(scan_directory(dirs)?);
    }
    info!("Merging {} files", files.len());

    let merged = merge(&files, merge_time)?;
    write_table(&merged, output, format, limit)
}

fn write_table(
    table: &Table,
    output: Option<PathBuf>,
    format: ExportFormat,
    limit: Option<usize>,
) -> odt_core::Result<()> {
    match output {
        Some(path) => {
            export(table, &path, format)?;
            println!(
                "Exported {} rows x {} columns to {}",
                table.row_count(),
                table.column_count(),
                path.display()
            );
        }
        None => match (format, limit) {
            (ExportFormat::Csv, None) => write_csv(table, io::stdout().lock())?,
            (ExportFormat::Json, None) => write_json(table, io::stdout().lock())?,
            (_, Some(limit)) => print_table(table, limit),
        },
    }

    Ok(())
}

fn print_table(table: &Table, limit: usize) {
    let header: Vec<&str> = table.column_names();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    if let Some(units) = &table.units {
        println!("{}", units.join("\t"));
    }

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.values.iter().map(|&v| format_value(v)).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }
}
