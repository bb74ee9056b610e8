use quest_compiler::config::constants::fetch::{MAX_SOURCE_SIZE, SOURCE_EXTENSION};
use quest_compiler::fetch::check_source_size;
use quest_compiler::{logging, pipeline, RecordWriter, SourceUnit};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <Quest.java|directory> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let input_path = Path::new(&args[1]);
    let options = parse_options(&args[2..]);

    let failures = if input_path.is_file() {
        usize::from(!process_file(input_path, 0, &options))
    } else if input_path.is_dir() {
        process_directory(input_path, &options)
    } else {
        eprintln!("Error: Input must be a .java file or a directory");
        eprintln!("  Path: {}", input_path.display());
        std::process::exit(1);
    };

    logging::print_cargo_style_summary();
    if failures > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Debug, Default)]
struct OfflineOptions {
    /// Write records here instead of printing them
    output_dir: Option<PathBuf>,
    /// Display name for a single file; defaults to the file stem
    name: Option<String>,
    recursive: bool,
}

fn print_help(program_name: &str) {
    println!("Quest Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Offline extraction of quest records from local quest helper sources");
    println!();
    println!("USAGE:");
    println!("    {} <Quest.java> [options]     # Extract one source", program_name);
    println!("    {} <directory> [options]      # Extract every .java file", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --out DIR           Write <key>.json records to DIR instead of stdout");
    println!("    --name NAME         Quest display name for a single file");
    println!("    --no-recursive      Don't search subdirectories");
    println!();
    println!("EXAMPLES:");
    println!("    {} CooksAssistant.java --name \"Cook's Assistant\"", program_name);
    println!("    {} quest-helper/src/main/java/ --out quests/", program_name);
}

fn parse_options(args: &[String]) -> OfflineOptions {
    let mut options = OfflineOptions {
        recursive: true,
        ..OfflineOptions::default()
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "--name" => match args.get(i + 1) {
                Some(value) => {
                    if args[i] == "--out" {
                        options.output_dir = Some(PathBuf::from(value));
                    } else {
                        options.name = Some(value.clone());
                    }
                    i += 1;
                }
                None => eprintln!("Warning: {} requires a value", args[i]),
            },
            "--no-recursive" => options.recursive = false,
            other => eprintln!("Warning: Unknown option '{}'", other),
        }
        i += 1;
    }

    options
}

/// Extract one file; returns whether it succeeded
fn process_file(path: &Path, input_id: usize, options: &OfflineOptions) -> bool {
    let name = options
        .name
        .clone()
        .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_default();

    logging::with_input_context(&name, input_id, || match extract_file(path, &name, options) {
        Ok(()) => true,
        Err(message) => {
            eprintln!("{}: {}", path.display(), message);
            false
        }
    })
}

fn extract_file(path: &Path, name: &str, options: &OfflineOptions) -> Result<(), String> {
    let size = fs::metadata(path).map_err(|e| e.to_string())?.len();
    check_source_size(size, MAX_SOURCE_SIZE).map_err(|e| e.to_string())?;
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;

    let unit = SourceUnit::new(name, text);
    let mut result = pipeline::process_source(&unit).map_err(|e| e.to_string())?;

    match &options.output_dir {
        Some(dir) => {
            let path = pipeline::persist(&mut result, &RecordWriter::new(dir)).map_err(|e| e.to_string())?;
            println!("{} -> {}", unit.name(), path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&result.record).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Extract every source under `dir`; returns the number of failures
fn process_directory(dir: &Path, options: &OfflineOptions) -> usize {
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let sources: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
        })
        .collect();

    if sources.is_empty() {
        eprintln!("No .{} files found in {}", SOURCE_EXTENSION, dir.display());
        return 0;
    }

    // A single --name would label every file the same
    let per_file = OfflineOptions {
        output_dir: options.output_dir.clone(),
        name: None,
        recursive: options.recursive,
    };

    let failures = sources
        .iter()
        .enumerate()
        .filter(|(input_id, path)| !process_file(path, *input_id, &per_file))
        .count();

    eprintln!(
        "Extracted {} of {} sources ({} failed)",
        sources.len() - failures,
        sources.len(),
        failures
    );
    failures
}
