use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use splatmap_profile::apply::InMemoryStore;
use splatmap_profile::config::ProfileConfig;
use splatmap_profile::export::export_layer_previews;

#[derive(Parser, Debug)]
#[command(name = "splatmap_profile")]
#[command(about = "Validate and normalize terrain splatmap profiles")]
struct Args {
    /// Profile description file (JSON)
    profile: PathBuf,

    /// Width of the target weight grid
    #[arg(short = 'W', long, default_value = "512")]
    width: usize,

    /// Height of the target weight grid
    #[arg(short = 'H', long, default_value = "512")]
    height: usize,

    /// Validate only; skip normalization and export
    #[arg(long)]
    check: bool,

    /// Export per-layer previews of the normalized weights to this directory
    #[arg(long)]
    export_previews: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let base_dir = args
        .profile
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = match ProfileConfig::from_path(&args.profile) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Loaded profile with {} layers", config.layers.len());

    let mut profile = match config.into_profile(&base_dir) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Validating against {}x{} grid...", args.width, args.height);
    let diagnostics = profile.diagnostics(args.width, args.height);
    if !diagnostics.is_empty() {
        for diagnostic in diagnostics {
            eprintln!("error: {}", diagnostic);
        }
        return ExitCode::FAILURE;
    }
    println!("Profile is valid");

    if args.check {
        return ExitCode::SUCCESS;
    }

    println!("Normalizing weights...");
    let field = splatmap_profile::normalize(profile.layers(), args.width, args.height);
    println!(
        "Weight field: {}x{} pixels, {} layers",
        field.width(),
        field.height(),
        field.layer_count()
    );

    let mut store = InMemoryStore::new(args.width, args.height);
    splatmap_profile::apply(profile.layers(), &field, &mut store);
    println!("Applied {} layer materials to the target store", store.materials.len());

    if let Some(dir) = &args.export_previews {
        println!("Exporting layer previews to {}...", dir.display());
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("failed to create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
        match export_layer_previews(&field, dir) {
            Ok(paths) => println!("Wrote {} previews", paths.len()),
            Err(e) => {
                eprintln!("failed to export previews: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
