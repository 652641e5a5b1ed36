//! Tracewatch CLI - incremental EcmaScript 6 build tool
//!
//! Usage: tracewatch <COMMAND>
//!
//! Commands:
//!   build   Compile all eligible files once
//!   watch   Watch for changes and recompile continuously

use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use tracewatch::cli::{Cli, Commands};
use tracewatch::{compile_all, watch, Config, Es6Watcher, Project, Traceur, WatchEvent};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build { project } => build(&project, cli.json, cli.verbose),
        Commands::Watch { project } => watch_loop(&project, cli.json),
    }
}

fn setup(project_dir: &Path) -> Result<(Project, Config, Traceur)> {
    let project = Project::new(project_dir);
    let config = Config::load(&project.base_dir)?;
    let tool = Traceur::resolve(&project.build_dir(), &config.version)
        .context("failed to set up the EcmaScript compiler")?;
    Ok((project, config, tool))
}

fn build(project_dir: &Path, json: bool, verbose: u8) -> Result<()> {
    let (project, config, tool) = setup(project_dir)?;
    let outputs = compile_all(&project, &config, &tool, None)?;
    if json {
        println!(r#"{{"event":"build_complete","outputs":{}}}"#, outputs.len());
    } else if outputs.is_empty() {
        println!("Nothing to compile.");
    } else {
        for output in &outputs {
            println!("Compiled {}", output.display());
        }
        if verbose > 0 {
            println!("{} aggregate file(s) written", outputs.len());
        }
    }
    Ok(())
}

fn watch_loop(project_dir: &Path, json: bool) -> Result<()> {
    let (project, config, tool) = setup(project_dir)?;
    let mut watcher = Es6Watcher::new(project.clone(), config, tool);

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    watch(&project, &mut watcher, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            print_event(&event);
        }
    })?;
    Ok(())
}

fn print_event(event: &WatchEvent) {
    match event {
        WatchEvent::Started { project } => println!("Watching {project} (Ctrl+C to stop)"),
        WatchEvent::FileChanged { path } => println!("Changed: {path}"),
        WatchEvent::CompileStarted => {}
        WatchEvent::CompileComplete => println!("Compilation complete."),
        WatchEvent::Error { message } => eprintln!("{message}"),
        WatchEvent::Shutdown => println!("Stopped."),
    }
}
