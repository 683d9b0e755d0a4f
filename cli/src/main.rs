mod build;
mod manifest;
mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Severity;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use assembler::Notice;
use mdoc::{Document, Node};

#[derive(Parser)]
#[command(name = "mdoc", version, about = "Merge markdown documentation into one document")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a standalone document from a TOML manifest
    Build(BuildArgs),

    /// Print the table of contents of a markdown file
    Toc(TocArgs),

    /// Realign the tables of a markdown file
    Fmt(FmtArgs),

    /// Run .test.md fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Manifest listing the sections and files to merge
    manifest: String,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Also report informational notes, such as rewritten links
    #[arg(short, long)]
    verbose: bool,

    /// Exit with an error if any warning was reported
    #[arg(long)]
    deny_warnings: bool,
}

#[derive(clap::Args)]
struct TocArgs {
    /// Markdown file
    file: String,
}

#[derive(clap::Args)]
struct FmtArgs {
    /// Markdown file
    file: String,

    /// Rewrite the file in place instead of printing the result
    #[arg(short, long)]
    write: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => do_build(args, cli.no_color),
        Command::Toc(args) => {
            let source = read_source(&args.file);
            print!("{}", Document::parse(&source).toc());
        }
        Command::Fmt(args) => do_fmt(args),
        Command::Test(args) => {
            let path = Path::new(&args.path);
            if args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &args.category);
            process::exit(exit_code);
        }
    }
}

fn read_source(file: &str) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    }
}

fn write_output(file: &str, text: &str) {
    if let Err(e) = std::fs::write(file, text) {
        eprintln!("error: cannot write '{}': {}", file, e);
        process::exit(1);
    }
}

fn do_build(args: BuildArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let build = match build::build(Path::new(&args.manifest)) {
        Ok(build) => build,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let shown: Vec<&Notice> = build
        .assembly
        .notices
        .iter()
        .filter(|notice| args.verbose || notice.severity >= Severity::Warning)
        .collect();
    emit_notices(&writer, &config, &build.files, &shown);

    match &args.output {
        Some(file) => write_output(file, &build.assembly.text),
        None => print!("{}", build.assembly.text),
    }

    let warnings = build.assembly.warnings().count();
    if warnings > 0 {
        eprintln!("{} warning(s)", warnings);
        if args.deny_warnings {
            process::exit(1);
        }
    }
}

fn do_fmt(args: FmtArgs) {
    let source = read_source(&args.file);
    let mut doc = Document::parse(&source);
    for node in doc.nodes_mut() {
        if let Node::Table(table) = node {
            table.reformat();
        }
    }

    // In source order: reference definitions stay where they were written.
    let text: String = doc.nodes().map(Node::raw).collect();
    if args.write {
        if text != source {
            write_output(&args.file, &text);
        }
    } else {
        print!("{}", text);
    }
}

fn emit_notices(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    notices: &[&Notice],
) {
    for notice in notices {
        let diagnostic = notice.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
    }
}
