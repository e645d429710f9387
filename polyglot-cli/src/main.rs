//! Polyglot CLI
//!
//! Reformat markup as polyglot XHTML5, dump the decoded tree as JSON, or check
//! that a document is well-formed.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use polyglot_common::warning::recorded_warnings;
use polyglot_dom::{Fragment, Node};
use polyglot_html::{
    DecodeOptions, EntityPolicy, OutputOptions, decode_with_options, output, output_doc,
};

/// Polyglot: a polyglot XHTML5 encoder and entity-resolving decoder
#[derive(Parser, Debug)]
#[command(name = "polyglot")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Reformat a file with two-space indentation
    polyglot fmt --indent 2 page.xhtml

    # Add the HTML5 DOCTYPE and a trailing newline
    polyglot fmt --doctype --nl page.xhtml

    # Read from standard input
    cat page.xhtml | polyglot fmt -

    # Print the decoded tree as JSON
    polyglot dump --html '<p>caf&eacute;</p>'

    # Check a latin-1 file, keeping unknown entities as text
    polyglot check --encoding latin1 --lenient-entities legacy.html
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode markup and write it back as polyglot XHTML5
    Fmt {
        #[command(flatten)]
        input: InputArgs,

        /// Indent element-only content by N spaces per level
        #[arg(long, value_name = "N")]
        indent: Option<usize>,

        /// End the output with a newline
        #[arg(long)]
        nl: bool,

        /// Start the output with the HTML5 DOCTYPE
        #[arg(long)]
        doctype: bool,
    },

    /// Decode markup and print the tree as JSON
    Dump {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Check that markup decodes, reporting the first error
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to a markup file, or `-` for standard input
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Decode this markup string instead of a file
    #[arg(long, value_name = "MARKUP", conflicts_with = "path")]
    html: Option<String>,

    /// Encoding label that overrides detection (e.g. utf-8, latin1, utf-16le)
    #[arg(long, value_name = "LABEL")]
    encoding: Option<String>,

    /// Keep unknown named entities as text instead of failing
    #[arg(long)]
    lenient_entities: bool,

    /// Keep text nodes made only of whitespace
    #[arg(long)]
    preserve_whitespace: bool,
}

impl InputArgs {
    /// Name of the input for messages.
    fn source_name(&self) -> String {
        match (&self.html, &self.path) {
            (Some(_), _) => "--html".to_string(),
            (None, Some(path)) if path == Path::new("-") => "<stdin>".to_string(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => "<none>".to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        if let Some(markup) = &self.html {
            return Ok(markup.clone().into_bytes());
        }
        match self.path.as_deref() {
            None => bail!("no input: pass a FILE, `-` for standard input, or --html"),
            Some(path) if path == Path::new("-") => {
                let mut buf = Vec::new();
                let _ = io::stdin()
                    .read_to_end(&mut buf)
                    .context("failed to read standard input")?;
                Ok(buf)
            }
            Some(path) => {
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    fn decode_options(&self) -> DecodeOptions {
        let entities = if self.lenient_entities {
            EntityPolicy::PassThrough
        } else {
            EntityPolicy::Strict
        };
        DecodeOptions {
            encoding: self.encoding.clone(),
            entities,
            preserve_whitespace: self.preserve_whitespace,
        }
    }

    fn decode(&self) -> Result<Fragment> {
        let bytes = self.read()?;
        decode_with_options(&bytes, &self.decode_options())
            .with_context(|| format!("failed to decode {}", self.source_name()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fmt {
            input,
            indent,
            nl,
            doctype,
        } => {
            let fragment = input.decode()?;
            let options = OutputOptions {
                nl,
                indent,
                ns_prefix: None,
            };
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            let written = if doctype {
                output_doc(Some(&options), &mut sink, &fragment)
            } else {
                output(Some(&options), &mut sink, &fragment)
            };
            written.context("failed to write output")?;
            sink.flush().context("failed to write output")?;
        }
        Command::Dump { input } => {
            let fragment = input.decode()?;
            let json = serde_json::to_string_pretty(&fragment).context("failed to encode JSON")?;
            println!("{json}");
        }
        Command::Check { input } => check(&input),
    }

    Ok(())
}

/// Print a one-line verdict and exit non-zero if the input does not decode.
fn check(input: &InputArgs) {
    let source = input.source_name();
    match input.decode() {
        Ok(fragment) => {
            let elements = fragment
                .iter()
                .flat_map(Node::descendants)
                .filter(|node| node.is_element())
                .count();
            println!(
                "{} {source}: {} top-level nodes, {elements} elements",
                "ok".green().bold(),
                fragment.len()
            );
            let warnings = recorded_warnings().len();
            if warnings > 0 {
                println!("{} {warnings} warning(s) reported", "note".yellow().bold());
            }
        }
        Err(err) => {
            eprintln!("{} {err:#}", "error".red().bold());
            process::exit(1);
        }
    }
}
