//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::backends::apply::ApplyMode;
use crate::backends::scan::ScanOptions;
use crate::core::file_reader::DEFAULT_MAX_FILE_SIZE;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::util::text_or_stdin;
use crate::refs::role::RoleRegistry;

/// doclink - rewrite :doc:`label<target>` references into [label](target) links.
#[derive(Parser, Debug)]
#[command(name = "doclink")]
#[command(
    author,
    version,
    about,
    long_about = r#"doclink rewrites documentation cross-references of the form

    :doc:`Label<target>`

into plain links

    [Label](target)

Anything that does not fit that form exactly is left untouched.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only (for rewrite/render: just the rewritten text)

Examples:
    doclink rewrite 'See :doc:`Guide<guide.md>` for details.' --format raw
    cat index.rst | doclink rewrite --format raw
    doclink refs --scope docs
    doclink apply --check
    doclink apply --write
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        env = "DOCLINK_ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and --scope is\n\
interpreted relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        env = "DOCLINK_FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Unknown values fall back to jsonl."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr. RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that walk a documentation tree
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Limit the run to a subdirectory or file under ROOT.
    #[arg(long, value_name = "PATH")]
    pub scope: Option<PathBuf>,

    /// File extensions to process (comma-separated, without dots).
    #[arg(
        long,
        value_name = "EXTS",
        value_delimiter = ',',
        default_value = "rst,md,txt",
        env = "DOCLINK_EXT"
    )]
    pub ext: Vec<String>,

    /// Include hidden files/directories (dotfiles).
    #[arg(long)]
    pub hidden: bool,

    /// Disable .gitignore and other ignore rules.
    #[arg(long)]
    pub no_ignore: bool,

    /// Skip files larger than this many bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,
}

impl TreeArgs {
    pub fn to_scan_options(&self) -> ScanOptions {
        ScanOptions {
            scope: self.scope.clone(),
            extensions: self
                .ext
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            hidden: self.hidden,
            respect_ignore: !self.no_ignore,
            max_file_size: self.max_file_size,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite references in TEXT (or stdin).
    #[command(long_about = "Rewrite every :doc:`Label<target>` in TEXT into [Label](target).\n\n\
Reads stdin when TEXT is omitted. Emits one rewrite result whose excerpt is\n\
the rewritten text; use --format raw to get just the text.\n\n\
Examples:\n\
  doclink rewrite ':doc:`A<a>` and :doc:`B<b>`' --format raw\n\
  doclink rewrite --format raw < index.rst > index.md\n")]
    Rewrite {
        /// Text to rewrite (defaults to stdin).
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },

    /// List references found in documentation files.
    #[command(long_about = "Scan documentation files under ROOT (or --scope) and emit one\n\
reference result per :doc:`Label<target>` found, with its line range and the\n\
link it rewrites to. Output is sorted for stability.\n\n\
Examples:\n\
  doclink refs\n\
  doclink refs --scope docs --ext rst\n")]
    Refs {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Rewrite references across documentation files.
    #[command(long_about = "Rewrite references in every documentation file under ROOT\n\
(or --scope). Emits one file result per file that contains references.\n\n\
Without --write nothing is modified. With --check the command fails when any\n\
file still contains references, which is useful for CI gating.\n\n\
Examples:\n\
  doclink apply --check\n\
  doclink apply --write --scope docs\n")]
    Apply {
        #[command(flatten)]
        tree: TreeArgs,

        /// Write rewritten files back to disk.
        #[arg(long, conflicts_with = "check")]
        write: bool,

        /// Exit with an error if any file would be rewritten.
        #[arg(long)]
        check: bool,
    },

    /// Render registered inline roles in TEXT (or stdin).
    #[command(long_about = "Run the inline role pipeline over TEXT: every :name:`body` role\n\
whose name is registered is replaced by the role's output; other roles are\n\
left as written. The default registry binds the doc role to the reference\n\
rewriter.\n\n\
Example:\n\
  doclink render 'See :doc:`Guide<guide.md>` and :ref:`x`' --format raw\n")]
    Render {
        /// Text to render (defaults to stdin).
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },

    /// List registered inline roles.
    Roles,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    let ansi = !cli.no_color && std::io::stderr().is_terminal();
    crate::logging::init(cli.verbose, cli.quiet, ansi);

    let format: OutputFormat = cli.format.parse().unwrap_or_else(|e| {
        tracing::warn!("{}, using jsonl", e);
        OutputFormat::default()
    });
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let registry = RoleRegistry::with_defaults();

    match cli.command {
        Commands::Rewrite { text } => {
            let text = text_or_stdin(text)?;
            crate::backends::text::run_rewrite(&text, render_config)
        }

        Commands::Refs { tree } => {
            crate::backends::scan::run_refs(&root, &tree.to_scan_options(), render_config)
        }

        Commands::Apply { tree, write, check } => {
            let mode = if write {
                ApplyMode::Write
            } else {
                ApplyMode::DryRun
            };
            crate::backends::apply::run_apply(
                &root,
                &tree.to_scan_options(),
                mode,
                check,
                render_config,
            )
        }

        Commands::Render { text } => {
            let text = text_or_stdin(text)?;
            crate::backends::text::run_render(&text, &registry, render_config)
        }

        Commands::Roles => crate::backends::text::run_roles(&registry, render_config),
    }
}
