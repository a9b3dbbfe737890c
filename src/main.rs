use anyhow::Result;
use clap::Parser;
use tabdiff::areas::repository::Repository;
use tabdiff::artifacts::changes::filter::ChangeFilter;
use tabdiff::artifacts::session::command::ArtifactLine;
use tabdiff::artifacts::session::compiler::CompilerOptions;
use tabdiff::commands::review::ReviewOptions;

#[derive(Parser)]
#[command(
    name = "tabdiff",
    version = "0.1.0",
    about = "Review git changes as editor tabs",
    long_about = "Runs `git diff --raw` with the given arguments and opens the editor \
    with one tab per changed file, showing the new and old revision side by side in diff mode. \
    Arguments after the options (revisions, --cached, pathspecs) are passed through to git diff.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long,
        help = "Editor command to launch (defaults to $EDITOR, then vim)"
    )]
    editor: Option<String>,
    #[arg(
        long,
        help = "Print the session script to stdout instead of launching the editor"
    )]
    print: bool,
    #[arg(
        long = "no-live-files",
        help = "Always show committed content read-only, even when it matches the working tree"
    )]
    no_live_files: bool,
    #[arg(
        long = "strip-first-line",
        help = "Read blobs below the initial empty line and delete the first line instead of the last"
    )]
    strip_first_line: bool,
    #[arg(
        long,
        value_parser = parse_change_filter,
        help = "Only open tabs for these change kinds (letters from MCRADU)"
    )]
    kinds: Option<ChangeFilter>,
    #[arg(short, long, help = "Log debug output to stderr")]
    verbose: bool,
    #[arg(
        index = 1,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Arguments passed through to git diff"
    )]
    diff_args: Vec<String>,
}

fn parse_change_filter(value: &str) -> Result<ChangeFilter, String> {
    ChangeFilter::try_parse(value)
        .ok_or_else(|| format!("invalid change kinds '{}', expected letters from MCRADU", value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let pwd = std::env::current_dir()?;
    let repository = Repository::discover(&pwd, Box::new(std::io::stdout()))?;

    let opts = ReviewOptions {
        diff_args: cli.diff_args,
        filter: cli.kinds.unwrap_or_default(),
        compiler: CompilerOptions {
            prefer_live_file_when_identical: !cli.no_live_files,
            artifact_line: if cli.strip_first_line {
                ArtifactLine::First
            } else {
                ArtifactLine::Last
            },
            root: None,
        },
        print_only: cli.print,
        editor: cli.editor,
        dir: Some(pwd),
    };

    repository.review(&opts)
}
