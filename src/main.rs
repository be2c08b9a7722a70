use bitlet::areas::repository::Repository;
use bitlet::artifacts::core::error::Error;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal local version-control engine",
    long_about = "bitlet keeps content-addressed snapshots of a working directory. \
    It stages files, records linear commits and checks commits back out, \
    all without networking, packfiles or merges.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Add file contents to the index",
        long_about = "This command stages files for the next commit. \
        Directories are expanded recursively and files that no longer exist are unstaged."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The paths to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged snapshot as a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Check out a commit",
        long_about = "This command brings the working copy, the index and the current branch to the given commit."
    )]
    Checkout {
        #[arg(index = 1, help = "The full id of the commit to check out")]
        commit: String,
    },
    #[command(
        name = "write-tree",
        about = "Create a tree object from the current index"
    )]
    WriteTree,
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the payload of an object in the repository, or its kind with -t."
    )]
    CatFile {
        #[arg(short = 'p', required_unless_present = "show_type", help = "Print the object's payload")]
        pretty: bool,
        #[arg(short = 't', conflicts_with = "pretty", help = "Print the object's kind")]
        show_type: bool,
        #[arg(index = 1, help = "The object id")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");

            let code = error
                .downcast_ref::<Error>()
                .map(Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;
    let root = match &cli.command {
        Commands::Init { path: Some(path) } => pwd.join(path),
        _ => pwd,
    };
    let mut repository = Repository::new(&root, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::Init { .. } => repository.init().await?,
        Commands::Add { paths } => repository.add(paths).await?,
        Commands::Commit { message } => {
            repository.commit(message).await?;
        }
        Commands::Checkout { commit } => repository.checkout(commit).await?,
        Commands::WriteTree => repository.write_tree().await?,
        Commands::CatFile {
            pretty,
            show_type,
            object,
        } => repository.cat_file(object, *show_type && !*pretty)?,
        Commands::HashObject { write, file } => repository.hash_object(file, *write)?,
    }

    repository.writer().flush()?;

    Ok(())
}
