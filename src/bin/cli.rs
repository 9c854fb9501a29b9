//! tagdict CLI
//!
//! Command-line interface for inspecting and editing dictionary files.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tagdict::{validate_key, Config, DictError, Format, Id, Store, Width};
use tracing_subscriber::{fmt, EnvFilter};

/// tagdict CLI
#[derive(Parser, Debug)]
#[command(name = "tagdict")]
#[command(about = "Inspect and edit tagdict dictionary files")]
#[command(version)]
struct Args {
    /// Dictionary file
    #[arg(short, long, default_value = "./tagdict.dat")]
    file: PathBuf,

    /// Id width in bits
    #[arg(short, long, value_enum, default_value = "16")]
    width: WidthArg,

    /// File format
    #[arg(long, value_enum, default_value = "binary")]
    format: FormatArg,

    /// fsync after every save
    #[arg(long)]
    sync: bool,

    /// Fail instead of creating a missing file
    #[arg(long)]
    no_create: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get (or allocate) ids for keys, saving any new ones
    Id {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Resolve ids to keys
    Key {
        /// Ids to resolve
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// List entries whose key starts with a prefix
    Prefix {
        /// The prefix to match
        prefix: String,
    },

    /// Bind an id to a new key
    RenameId {
        /// The id to rename
        id: u64,

        /// The new key
        new_key: String,
    },

    /// Move a key's id to a new key
    RenameKey {
        /// The existing key
        old_key: String,

        /// The new key
        new_key: String,
    },

    /// List all entries, sorted by id
    List,

    /// Print the number of entries
    Count,

    /// Write the dictionary to another file
    Convert {
        /// Output file
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum)]
        to: FormatArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WidthArg {
    #[value(name = "8")]
    W8,
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
}

impl From<WidthArg> for Width {
    fn from(arg: WidthArg) -> Self {
        match arg {
            WidthArg::W8 => Width::W8,
            WidthArg::W16 => Width::W16,
            WidthArg::W32 => Width::W32,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Binary,
    Text,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Binary => Format::Binary,
            FormatArg::Text => Format::Text,
        }
    }
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays scriptable)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tagdict=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("tagdict v{}", tagdict::VERSION);

    // Build config from args
    let config = Config::builder()
        .path(&args.file)
        .width(args.width.into())
        .format(args.format.into())
        .sync_on_save(args.sync)
        .create_if_missing(!args.no_create)
        .build();

    let result = match config.width {
        Width::W8 => run::<u8>(config, args.command),
        Width::W16 => run::<u16>(config, args.command),
        Width::W32 => run::<u32>(config, args.command),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Execute one command against a store of width `W`
fn run<W: Id>(config: Config, command: Commands) -> tagdict::Result<()> {
    let store = Store::<W>::open(config)?;
    let dict = store.dictionary();

    match command {
        Commands::Id { keys } => {
            // Reject the whole batch before allocating anything
            for key in &keys {
                if !dict.contains_key(key) {
                    validate_key(key)?;
                }
            }

            let before = dict.last_id();
            let ids = dict.get_ids(keys.as_slice());
            // Exhaustion can still stop a batch part way; keep what was allocated
            if dict.last_id() != before {
                store.save()?;
            }
            for (key, id) in keys.iter().zip(&ids?) {
                println!("{}\t{}", id, key);
            }
        }
        Commands::Key { ids } => {
            for raw in ids {
                match dict.get_key(parse_id::<W>(raw)?) {
                    Some(key) => println!("{}\t{}", raw, key),
                    None => println!("{}\t(not found)", raw),
                }
            }
        }
        Commands::Prefix { prefix } => {
            let mut entries: Vec<_> = dict.get_prefix(&prefix).into_iter().collect();
            entries.sort_unstable_by_key(|(_, id)| *id);
            for (key, id) in entries {
                println!("{}\t{}", id, key);
            }
        }
        Commands::RenameId { id, new_key } => {
            let renamed = dict.rename_id(parse_id::<W>(id)?, &new_key)?;
            report_rename(renamed, &store)?;
        }
        Commands::RenameKey { old_key, new_key } => {
            let renamed = dict.rename_key(&old_key, &new_key)?;
            report_rename(renamed, &store)?;
        }
        Commands::List => {
            let mut entries: Vec<_> = dict.all().into_iter().collect();
            entries.sort_unstable_by_key(|(id, _)| *id);
            for (id, key) in entries {
                println!("{}\t{}", id, key);
            }
        }
        Commands::Count => println!("{}", dict.count()),
        Commands::Convert { output, to } => {
            store.export(&output, to.into())?;
            println!("wrote {} entries to {}", dict.count(), output.display());
        }
    }

    Ok(())
}

/// Narrow a command-line id to `W`
fn parse_id<W: Id>(raw: u64) -> tagdict::Result<W> {
    W::from_u64(raw).ok_or_else(|| {
        DictError::Config(format!("id {} does not fit in {} bits", raw, W::BITS))
    })
}

fn report_rename<W: Id>(renamed: bool, store: &Store<W>) -> tagdict::Result<()> {
    if renamed {
        store.save()?;
        println!("renamed");
    } else {
        println!("not found");
    }
    Ok(())
}
