use clap::{Parser, Subcommand};
use site_nav::{collection, config, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "site-nav")]
#[command(about = "Navigation chrome and page schema for a static documentation site")]
#[command(long_about = "\
Navigation chrome and page schema for a static documentation site

Pages are markdown files with TOML front matter. Top-level directories
become sections; their pages populate the desktop sub-sidebar flyout.

Content structure:

  content/
  ├── index.md                 # Root page → /
  ├── docs/                    # Section \"docs\"
  │   ├── index.md             # → /docs/
  │   ├── 010-install.md       # → /docs/install/ (prefix orders, is stripped)
  │   └── usage.md             # → /docs/usage/
  └── blog/
      └── hello.md

Front matter:

  +++
  title = \"Installing\"        # required
  nav_label = \"Install\"       # optional, defaults to title
  nav_order = 10              # optional
  icon = \"download\"           # optional
  show_in_nav = true          # default true
  template = \"default\"        # default | wide | landing
  +++

Run 'site-nav gen-config' to generate a documented nav.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Navigation config file (optional)
    #[arg(long, default_value = "nav.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate every page against the content schema
    Check,
    /// Print the sub-page and icon lookups as JSON
    Subpages {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the sub-sidebar link list for one section
    Render {
        /// Section key, as used in `data-subpages`
        section: String,
        /// Current page path, used to mark the active link
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Print a stock nav.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.source.display());
            let collection = collection::load_collection(&cli.source)?;
            output::print_check_output(&collection);
            println!("==> Content is valid");
        }
        Command::Subpages { pretty } => {
            let lookup = collection::load_collection(&cli.source)?.subpages();
            println!("{}", output::format_subpages_json(&lookup, pretty)?);
        }
        Command::Render { section, path } => {
            let nav_config = config::load_config(&cli.config)?;
            let lookup = collection::load_collection(&cli.source)?
                .subpages()
                .with_default_label(nav_config.sub_sidebar.default_label);
            let links = lookup.links(&section, &path);
            if links.is_empty() {
                log::warn!("section {section:?} has no entries");
            }
            println!("{}", output::format_render_output(&links));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
