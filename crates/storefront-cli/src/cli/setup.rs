use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use storefront::query::SortKey;

#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    bin_name = "storefront",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Browse and administer a storefront catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to $STOREFRONT_DATA, then the OS data dir)
    #[arg(long, global = true, help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List products
    #[command(alias = "ls", display_order = 1)]
    Products(ListArgs),

    /// Show one product
    #[command(display_order = 2)]
    Show { id: u64 },

    /// List blog posts
    #[command(display_order = 3)]
    Blog(ListArgs),

    /// List flashcard decks
    #[command(display_order = 4)]
    Decks(ListArgs),

    /// List active banners
    #[command(display_order = 5)]
    Banners {
        /// Only banners for this placement
        #[arg(long)]
        placement: Option<String>,
    },

    /// Catalog administration (requires an admin session)
    #[command(display_order = 10)]
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// Sign in
    #[command(display_order = 20)]
    Login {
        email: String,

        /// Display name (defaults to the email's local part)
        #[arg(long)]
        name: Option<String>,
    },

    /// Sign out
    #[command(display_order = 21)]
    Logout,

    /// Show the current session
    #[command(display_order = 22)]
    Whoami,

    /// Shopping cart
    #[command(display_order = 30)]
    Cart {
        #[command(subcommand)]
        action: Option<CartCommands>,
    },

    /// Support chat
    #[command(display_order = 40)]
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },

    /// Show the resolved configuration
    #[command(display_order = 50)]
    Config,
}

/// Filters shared by every listing command.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Raw page parameters, e.g. "page=2&sort=price-asc". Flags below override it.
    #[arg(long)]
    pub query: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(short, long)]
    pub page: Option<u32>,

    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SortArg {
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    None,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortKey::Newest,
            SortArg::PriceAsc => SortKey::PriceAsc,
            SortArg::PriceDesc => SortKey::PriceDesc,
            SortArg::RatingDesc => SortKey::RatingDesc,
            SortArg::None => SortKey::Unsorted,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Collection {
    Products,
    Blog,
    Decks,
    Banners,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Add a product
    Create(ProductFields),

    /// Change fields of a product
    Update {
        id: u64,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete an entity (absent ids are ignored)
    Delete {
        #[arg(value_enum)]
        collection: Collection,
        id: u64,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub rating: Option<f64>,

    #[arg(long)]
    pub stock: Option<u32>,

    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CartCommands {
    /// Show the cart (default)
    List,

    /// Add a product
    Add {
        product_id: u64,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set a line's quantity (0 removes it)
    Set { product_id: u64, quantity: u32 },

    /// Remove a product
    #[command(alias = "rm")]
    Remove { product_id: u64 },

    /// Empty the cart
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Send a message and print the reply
    Send {
        #[arg(required = true, trailing_var_arg = true)]
        words: Vec<String>,
    },

    /// Print the transcript
    History,

    /// Forget the transcript
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_listing_filters() {
        let cli = Cli::try_parse_from([
            "storefront",
            "products",
            "--category",
            "audio",
            "--sort",
            "price-desc",
            "--page",
            "2",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Products(args) => {
                assert_eq!(args.category.as_deref(), Some("audio"));
                assert_eq!(args.page, Some(2));
                assert!(matches!(args.sort, Some(SortArg::PriceDesc)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_admin_delete() {
        let cli = Cli::try_parse_from(["storefront", "admin", "delete", "decks", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Admin {
                action: AdminCommands::Delete {
                    collection: Collection::Decks,
                    id: 3
                }
            }
        ));
    }

    #[test]
    fn bare_cart_has_no_action() {
        let cli = Cli::try_parse_from(["storefront", "cart"]).unwrap();
        assert!(matches!(cli.command, Commands::Cart { action: None }));
    }
}
