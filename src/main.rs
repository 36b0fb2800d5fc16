// Use modules from the library crate
use mensa::{commands, config, ApiClient, Session};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mensa",
    about = "CLI client for the office meal-ordering service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Set or show the client configuration
    Configure {
        /// Base URL of the meal-ordering API (e.g. https://mensa.example.com)
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Print the effective configuration instead of changing it
        #[arg(long)]
        show: bool,
    },

    /// Sign in and persist the session
    Login {
        /// Username or email
        identifier: String,

        /// Password (prompted for when omitted)
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Inspect the stored access token
    Token,

    /// Show today's menu and the ordering deadline
    Menu {
        /// Keep a live countdown running until the deadline
        #[arg(long, short = 'w')]
        watch: bool,
    },

    /// Show, place or edit today's order
    Order {
        #[command(subcommand)]
        command: OrderCommand,
    },

    /// Management commands (requires the Admin role)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Parser)]
enum OrderCommand {
    /// Show today's order
    Show,

    /// Place today's order before the deadline
    Place {
        /// Item name from today's menu (repeatable)
        #[arg(long, short = 'i', value_name = "NAME", required = true)]
        item: Vec<String>,

        /// Free-form note for the kitchen
        #[arg(long, short = 'n')]
        note: Option<String>,
    },

    /// Replace the items of today's order
    Edit {
        /// Item name from today's menu (repeatable)
        #[arg(long, short = 'i', value_name = "NAME", required = true)]
        item: Vec<String>,

        /// Free-form note for the kitchen
        #[arg(long, short = 'n')]
        note: Option<String>,
    },
}

#[derive(Parser)]
enum AdminCommand {
    /// Account management
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Product catalog management
    Products {
        #[command(subcommand)]
        command: ProductCommand,
    },

    /// List the dish categories in display order
    Categories,

    /// Menu management
    Menus {
        #[command(subcommand)]
        command: MenuCommand,
    },

    /// Create a month of menus from a CSV sheet
    ///
    /// The sheet needs a header row with a 'giorno' column plus one column
    /// per category (primo, secondo, contorno, dessert). Each weekday row
    /// expands to every matching date of the target month; dates that
    /// already have a menu are skipped.
    Import {
        /// Path to the CSV file
        file: PathBuf,

        /// Target year (e.g. 2025)
        #[arg(long)]
        year: i32,

        /// Target month (1-12)
        #[arg(long)]
        month: u32,
    },
}

#[derive(Parser)]
enum UserCommand {
    /// List users with their monthly order count
    List {
        /// Match against username or email (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Year for the order count (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month for the order count (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Show one account
    Show {
        /// Numeric user id
        id: i64,
    },

    /// Create an account with the standard role
    Create {
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Update an account
    Update {
        /// Numeric user id
        id: i64,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Block or unblock the account
        #[arg(long)]
        blocked: Option<bool>,
    },

    /// Delete an account
    Delete {
        /// Numeric user id
        id: i64,
    },
}

#[derive(Parser)]
enum ProductCommand {
    /// List products
    List {
        /// Match against product or category name (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Results per page
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },

    /// Show one product
    Show {
        /// Product document id
        id: String,
    },

    /// Create a product
    Create {
        name: String,

        /// Category name (see 'mensa admin categories')
        #[arg(long)]
        category: String,
    },

    /// Update a product
    Update {
        /// Product document id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a product
    Delete {
        /// Product document id
        id: String,
    },
}

#[derive(Parser)]
enum MenuCommand {
    /// List menus, optionally within a day range
    List {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },

    /// Create an empty menu for a day
    Create {
        /// Day of the menu
        #[arg(value_name = "YYYY-MM-DD")]
        day: NaiveDate,
    },

    /// Change a menu's day or deadline
    Update {
        /// Menu document id
        id: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        day: Option<NaiveDate>,

        /// Local time of day, e.g. 09:30
        #[arg(long, value_name = "HH:MM")]
        deadline: Option<String>,
    },

    /// Delete a menu
    Delete {
        /// Menu document id
        id: String,
    },

    /// Link a product into a menu
    AddItem {
        /// Menu document id
        id: String,

        /// Product document id
        #[arg(long)]
        item: String,
    },

    /// Unlink a product from a menu
    RemoveItem {
        /// Menu document id
        id: String,

        /// Product document id
        #[arg(long)]
        item: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    mensa::logging::init()?;

    let cli = Cli::parse();

    // Configure works without a loaded config; everything else needs one
    let command = match cli.command {
        Command::Configure {
            api_url,
            timeout,
            show,
        } => {
            return if show {
                commands::configure::show()
            } else {
                commands::configure::set(api_url, timeout)
            };
        }
        command => command,
    };

    let config = config::load_config()?;
    let session = Session::open(&config)?;
    let client = ApiClient::new(&config, session.clone())?;

    match command {
        Command::Configure { .. } => unreachable!("handled above"),

        Command::Login {
            identifier,
            password,
        } => commands::login::login(&session, &identifier, password).await,

        Command::Logout => commands::login::logout(&session),

        Command::Whoami => commands::login::whoami(&session).await,

        Command::Token => commands::token::show(&session),

        Command::Menu { watch } => commands::menu::show(&client, &session, watch).await,

        Command::Order { command } => match command {
            OrderCommand::Show => commands::order::show(&client, &session).await,
            OrderCommand::Place { item, note } => {
                commands::order::place(&client, &session, &item, note.as_deref()).await
            }
            OrderCommand::Edit { item, note } => {
                commands::order::edit(&client, &session, &item, note.as_deref()).await
            }
        },

        Command::Admin { command } => match command {
            AdminCommand::Users { command } => match command {
                UserCommand::List {
                    search,
                    year,
                    month,
                } => {
                    commands::admin::users::list(&client, &session, search.as_deref(), year, month)
                        .await
                }
                UserCommand::Show { id } => {
                    commands::admin::users::show(&client, &session, id).await
                }
                UserCommand::Create {
                    username,
                    email,
                    password,
                } => {
                    commands::admin::users::create(&client, &session, &username, &email, &password)
                        .await
                }
                UserCommand::Update {
                    id,
                    email,
                    password,
                    blocked,
                } => {
                    commands::admin::users::update(
                        &client,
                        &session,
                        id,
                        email.as_deref(),
                        password.as_deref(),
                        blocked,
                    )
                    .await
                }
                UserCommand::Delete { id } => {
                    commands::admin::users::delete(&client, &session, id).await
                }
            },

            AdminCommand::Products { command } => match command {
                ProductCommand::List {
                    search,
                    page,
                    page_size,
                } => {
                    commands::admin::products::list(
                        &client,
                        &session,
                        search.as_deref(),
                        page,
                        page_size,
                    )
                    .await
                }
                ProductCommand::Show { id } => {
                    commands::admin::products::show(&client, &session, &id).await
                }
                ProductCommand::Create { name, category } => {
                    commands::admin::products::create(&client, &session, &name, &category).await
                }
                ProductCommand::Update { id, name, category } => {
                    commands::admin::products::update(
                        &client,
                        &session,
                        &id,
                        name.as_deref(),
                        category.as_deref(),
                    )
                    .await
                }
                ProductCommand::Delete { id } => {
                    commands::admin::products::delete(&client, &session, &id).await
                }
            },

            AdminCommand::Categories => {
                commands::admin::products::categories(&client, &session).await
            }

            AdminCommand::Menus { command } => match command {
                MenuCommand::List { from, to } => {
                    commands::admin::menus::list(&client, &session, from, to).await
                }
                MenuCommand::Create { day } => {
                    commands::admin::menus::create(&client, &session, day).await
                }
                MenuCommand::Update { id, day, deadline } => {
                    commands::admin::menus::update(&client, &session, &id, day, deadline.as_deref())
                        .await
                }
                MenuCommand::Delete { id } => {
                    commands::admin::menus::delete(&client, &session, &id).await
                }
                MenuCommand::AddItem { id, item } => {
                    commands::admin::menus::add_item(&client, &session, &id, &item).await
                }
                MenuCommand::RemoveItem { id, item } => {
                    commands::admin::menus::remove_item(&client, &session, &id, &item).await
                }
            },

            AdminCommand::Import { file, year, month } => {
                commands::admin::import::run(&client, &session, &file, year, month).await
            }
        },
    }
}
