//! CLI commands

use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use flashdeck_core::models::{
    CardCreateRequest, CardUpdateRequest, DeckCreateRequest, DeckUpdateRequest, LoginRequest,
    RegisterRequest, ResetPasswordRequest,
};
use flashdeck_core::validation::validate_password_confirmation;
use flashdeck_core::auth::Credentials;
use flashdeck_core::{ApiClient, Config};
use tracing::warn;

use crate::{output, prompt, study};

/// Shared state for a single command run.
pub struct Context {
    pub client: ApiClient,
    pub config: Config,
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session tokens
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Sign out and forget the session tokens
    Logout,

    /// Create a new account
    Signup {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Confirm an email address with the token from the verification email
    VerifyEmail { token: String },

    /// Request a password reset email
    ForgotPassword { email: Option<String> },

    /// Choose a new password with the token from the reset email
    ResetPassword { token: String },

    /// Show the signed-in account
    Whoami,

    /// Show local session state
    Status,

    /// Manage decks
    Decks {
        #[command(subcommand)]
        command: DeckCommands,
    },

    /// Manage the cards in a deck
    Cards {
        #[command(subcommand)]
        command: CardCommands,
    },

    /// Review the cards due in a deck
    Study { deck_id: String },

    /// Due decks, all decks and recent activity
    Dashboard {
        /// Number of recent sessions to show
        #[arg(long, default_value_t = 5)]
        recent: u32,
    },

    /// List past study sessions
    History {
        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show one study session
    Session { session_id: String },

    /// Show study statistics
    Stats {
        /// Period such as `week` or `month`
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DeckCommands {
    /// List all decks
    List,

    /// Show one deck
    Show { deck_id: String },

    /// Create a deck
    Create {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Rename a deck or change its description
    Edit {
        deck_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a deck and all its cards
    Delete {
        deck_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum CardCommands {
    /// List the cards in a deck
    List { deck_id: String },

    /// Show one card
    Show { deck_id: String, card_id: String },

    /// Add a card; missing faces are prompted for
    Add {
        deck_id: String,

        #[arg(long)]
        front: Option<String>,

        #[arg(long)]
        back: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Change a card
    Edit {
        deck_id: String,
        card_id: String,

        #[arg(long)]
        front: Option<String>,

        #[arg(long)]
        back: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Replace the card's tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a card
    Delete {
        deck_id: String,
        card_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Commands {
    pub async fn execute(self, ctx: &mut Context) -> Result<()> {
        let client = &ctx.client;
        match self {
            Commands::Login { username } => login(ctx, username).await,
            Commands::Logout => {
                client.logout().await?;
                println!("Logged out.");
                Ok(())
            }
            Commands::Signup { username, email } => signup(client, username, email).await,
            Commands::VerifyEmail { token } => {
                let message = client.verify_email(&token).await?;
                println!("{}", message.as_deref().unwrap_or("Email verified. You can now log in."));
                Ok(())
            }
            Commands::ForgotPassword { email } => {
                let email = prompt::value_or_prompt(email, "Email")?;
                let message = client.request_password_reset(&email).await?;
                println!(
                    "{}",
                    message
                        .as_deref()
                        .unwrap_or("If that address has an account, a reset link is on its way.")
                );
                Ok(())
            }
            Commands::ResetPassword { token } => reset_password(client, token).await,
            Commands::Whoami => {
                let user = client.profile().await?;
                if ctx.json {
                    return output::print_json(&user);
                }
                output::print_user(&user);
                Ok(())
            }
            Commands::Status => {
                status(ctx);
                Ok(())
            }
            Commands::Decks { command } => command.execute(client, ctx.json).await,
            Commands::Cards { command } => command.execute(client, ctx.json).await,
            Commands::Study { deck_id } => study::run(client, &deck_id).await,
            Commands::Dashboard { recent } => {
                let dashboard = client.dashboard(recent).await?;
                if ctx.json {
                    return output::print_json(&dashboard);
                }
                output::print_dashboard(&dashboard);
                Ok(())
            }
            Commands::History { limit, offset } => {
                let sessions = client.list_sessions(Some(limit), Some(offset)).await?;
                if ctx.json {
                    return output::print_json(&sessions);
                }
                output::print_sessions(&sessions);
                Ok(())
            }
            Commands::Session { session_id } => {
                let session = client.get_session(&session_id).await?;
                if ctx.json {
                    return output::print_json(&session);
                }
                output::print_session(&session);
                Ok(())
            }
            Commands::Stats { period } => {
                let stats = client.statistics(period.as_deref()).await?;
                if ctx.json {
                    return output::print_json(&stats);
                }
                output::print_statistics(&stats);
                Ok(())
            }
        }
    }
}

impl DeckCommands {
    async fn execute(self, client: &ApiClient, json: bool) -> Result<()> {
        match self {
            DeckCommands::List => {
                let decks = client.list_decks().await?;
                if json {
                    return output::print_json(&decks);
                }
                output::print_decks(&decks);
            }
            DeckCommands::Show { deck_id } => {
                let deck = client.get_deck(&deck_id).await?;
                if json {
                    return output::print_json(&deck);
                }
                output::print_deck(&deck);
            }
            DeckCommands::Create { name, description } => {
                let deck = client
                    .create_deck(&DeckCreateRequest { name, description })
                    .await?;
                println!("Created deck {} ({})", deck.name, deck.id);
            }
            DeckCommands::Edit {
                deck_id,
                name,
                description,
            } => {
                if name.is_none() && description.is_none() {
                    bail!("Nothing to change. Pass --name and/or --description.");
                }
                let deck = client
                    .update_deck(&deck_id, &DeckUpdateRequest { name, description })
                    .await?;
                println!("Updated deck {}", deck.name);
            }
            DeckCommands::Delete { deck_id, yes } => {
                if !yes && !prompt::confirm(&format!("Delete deck {} and all its cards?", deck_id))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                client.delete_deck(&deck_id).await?;
                println!("Deleted deck {}", deck_id);
            }
        }
        Ok(())
    }
}

impl CardCommands {
    async fn execute(self, client: &ApiClient, json: bool) -> Result<()> {
        match self {
            CardCommands::List { deck_id } => {
                let cards = client.list_cards(&deck_id).await?;
                if json {
                    return output::print_json(&cards);
                }
                output::print_cards(&cards);
            }
            CardCommands::Show { deck_id, card_id } => {
                let card = client.get_card(&deck_id, &card_id).await?;
                if json {
                    return output::print_json(&card);
                }
                output::print_card(&card);
            }
            CardCommands::Add {
                deck_id,
                front,
                back,
                notes,
                tags,
            } => {
                let front = prompt::value_or_prompt(front, "Front")?;
                let back = prompt::value_or_prompt(back, "Back")?;
                let card = client
                    .create_card(
                        &deck_id,
                        &CardCreateRequest {
                            front,
                            back,
                            notes,
                            tags,
                        },
                    )
                    .await?;
                println!("Added card {}", card.id);
            }
            CardCommands::Edit {
                deck_id,
                card_id,
                front,
                back,
                notes,
                tags,
            } => {
                let update = CardUpdateRequest {
                    front,
                    back,
                    notes,
                    tags: (!tags.is_empty()).then_some(tags),
                };
                if update.front.is_none()
                    && update.back.is_none()
                    && update.notes.is_none()
                    && update.tags.is_none()
                {
                    bail!("Nothing to change. Pass --front, --back, --notes or --tag.");
                }
                let card = client.update_card(&deck_id, &card_id, &update).await?;
                println!("Updated card {}", card.id);
            }
            CardCommands::Delete {
                deck_id,
                card_id,
                yes,
            } => {
                if !yes && !prompt::confirm(&format!("Delete card {}?", card_id))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                client.delete_card(&deck_id, &card_id).await?;
                println!("Deleted card {}", card_id);
            }
        }
        Ok(())
    }
}

async fn login(ctx: &mut Context, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt::prompt_with_default("Username", ctx.config.last_username.as_deref())?,
    };
    let password = prompt::prompt_password("Password")?;

    println!("Authenticating...");
    ctx.client
        .login(&LoginRequest {
            username: username.clone(),
            password,
        })
        .await?;

    ctx.config.last_username = Some(username);
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Login successful!");
    Ok(())
}

async fn signup(client: &ApiClient, username: Option<String>, email: Option<String>) -> Result<()> {
    let username = prompt::value_or_prompt(username, "Username")?;
    let email = prompt::value_or_prompt(email, "Email")?;
    let password = prompt::prompt_password("Password")?;
    let confirmation = prompt::prompt_password("Confirm password")?;
    validate_password_confirmation(&password, &confirmation)?;

    let message = client
        .signup(&RegisterRequest {
            username,
            email,
            password,
        })
        .await?;
    println!(
        "{}",
        message
            .as_deref()
            .unwrap_or("Account created. Check your email to verify your address.")
    );
    Ok(())
}

async fn reset_password(client: &ApiClient, token: String) -> Result<()> {
    let new_password = prompt::prompt_password("New password")?;
    let confirmation = prompt::prompt_password("Confirm new password")?;
    validate_password_confirmation(&new_password, &confirmation)?;

    let message = client
        .reset_password(&ResetPasswordRequest {
            token,
            new_password,
        })
        .await
        .context("Password reset failed")?;
    println!(
        "{}",
        message
            .as_deref()
            .unwrap_or("Password updated. You can now log in.")
    );
    Ok(())
}

fn status(ctx: &Context) {
    let session = ctx.client.session();
    println!("API:      {}", ctx.client.gateway().base_url());

    match session.credentials() {
        Some(credentials) => {
            match ctx.config.last_username.as_deref() {
                Some(username) => println!("Session:  signed in as {}", username),
                None => println!("Session:  signed in"),
            }
            println!("Token:    {}", token_state(&credentials));
        }
        None => println!("Session:  signed out"),
    }
}

fn token_state(credentials: &Credentials) -> String {
    match credentials.minutes_until_expiry() {
        Some(_) if credentials.is_expired() => "expired, renews on next request".to_string(),
        Some(minutes) if credentials.expires_soon() => {
            format!("expires in {} min (soon, renews automatically)", minutes)
        }
        Some(minutes) => format!("expires in {} min", minutes),
        None => "expiry unknown".to_string(),
    }
}
