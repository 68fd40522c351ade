pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "noter-api")]
#[command(about = "Noter API - notes backend with JWT authentication and per-endpoint rate limiting")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides NOTER_API_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Print a token signed with the configured secret")]
    Token {
        #[arg(long, help = "User id claim (UUID)")]
        user_id: uuid::Uuid,
        #[arg(long, help = "Display name claim")]
        name: String,
        #[arg(long, help = "Email claim")]
        email: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config().clone();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(config, port).await,
        Commands::Token { user_id, name, email } => {
            commands::token::handle(&config, user_id, &name, &email, output_format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["noter-api"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn test_token_arguments() {
        let cli = Cli::try_parse_from([
            "noter-api",
            "--json",
            "token",
            "--user-id",
            "11111111-1111-1111-1111-111111111111",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
        ])
        .unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Token { ref name, .. }) if name == "Ada"));
    }

    #[test]
    fn test_token_rejects_bad_uuid() {
        let parsed = Cli::try_parse_from([
            "noter-api", "token", "--user-id", "nope", "--name", "Ada", "--email", "a@b.co",
        ]);
        assert!(parsed.is_err());
    }
}
