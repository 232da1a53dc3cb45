use clap::{Parser, Subcommand};

/// Lookup Gateway — GitHub, YouTube and Graph token lookups behind one API
#[derive(Debug, Parser)]
#[command(name = "lookup-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to bind (overrides GATEWAY_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one token conversion and print the JSON response
    Convert {
        #[arg(long)]
        token: String,
        /// Seed for reproducible simulated records
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the video id extracted from a YouTube link
    VideoId {
        #[arg(long)]
        link: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["lookup-gateway"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_convert_arguments() {
        let cli =
            Cli::try_parse_from(["lookup-gateway", "convert", "--token", "abc", "--seed", "7"])
                .unwrap();
        match cli.command {
            Some(Commands::Convert { token, seed }) => {
                assert_eq!(token, "abc");
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_port_is_optional() {
        let cli = Cli::try_parse_from(["lookup-gateway", "serve", "-p", "9000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));
        assert!(Cli::try_parse_from(["lookup-gateway", "serve", "-p", "nope"]).is_err());
    }
}
