use std::net::SocketAddr;

use clap::Parser;

use domain::PairingConfig;

#[derive(Parser, Debug)]
#[command(name = "pairing-server", about = "Pairs anonymous WebSocket clients into two-party rooms")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "PAIRING_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Message sent with the `waiting` event
    #[arg(long, env = "PAIRING_WAITING_MESSAGE")]
    pub waiting_message: Option<String>,
}

impl Args {
    pub fn pairing_config(&self) -> PairingConfig {
        let mut config = PairingConfig::default();
        if let Some(message) = &self.waiting_message {
            config.waiting_message.clone_from(message);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_3000_and_stock_message() {
        let args = Args::try_parse_from(["pairing-server"]).unwrap();
        assert_eq!(args.bind, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.pairing_config().waiting_message, PairingConfig::default().waiting_message);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "pairing-server",
            "--bind",
            "127.0.0.1:8080",
            "--waiting-message",
            "hang tight",
        ])
        .unwrap();
        assert_eq!(args.bind.port(), 8080);
        assert_eq!(args.pairing_config().waiting_message, "hang tight");
    }

    #[test]
    fn rejects_bad_bind_address() {
        assert!(Args::try_parse_from(["pairing-server", "--bind", "nowhere"]).is_err());
    }
}
