use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_builds_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "stead",
            "--port",
            "9090",
            "--dsn",
            "postgres://localhost/stead",
        ]);
        let action = handler(&matches).expect("action");
        let Action::Server { port, dsn } = action;
        assert_eq!(port, 9090);
        assert_eq!(dsn, "postgres://localhost/stead");
    }
}
