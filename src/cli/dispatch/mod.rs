use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{Context, Result};
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(6012),
        public_url: matches
            .get_one("public-url")
            .map(|s: &String| s.to_string())
            .context("missing required argument: --public-url")?,
    })
}

pub fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;
    let api_token = matches
        .get_one::<String>("api-token")
        .cloned()
        .context("missing required argument: --api-token")?;

    let mut globals = GlobalArgs::new(api_url);
    globals.set_token(SecretString::from(api_token));
    Ok(globals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn matches() -> clap::ArgMatches {
        commands::new().get_matches_from(vec![
            "notify-admin",
            "--port",
            "8080",
            "--api-url",
            "https://api.notify.test",
            "--api-token",
            "token",
            "--public-url",
            "https://admin.notify.test",
        ])
    }

    #[test]
    fn handler_builds_server_action() {
        let action = match handler(&matches()) {
            Ok(action) => action,
            Err(err) => panic!("handler failed: {err}"),
        };
        let Action::Server { port, public_url } = action;
        assert_eq!(port, 8080);
        assert_eq!(public_url, "https://admin.notify.test");
    }

    #[test]
    fn globals_carry_api_endpoint_and_token() {
        let globals = match globals(&matches()) {
            Ok(globals) => globals,
            Err(err) => panic!("globals failed: {err}"),
        };
        assert_eq!(globals.api_url, "https://api.notify.test");
        assert_eq!(globals.api_token.expose_secret(), "token");
    }
}
