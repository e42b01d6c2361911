//! Help for people who do not have a token yet.

use crate::conf::TOKEN_ENV;
use colored::Colorize;
use indoc::formatdoc;

/// Scopes the token needs for every command to work.
pub const SCOPES: [&str; 3] = ["reactions:read", "users:read", "users:read.email"];

/// Step-by-step instructions for creating a token and making it available
/// to slak, styled for the terminal.
pub fn instructions() -> String {
    let scopes = SCOPES
        .iter()
        .map(|scope| scope.bright_white().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    formatdoc! {"
        {get_heading}

        1. Open {apps_url}.
        2. Click {create}, {scratch}, fill, and create the app.
        3. Switch to {oauth}, find {scope}, and add {scopes}.
        4. Click {install}.
        5. Copy your token!

        Or ask your colleague for a token.

        {set_heading}

        {export}

        In this way, you're free from using {token_flag} every time and your token is secure from being recorded into the command history file.",
        get_heading = "How to get a token?".bold().underline(),
        apps_url = "https://api.slack.com/apps".bright_white(),
        create = "Create New App".bright_white(),
        scratch = "From scratch".bright_white(),
        oauth = "OAuth & Permissions".bright_white(),
        scope = "Scope".bright_white(),
        scopes = scopes,
        install = "Install to Workspace".bright_white(),
        set_heading = "How to set the token?".bold().underline(),
        export = format!("$ read {TOKEN_ENV} && export {TOKEN_ENV}").as_str().bold(),
        token_flag = "--token".bright_white(),
    }
}
