//! Environment and configuration utilities.

use crate::auth::{AuthError, AuthResult, Token};
use std::env::VarError;
use std::io::{self, BufRead, Write};

/// Environment variable consulted for a token when `--token` is not given.
pub const TOKEN_ENV: &str = "SLAK_TOKEN";

/// Resolves the token used for every API call in this invocation.
///
/// The token given on the command line (`flag`) wins. Otherwise the token
/// is read from `$SLAK_TOKEN`, and if that is unset too, the user is asked
/// for it via `prompt`. Empty values are skipped at every step.
///
/// # Examples
///
/// A token passed on the command line always wins:
///
/// ```
/// use slak::conf::resolve_token;
/// # use temp_env::with_var;
/// # with_var("SLAK_TOKEN", Some("xoxp-from-env"), || {
/// let token = resolve_token(Some("xoxp-from-flag"), || unreachable!()).unwrap();
/// assert_eq!(token.secret(), "xoxp-from-flag");
/// # });
/// ```
///
/// Without a flag, `$SLAK_TOKEN` is used:
///
/// ```
/// use slak::conf::resolve_token;
/// # use temp_env::with_var;
/// # with_var("SLAK_TOKEN", Some("xoxp-from-env"), || {
/// let token = resolve_token(None, || unreachable!()).unwrap();
/// assert_eq!(token.secret(), "xoxp-from-env");
/// # });
/// ```
///
/// And only then is the user prompted:
///
/// ```
/// use slak::conf::resolve_token;
/// # use temp_env::with_var_unset;
/// # with_var_unset("SLAK_TOKEN", || {
/// let token = resolve_token(None, || Ok(String::from("xoxp-typed\n"))).unwrap();
/// assert_eq!(token.secret(), "xoxp-typed");
/// # });
/// ```
pub fn resolve_token<F>(flag: Option<&str>, prompt: F) -> AuthResult
where
    F: FnOnce() -> io::Result<String>,
{
    if let Some(secret) = flag.filter(|s| !s.is_empty()) {
        return Ok(Token::new(secret));
    }

    match Token::from_env(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => return Ok(token),
        Ok(_) | Err(AuthError::EnvError(VarError::NotPresent)) => {}
        Err(err) => return Err(err),
    }

    log::debug!("No token in ${TOKEN_ENV}, prompting");
    let answer = prompt().map_err(AuthError::PromptError)?;
    let secret = answer.trim();
    if secret.is_empty() {
        Err(AuthError::Missing)
    } else {
        Ok(Token::new(secret))
    }
}

/// Asks for a token on standard error and reads one line from `input`.
pub fn prompt_token<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "Token: ")?;
    stderr.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}
