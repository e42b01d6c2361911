// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::conf;
pub use crate::error::Error;
use crate::error::UsageError;
use crate::howto;
use crate::slack::reactions::{Projection, ReactionQuery, Target};
use crate::slack::service::{Service, SlackService};
use crate::slack::users::{self, Fields, ProfileQuery};
use crate::view::{Json, JsonStyle, Viewable};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::LevelFilter;
use std::io::{self, BufRead, Write};
use std::process;

/// Prints `message` on standard error and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

const REACTS_EXAMPLES: &str = "\
Examples:
  slak query-reacts --token TOKEN https://company.slack.com/archives/C123ABCD4/p1658312123456789
  slak query-reacts --token TOKEN --channel C123ABCD4 --timestamp 1658312123.456789 --count
  slak query-reacts https://company.slack.com/archives/C123ABCD4/p1658312123456789 --clicked thumbsup";

const USERS_EXAMPLES: &str = "\
Examples:
  slak query-users --emails --names U123AB45C U678CD90E
  echo U123AB45C | slak query-users --token TOKEN --emails";

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Collect reactions and user profiles from Slack handily.", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    /// The most verbose level of log messages that should be printed.
    pub fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the reactions on a message, or the users who reacted
    #[command(after_help = REACTS_EXAMPLES)]
    QueryReacts(ReactsConfig),

    /// Read user IDs from args or stdin and print their profiles
    #[command(after_help = USERS_EXAMPLES)]
    QueryUsers(UsersConfig),

    /// Don't you have a token?
    HowToGetAToken,
}

#[derive(Args, Debug)]
struct ReactsConfig {
    /// Slack token, something starting with 'xoxp-' [env: SLAK_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Link to the message
    link: Option<String>,

    /// Channel ID of the message, if no link is given
    #[arg(long)]
    channel: Option<String>,

    /// Timestamp of the message, e.g. 1658312123.456789, if no link is given
    #[arg(long)]
    timestamp: Option<String>,

    /// Print the number of users next to each reaction
    #[arg(long, default_value_t = false)]
    count: bool,

    /// Print the users of every reaction, next to the reaction name
    #[arg(long, default_value_t = false)]
    users: bool,

    /// Only print the users who clicked the reaction NAME
    #[arg(long, value_name = "NAME")]
    clicked: Option<String>,

    /// Only print the users of the first reaction
    #[arg(long, default_value_t = false)]
    first: bool,

    /// Instead of the processed result, print the response body in JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl ReactsConfig {
    fn target(&self) -> Result<Target, UsageError> {
        Target::from_args(
            self.link.as_deref(),
            self.channel.as_deref(),
            self.timestamp.as_deref(),
        )
    }

    fn projection(&self) -> Projection {
        Projection::from_flags(self.count, self.users, self.clicked.as_deref(), self.first)
    }
}

#[derive(Args, Debug)]
struct UsersConfig {
    /// Slack token, something starting with 'xoxp-' [env: SLAK_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// User IDs; read from standard input if none are given
    users: Vec<String>,

    /// Print email addresses
    #[arg(long, default_value_t = false)]
    emails: bool,

    /// Print real names
    #[arg(long, default_value_t = false)]
    names: bool,

    /// Print titles
    #[arg(long, default_value_t = false)]
    titles: bool,

    /// Instead of the processed result, print the response bodies in JSON Lines
    #[arg(long, default_value_t = false)]
    jsonl: bool,
}

impl UsersConfig {
    fn fields(&self) -> Fields {
        Fields::default()
            .email(self.emails)
            .real_name(self.names)
            .title(self.titles)
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner<S: Service> {
    config: Config,
    service: S,
}

impl Runner<SlackService> {
    /// Create a new program runner using the given `config` that talks
    /// to the real Slack API.
    pub fn new(config: Config) -> Self {
        Self::with_service(config, SlackService::default())
    }
}

impl<S: Service> Runner<S> {
    /// Create a new program runner using the given `config` that calls
    /// Slack through `service`.
    pub fn with_service(config: Config, service: S) -> Self {
        Self { config, service }
    }

    /// Run the command-line program using its stored configuration options.
    ///
    /// `input` is where user IDs and a prompted token are read from, and
    /// results are written to `out`.
    pub async fn run<R, W>(&self, mut input: R, out: &mut W) -> Result<(), Error>
    where
        R: BufRead,
        W: Write,
    {
        match &self.config.command {
            Command::QueryReacts(config) => self.run_query_reacts(config, &mut input, out).await,
            Command::QueryUsers(config) => self.run_query_users(config, &mut input, out).await,
            Command::HowToGetAToken => self.run_how_to_get_a_token(out),
        }
    }

    async fn run_query_reacts<R, W>(
        &self,
        config: &ReactsConfig,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), Error>
    where
        R: BufRead,
        W: Write,
    {
        // Bad arguments are reported before asking for a token or calling Slack.
        let target = config.target()?;
        let token = conf::resolve_token(config.token.as_deref(), || {
            conf::prompt_token(&mut *input)
        })?;
        let query = ReactionQuery::new(&self.service, &token);

        if config.json {
            let envelope = query.envelope(&target).await?;
            writeln!(out, "{}", Json::new(&envelope, JsonStyle::Pretty).view())?;
            return Ok(());
        }

        for row in query.rows(&target, &config.projection()).await? {
            writeln!(out, "{}", row.view())?;
        }
        Ok(())
    }

    async fn run_query_users<R, W>(
        &self,
        config: &UsersConfig,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), Error>
    where
        R: BufRead,
        W: Write,
    {
        let token = conf::resolve_token(config.token.as_deref(), || {
            conf::prompt_token(&mut *input)
        })?;
        let user_ids = if config.users.is_empty() {
            users::read_user_ids(&mut *input)?
        } else {
            config.users.clone()
        };

        let fields = config.fields();
        let mut query = ProfileQuery::new(&self.service, &token, user_ids);
        while let Some(info) = query.next().await {
            let info = info?;
            let line = if config.jsonl {
                Json::new(info.envelope(), JsonStyle::Compact).view()
            } else {
                fields.select(&info.profile()?)?.view()
            };
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn run_how_to_get_a_token<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        writeln!(out, "{}", howto::instructions())?;
        Ok(())
    }
}

/// Runs the command described by `config` against the real Slack API,
/// reading from standard input and printing to standard output.
pub async fn run(config: Config) -> Result<(), Error> {
    let runner = Runner::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    runner.run(stdin.lock(), &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::service::ApiError;
    use crate::test_utils::{Call, TestService};

    struct Outcome {
        result: Result<(), Error>,
        output: String,
        calls: Vec<Call>,
    }

    async fn run_with(args: &[&str], service: TestService, input: &str) -> Outcome {
        let argv = std::iter::once("slak").chain(args.iter().copied());
        let config = Config::try_parse_from(argv).expect("invalid test arguments");
        let runner = Runner::with_service(config, service);
        let mut out = Vec::new();
        let result = runner.run(input.as_bytes(), &mut out).await;
        Outcome {
            result,
            output: String::from_utf8(out).expect("output is not UTF-8"),
            calls: runner.service.calls(),
        }
    }

    async fn run(args: &[&str]) -> Outcome {
        run_with(args, TestService::new("ok"), "").await
    }

    const LINK: &str = "https://COMPANY.slack.com/archives/CCCCCCCCC/p9999999999999999";

    mod config {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_logs_errors_by_default() {
            let config = Config::try_parse_from(["slak", "how-to-get-a-token"]).unwrap();
            assert_eq!(config.log_level(), LevelFilter::Error);
        }

        #[test]
        fn it_logs_more_when_asked() {
            let config = Config::try_parse_from(["slak", "-vv", "how-to-get-a-token"]).unwrap();
            assert_eq!(config.log_level(), LevelFilter::Info);
        }

        #[test]
        fn it_logs_nothing_when_quiet() {
            let config = Config::try_parse_from(["slak", "-q", "how-to-get-a-token"]).unwrap();
            assert_eq!(config.log_level(), LevelFilter::Off);
        }

        #[test]
        fn it_requires_a_command() {
            assert!(Config::try_parse_from(["slak"]).is_err());
        }
    }

    mod query_reacts {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_lists_reaction_names() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", LINK]).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "react-1\nreact-2\n");
        }

        #[tokio::test]
        async fn it_counts_reactions() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", LINK, "--count"]).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "29\treact-1\n3\treact-2\n");
        }

        #[tokio::test]
        async fn it_lists_users_who_clicked_a_reaction() {
            let args = ["query-reacts", "--token", "TOKEN", LINK, "--users", "--clicked", "react-2"];
            let outcome = run(&args).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "UUUUUUUUUAA\nUUUUUUUUUBB\nUUUUUUUUUCC\n");
        }

        #[tokio::test]
        async fn it_lists_users_who_clicked_the_first_reaction() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", LINK, "--first"]).await;
            assert!(outcome.result.is_ok());
            let lines: Vec<_> = outcome.output.lines().collect();
            assert_eq!(lines.len(), 29);
            assert_eq!(lines[0], "U018V1SL001");
            assert_eq!(lines[28], "U015DFTJ029");
        }

        #[tokio::test]
        async fn it_lists_all_users_tagged_by_reaction() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", LINK, "--users"]).await;
            assert!(outcome.result.is_ok());
            let lines: Vec<_> = outcome.output.lines().collect();
            assert_eq!(lines.len(), 32);
            assert_eq!(lines[0], "react-1\tU018V1SL001");
            assert_eq!(lines[29], "react-2\tUUUUUUUUUAA");
        }

        #[tokio::test]
        async fn it_lists_nobody_for_an_unknown_reaction() {
            let args = ["query-reacts", "--token", "TOKEN", LINK, "--clicked", "react-3"];
            let outcome = run(&args).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "");
        }

        #[tokio::test]
        async fn it_prints_the_response_as_json() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", LINK, "--json"]).await;
            assert!(outcome.result.is_ok());
            assert!(outcome.output.starts_with("{\n  \"ok\": true,\n"));
            assert!(outcome.output.ends_with("}\n"));
            let printed: serde_json::Value = serde_json::from_str(&outcome.output).unwrap();
            let recorded: serde_json::Value =
                serde_json::from_str(&crate::test_utils::load_data("reactions.get_ok")).unwrap();
            assert_eq!(printed, recorded);
        }

        #[tokio::test]
        async fn it_queries_a_channel_and_timestamp() {
            let args = [
                "query-reacts",
                "--token",
                "TOKEN",
                "--channel",
                "C123ABCD4",
                "--timestamp",
                "1658312123.456789",
            ];
            let outcome = run(&args).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.calls.len(), 1);
            assert_eq!(
                outcome.calls[0].params[..2],
                [
                    (String::from("channel"), String::from("C123ABCD4")),
                    (String::from("timestamp"), String::from("1658312123.456789")),
                ]
            );
        }

        #[tokio::test]
        async fn it_needs_a_link_or_a_channel_and_timestamp() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", "--channel", "C1"]).await;
            assert!(matches!(
                outcome.result,
                Err(Error::Usage(UsageError::InsufficientTarget))
            ));
            assert!(outcome.calls.is_empty());
        }

        #[tokio::test]
        async fn it_refuses_a_link_with_a_channel() {
            let outcome = run(&["query-reacts", "--token", "TOKEN", LINK, "--channel", "C1"]).await;
            assert!(matches!(
                outcome.result,
                Err(Error::Usage(UsageError::ConflictingTarget))
            ));
            assert!(outcome.calls.is_empty());
        }

        #[tokio::test]
        async fn it_fails_on_a_bad_link() {
            let link = "https://COMPANY.slack.com/archives/CCCCCCCCC/latest";
            let outcome = run(&["query-reacts", "--token", "TOKEN", link]).await;
            assert!(matches!(outcome.result, Err(Error::Parse(_))));
            assert!(outcome.calls.is_empty());
        }

        #[tokio::test]
        async fn it_fails_when_slack_rejects_the_call() {
            let args = ["query-reacts", "--token", "TOKEN", LINK];
            let outcome = run_with(&args, TestService::new("error"), "").await;
            assert!(matches!(outcome.result, Err(Error::Api(ApiError::Rejected(_)))));
            assert_eq!(outcome.output, "");
        }

        #[tokio::test]
        async fn it_fails_on_a_count_mismatch() {
            let args = ["query-reacts", "--token", "TOKEN", LINK, "--users"];
            let outcome = run_with(&args, TestService::new("mismatch"), "").await;
            assert!(matches!(outcome.result, Err(Error::Data(_))));
            assert_eq!(outcome.output, "");
        }
    }

    mod query_users {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_reads_users_from_input() {
            let args = ["query-users", "--token", "TOKEN", "--emails"];
            let outcome = run_with(&args, TestService::new("ok"), "U1\nU2").await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "alice@example.com\nalice@example.com\n");
            let users: Vec<_> = outcome.calls.iter().map(|c| c.params[0].1.as_str()).collect();
            assert_eq!(users, ["U1", "U2"]);
        }

        #[tokio::test]
        async fn it_reads_users_from_arguments() {
            let args = ["query-users", "--token", "TOKEN", "U9", "--names"];
            let outcome = run_with(&args, TestService::new("ok"), "U1\nU2").await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "Alice Liddell\n");
            assert_eq!(outcome.calls.len(), 1);
            assert_eq!(outcome.calls[0].params[0].1, "U9");
        }

        #[tokio::test]
        async fn it_prints_fields_in_a_fixed_order() {
            let args = ["query-users", "--token", "TOKEN", "U1", "--titles", "--emails"];
            let outcome = run(&args).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "alice@example.com\tExplorer\n");
        }

        #[tokio::test]
        async fn it_prints_empty_lines_without_fields() {
            let outcome = run(&["query-users", "--token", "TOKEN", "U1", "U2"]).await;
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, "\n\n");
        }

        #[tokio::test]
        async fn it_prints_json_lines() {
            let outcome = run(&["query-users", "--token", "TOKEN", "U1", "U2", "--jsonl"]).await;
            assert!(outcome.result.is_ok());
            let lines: Vec<_> = outcome.output.lines().collect();
            assert_eq!(lines.len(), 2);
            for line in lines {
                assert!(line.starts_with("{\"ok\":true,\"user\":{"), "{line}");
            }
        }

        #[tokio::test]
        async fn it_stops_at_the_first_failure() {
            let args = ["query-users", "--token", "TOKEN", "U1", "U2", "U3", "--emails"];
            let service = TestService::sequence(["ok", "error", "ok"]);
            let outcome = run_with(&args, service, "").await;
            assert!(matches!(
                outcome.result,
                Err(Error::Api(ApiError::Rejected(msg))) if msg == "user_not_found"
            ));
            assert_eq!(outcome.output, "alice@example.com\n");
            assert_eq!(outcome.calls.len(), 2);
        }

        #[test]
        fn it_prompts_for_a_token_before_reading_users() {
            temp_env::with_var_unset(conf::TOKEN_ENV, || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                let outcome = runtime.block_on(run_with(
                    &["query-users", "--emails"],
                    TestService::new("ok"),
                    "xoxp-typed\nU1\n",
                ));
                assert!(outcome.result.is_ok());
                assert_eq!(outcome.output, "alice@example.com\n");
                assert_eq!(outcome.calls.len(), 1);
                assert_eq!(outcome.calls[0].params[0].1, "U1");
            })
        }
    }

    mod how_to_get_a_token {
        use super::*;

        #[tokio::test]
        async fn it_prints_instructions() {
            let outcome = run(&["how-to-get-a-token"]).await;
            assert!(outcome.result.is_ok());
            assert!(outcome.output.contains("SLAK_TOKEN"));
            assert!(outcome.calls.is_empty());
        }
    }
}
