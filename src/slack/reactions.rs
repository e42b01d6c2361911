// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reactions on a Slack message.
//!
//! We use "react" and "reaction" interchangeably.

use crate::auth::Token;
use crate::error::{DataError, Error, UsageError};
use crate::link::{self, MessageRef};
use crate::slack::service::{ApiError, ApiResult, Service, get_in};
use crate::view::Row;
use serde::Deserialize;
use serde_json::Value;

/// The message whose reactions are queried, as given on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    /// A link copied from Slack.
    Permalink(String),

    /// An explicit channel and timestamp.
    Message(MessageRef),
}

impl Target {
    /// Picks the target from a link or a channel and timestamp.
    ///
    /// Exactly one of the two must be given; otherwise the command line is
    /// wrong and nothing should be sent to Slack.
    pub fn from_args(
        link: Option<&str>,
        channel: Option<&str>,
        timestamp: Option<&str>,
    ) -> Result<Self, UsageError> {
        match (link, channel, timestamp) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(UsageError::ConflictingTarget),
            (Some(link), None, None) => Ok(Target::Permalink(link.to_string())),
            (None, Some(channel), Some(timestamp)) => {
                Ok(Target::Message(MessageRef::new(channel, timestamp)))
            }
            _ => Err(UsageError::InsufficientTarget),
        }
    }

    /// The channel and timestamp of the target message.
    pub fn resolve(&self) -> Result<MessageRef, link::ParseError> {
        match self {
            Target::Permalink(link) => link::parse_permalink(link),
            Target::Message(msg) => Ok(msg.clone()),
        }
    }
}

/// A reaction on a message: its name and the users who clicked it, in
/// the order they clicked.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Reaction {
    name: String,
    count: usize,
    #[serde(default)]
    users: Vec<String>,
}

impl Reaction {
    /// Creates a new reaction.
    pub fn new<I, S>(name: impl Into<String>, count: usize, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let users = users.into_iter().map(Into::into).collect();
        Self { name, count, users }
    }

    /// Name of the reaction, e.g. `thumbsup`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of users who reacted.
    pub fn count(&self) -> usize {
        self.count
    }

    /// IDs of the users who reacted.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Checks that the count agrees with the number of users listed.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.users.len() == self.count {
            Ok(())
        } else {
            Err(DataError::CountMismatch {
                name: self.name.clone(),
                count: self.count,
                users: self.users.len(),
            })
        }
    }
}

/// Which part of the reactions is printed.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Projection {
    /// The name of each reaction.
    #[default]
    Names,

    /// The count and name of each reaction.
    Counts,

    /// Every user of every reaction, tagged with the reaction name.
    AllUsers,

    /// The users of the reaction with the given name, or of the first
    /// reaction if no name is given.
    UsersOf(Option<String>),
}

impl Projection {
    /// Chooses a projection from command-line flags.
    ///
    /// `count` wins over everything else. `clicked` or `first` narrow the
    /// users down to a single reaction and imply `users`.
    pub fn from_flags(count: bool, users: bool, clicked: Option<&str>, first: bool) -> Self {
        if count {
            Projection::Counts
        } else if let Some(name) = clicked {
            Projection::UsersOf(Some(name.to_string()))
        } else if first {
            Projection::UsersOf(None)
        } else if users {
            Projection::AllUsers
        } else {
            Projection::Names
        }
    }
}

/// Shapes a list of reactions into output rows.
///
/// Every reaction is validated before anything is emitted, so a count that
/// disagrees with its user list fails the whole projection. A name that
/// matches no reaction simply yields no rows.
pub fn project(reactions: &[Reaction], projection: &Projection) -> Result<Vec<Row>, DataError> {
    for reaction in reactions {
        reaction.validate()?;
    }

    let rows: Vec<Row> = match projection {
        Projection::Names => reactions.iter().map(|r| Row::new([r.name()])).collect(),
        Projection::Counts => reactions
            .iter()
            .map(|r| Row::new([r.count().to_string(), r.name().to_string()]))
            .collect(),
        Projection::AllUsers => reactions
            .iter()
            .flat_map(|r| r.users().iter().map(move |u| Row::new([r.name(), u.as_str()])))
            .collect(),
        Projection::UsersOf(name) => {
            let reaction = match name {
                Some(name) => reactions.iter().find(|r| r.name() == name),
                None => reactions.first(),
            };
            reaction
                .map(|r| r.users().iter().map(|u| Row::new([u.as_str()])).collect())
                .unwrap_or_default()
        }
    };
    Ok(rows)
}

/// Extracts the reactions from a `reactions.get` response.
pub fn reactions_from(envelope: &Value) -> ApiResult<Vec<Reaction>> {
    let reactions = get_in(envelope, &["message", "reactions"])?;
    Vec::<Reaction>::deserialize(reactions)
        .map_err(|err| ApiError::UnexpectedShape(format!("message.reactions ({err})")))
}

/// Queries the reactions on a single message.
#[derive(Debug)]
pub struct ReactionQuery<'a, S: Service> {
    service: &'a S,
    token: &'a Token,
}

impl<'a, S: Service> ReactionQuery<'a, S> {
    /// Creates a query that calls `service`, authenticated by `token`.
    pub fn new(service: &'a S, token: &'a Token) -> Self {
        Self { service, token }
    }

    /// The raw `reactions.get` response for the target message.
    pub async fn envelope(&self, target: &Target) -> Result<Value, Error> {
        let msg = target.resolve()?;
        log::info!(
            "Getting reactions for message {} in {}",
            msg.timestamp(),
            msg.channel()
        );
        let params = [
            ("channel", msg.channel()),
            ("timestamp", msg.timestamp()),
            ("full", "1"),
        ];
        let envelope = self.service.call("reactions.get", self.token, &params).await?;
        Ok(envelope)
    }

    /// The reactions on the target message, in the order Slack returns them.
    pub async fn reactions(&self, target: &Target) -> Result<Vec<Reaction>, Error> {
        let envelope = self.envelope(target).await?;
        let reactions = reactions_from(&envelope)?;
        log::debug!("Found {} reactions", reactions.len());
        Ok(reactions)
    }

    /// The reactions on the target message, shaped into rows.
    pub async fn rows(&self, target: &Target, projection: &Projection) -> Result<Vec<Row>, Error> {
        let reactions = self.reactions(target).await?;
        Ok(project(&reactions, projection)?)
    }
}
