// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Errors that end a command.

use crate::auth::AuthError;
use crate::link::ParseError;
use crate::slack::service::ApiError;
use std::io;
use thiserror::Error;

/// Anything that makes a command fail.
///
/// There is no partial failure: the first error ends the command.
#[derive(Debug, Error)]
pub enum Error {
    /// The command line does not say what to query.
    #[error("{0}")]
    Usage(#[from] UsageError),

    /// A message link could not be parsed.
    #[error("Invalid link: {0}")]
    Parse(#[from] ParseError),

    /// The Slack API call failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Slack returned data that contradicts itself.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// No token could be found.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Insufficient or contradictory command-line arguments.
#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    /// Neither a link nor both a channel and a timestamp were given.
    #[error("give a message link, or both --channel and --timestamp")]
    InsufficientTarget,

    /// A link was given together with --channel or --timestamp.
    #[error("give either a message link or --channel and --timestamp, not both")]
    ConflictingTarget,
}

/// Data returned by Slack that violates its own invariants.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// A reaction's count does not match the number of users listed.
    #[error("reaction {name:?} has a count of {count} but lists {users} users")]
    CountMismatch {
        name: String,
        count: usize,
        users: usize,
    },
}
