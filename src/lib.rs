// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! slak is a command-line tool for collecting data from Slack handily:
//! who reacted to a message, with what, and who those people are. It
//! prints plain, tab-separated text that is easy to pipe into other
//! tools, or the raw API responses as JSON.
//!
//! # Examples
//!
//! (In all examples, replace the link with a link to an actual message,
//! copied with "Copy link" in Slack.)
//!
//! List the names of the reactions on a message:
//!
//! ```bash
//! slak query-reacts https://company.slack.com/archives/C123ABCD4/p1658312123456789
//! ```
//!
//! Count the users behind each reaction:
//!
//! ```bash
//! slak query-reacts --count https://company.slack.com/archives/C123ABCD4/p1658312123456789
//! ```
//!
//! List the IDs of the users who reacted with `:tada:`, then look up their
//! email addresses and names:
//!
//! ```bash
//! slak query-reacts --clicked tada https://company.slack.com/archives/C123ABCD4/p1658312123456789 \
//!     | slak query-users --emails --names
//! ```
//!
//! The message can also be given by its channel and timestamp:
//!
//! ```bash
//! slak query-reacts --channel C123ABCD4 --timestamp 1658312123.456789
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! slak --help
//! ```
//!
//! # Slack API Setup
//!
//! slak needs a Slack token with the `reactions:read`, `users:read`, and
//! `users:read.email` scopes. Run `slak how-to-get-a-token` for a
//! step-by-step guide.
//!
//! The token is taken from the `--token` option, then from the
//! `$SLAK_TOKEN` environment variable; if neither is set, slak asks for
//! it. Setting the variable with
//!
//! ```bash
//! $ read SLAK_TOKEN && export SLAK_TOKEN
//! ```
//!
//! keeps the token out of your shell's history file.
//!
//! # License
//!
//! slak is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod auth;
pub mod cli;
pub mod conf;
pub mod error;
pub mod howto;
pub mod link;
pub mod slack;
pub mod view;

#[cfg(test)]
mod test_utils;
