// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Slack user profiles.

use crate::auth::Token;
use crate::slack::service::{ApiError, ApiResult, Service, get_in};
use crate::view::Row;
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, BufRead};
use std::vec;

/// The parts of a user's profile we know how to print.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Profile {
    email: Option<String>,
    real_name: Option<String>,
    title: Option<String>,
}

impl Profile {
    /// Email address; only present if the token has `users:read.email`.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Full name.
    pub fn real_name(&self) -> Option<&str> {
        self.real_name.as_deref()
    }

    /// Job title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// A `users.info` response for a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    envelope: Value,
}

impl UserInfo {
    /// Wraps a successful `users.info` response.
    pub fn new(envelope: Value) -> Self {
        Self { envelope }
    }

    /// The response exactly as Slack returned it.
    pub fn envelope(&self) -> &Value {
        &self.envelope
    }

    /// The user's profile.
    pub fn profile(&self) -> ApiResult<Profile> {
        let profile = get_in(&self.envelope, &["user", "profile"])?;
        Profile::deserialize(profile)
            .map_err(|err| ApiError::UnexpectedShape(format!("user.profile ({err})")))
    }
}

/// Which profile fields are printed.
///
/// Fields always come out in the same order, email, real name, then
/// title, no matter which of them are selected. Selecting nothing prints
/// an empty line per user.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[must_use]
pub struct Fields {
    email: bool,
    real_name: bool,
    title: bool,
}

impl Fields {
    /// Selects the email address.
    pub fn email(mut self, email: bool) -> Self {
        self.email = email;
        self
    }

    /// Selects the real name.
    pub fn real_name(mut self, real_name: bool) -> Self {
        self.real_name = real_name;
        self
    }

    /// Selects the title.
    pub fn title(mut self, title: bool) -> Self {
        self.title = title;
        self
    }

    /// Picks the selected fields out of `profile`.
    ///
    /// A selected field missing from the profile is an
    /// [`ApiError::UnexpectedShape`].
    pub fn select(&self, profile: &Profile) -> ApiResult<Row> {
        let wanted = [
            (self.email, "email", profile.email()),
            (self.real_name, "real_name", profile.real_name()),
            (self.title, "title", profile.title()),
        ];
        let cells = wanted
            .into_iter()
            .filter(|(selected, _, _)| *selected)
            .map(|(_, field, value)| {
                value.ok_or_else(|| ApiError::UnexpectedShape(format!("user.profile.{field}")))
            })
            .collect::<ApiResult<Vec<_>>>()?;
        Ok(Row::new(cells))
    }
}

/// Looks up users one after another, in the order given.
///
/// Each call to [`ProfileQuery::next()`] makes one `users.info` request.
/// The first failure ends the query: after an error, `next()` returns
/// `None` and the remaining users are never looked up.
#[derive(Debug)]
pub struct ProfileQuery<'a, S: Service> {
    service: &'a S,
    token: &'a Token,
    user_ids: vec::IntoIter<String>,
    failed: bool,
}

impl<'a, S: Service> ProfileQuery<'a, S> {
    /// Creates a query for `user_ids` that calls `service`, authenticated
    /// by `token`. Nothing is requested until [`ProfileQuery::next()`] is
    /// called.
    pub fn new<I, T>(service: &'a S, token: &'a Token, user_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let user_ids: Vec<String> = user_ids.into_iter().map(Into::into).collect();
        Self {
            service,
            token,
            user_ids: user_ids.into_iter(),
            failed: false,
        }
    }

    /// Looks up the next user, or returns `None` when there are no users
    /// left or a previous lookup failed.
    pub async fn next(&mut self) -> Option<ApiResult<UserInfo>> {
        if self.failed {
            return None;
        }

        let user = self.user_ids.next()?;
        log::info!("Getting profile for {user}");
        let result = self
            .service
            .call("users.info", self.token, &[("user", user.as_str())])
            .await
            .map(UserInfo::new);

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Reads whitespace-separated user IDs.
pub fn read_user_ids<R: BufRead>(input: R) -> io::Result<Vec<String>> {
    let mut user_ids = Vec::new();
    for line in input.lines() {
        user_ids.extend(line?.split_whitespace().map(String::from));
    }
    Ok(user_ids)
}
