use crate::auth::Token;
use crate::slack::service::{ApiResult, Service, decode_envelope};
use serde_json::Value;
use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    let filename = format!("tests/data/{file}.json");
    fs::read_to_string(&filename).expect(&format!("could not load test data from {filename}"))
}

/// A call recorded by [`TestService`].
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub path: String,
    pub params: Vec<(String, String)>,
}

/// Answers API calls with recorded responses from `tests/data`.
///
/// A call to `path` is answered with `tests/data/{path}_{suffix}.json`.
/// Suffixes are used up one call at a time; the last one is repeated
/// for every call after that.
pub struct TestService {
    suffixes: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Call>>,
}

impl TestService {
    pub fn new(suffix: &str) -> Self {
        Self::sequence([suffix])
    }

    pub fn sequence<'a>(suffixes: impl IntoIterator<Item = &'a str>) -> Self {
        let suffixes = suffixes.into_iter().map(String::from).collect();
        Self {
            suffixes: Mutex::new(suffixes),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_suffix(&self) -> String {
        let mut suffixes = self.suffixes.lock().unwrap();
        if suffixes.len() > 1 {
            suffixes.pop_front().unwrap()
        } else {
            suffixes.front().cloned().expect("no test data suffix given")
        }
    }
}

impl Service for TestService {
    async fn call(&self, path: &str, token: &Token, params: &[(&str, &str)]) -> ApiResult<Value> {
        assert!(!token.is_empty(), "called {path} without a token");

        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let body = load_data(&format!("{path}_{}", self.next_suffix()));
        decode_envelope(&body)
    }
}
