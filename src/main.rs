// Copyright 2024 The json-match Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use json_match::{ArrayOrder, AssertionError, JsonMatch, Variables};

#[doc(hidden)]
#[derive(Debug, Clone)]
struct JSONVars(Value);

impl FromStr for JSONVars {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = serde_json::from_str(s)?;
        Ok(JSONVars(value))
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        eprintln!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        eprintln!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INVALID_ARGUMENT: i32 = 2;
    const INVALID_INPUT: i32 = 3;
    const MISMATCH: i32 = 4;
}

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File with the JSON pattern
    pattern: PathBuf,

    /// File with the actual JSON
    actual: PathBuf,

    /// Compare arrays regardless of element order
    #[clap(short, long)]
    any_order: bool,

    /// Variables for templates in the pattern, as a JSON object
    #[clap(short, long)]
    variables: Option<JSONVars>,

    /// Text put in front of the failure report
    #[clap(short, long)]
    reason: Option<String>,

    /// Maximum depth of the pattern to follow
    #[clap(long)]
    max_depth: Option<usize>,

    /// Log filter, e.g. `debug` or `json_match=trace`
    #[clap(long, default_value = "warn")]
    log_level: String,
}

#[doc(hidden)]
fn main() {
    let cli = Cli::parse();

    let filter = match EnvFilter::try_new(&cli.log_level) {
        Ok(filter) => filter,
        Err(e) => {
            handle_error!(Code::INVALID_ARGUMENT, "Error: invalid log level: {}", e);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let variables = match &cli.variables {
        Some(vars) => match Variables::from_json(&vars.0) {
            Ok(vars) => Some(vars),
            Err(e) => {
                handle_error!(Code::INVALID_ARGUMENT, "Error: {}", e);
            }
        },
        None => None,
    };

    let pattern = read_file(&cli.pattern);
    let actual = read_file(&cli.actual);

    let mut matcher = JsonMatch::new();
    if let Some(reason) = cli.reason.as_deref() {
        matcher = matcher.with_reason(reason);
    }
    if cli.any_order {
        matcher = matcher.with_array_order(ArrayOrder::Any);
    }
    if let Some(max_depth) = cli.max_depth {
        matcher = matcher.with_max_depth(max_depth);
    }
    if let Some(variables) = variables {
        matcher = matcher.with_variables(variables);
    }

    match matcher.assert(pattern.as_str(), actual.as_str()) {
        Ok(()) => {
            println!("JSON matches pattern");
            std::process::exit(Code::SUCCESS);
        }
        Err(err @ AssertionError::Mismatch(_)) => {
            handle_error!(Code::MISMATCH, "{}", err);
        }
        Err(err) => {
            handle_error!(Code::INVALID_INPUT, "Error: {}", err);
        }
    }
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            handle_error!(
                Code::INVALID_ARGUMENT,
                "Error: cannot read {}: {}",
                path.display(),
                e
            );
        }
    }
}
