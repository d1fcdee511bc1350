// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// Name of the configuration file inside a collection directory.
pub const CONFIG_FILE: &str = "moneycards.toml";

const DEFAULT_LEARNER: &str = "default";

const DEFAULT_NEW_CARDS_PER_SESSION: usize = 10;

/// Per-collection settings. Every key is optional.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Whose review records to use.
    #[serde(default = "default_learner")]
    pub learner: String,
    /// How many never-seen cards a drill adds after the due cards.
    #[serde(default = "default_new_cards_per_session")]
    pub new_cards_per_session: usize,
}

fn default_learner() -> String {
    DEFAULT_LEARNER.to_string()
}

fn default_new_cards_per_session() -> usize {
    DEFAULT_NEW_CARDS_PER_SESSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learner: default_learner(),
            new_cards_per_session: default_new_cards_per_session(),
        }
    }
}

impl Config {
    /// Load the collection's configuration, or the defaults if the file is
    /// missing.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults.");
            return Ok(Self::default());
        }
        Self::parse(&read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the learner, e.g. from a command-line flag.
    pub fn with_learner(mut self, learner: Option<String>) -> Fallible<Self> {
        if let Some(learner) = learner {
            self.learner = learner;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Fallible<()> {
        if self.learner.trim().is_empty() {
            return fail("learner name must not be empty.");
        }
        Ok(())
    }
}
