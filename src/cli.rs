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

use clap::Parser;

use crate::cmd::check::check_collection;
use crate::cmd::drill::drill;
use crate::cmd::due::list_due;
use crate::cmd::export::export_records;
use crate::cmd::orphans::list_orphans;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill the cards that are due, plus some new ones.
    Drill {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Review as this learner instead of the configured one.
        #[arg(long)]
        learner: Option<String>,
    },
    /// List the cards that are due, most urgent first.
    Due {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Review as this learner instead of the configured one.
        #[arg(long)]
        learner: Option<String>,
    },
    /// Print review statistics.
    Stats {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Review as this learner instead of the configured one.
        #[arg(long)]
        learner: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Print a learner's review records as JSON.
    Export {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Review as this learner instead of the configured one.
        #[arg(long)]
        learner: Option<String>,
    },
    /// Check that the configuration and decks load.
    Check {
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
    /// List reviewed cards that are no longer in any deck.
    Orphans {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Review as this learner instead of the configured one.
        #[arg(long)]
        learner: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill { directory, learner } => drill(directory, learner),
        Command::Due { directory, learner } => list_due(directory, learner),
        Command::Stats {
            directory,
            learner,
            format,
        } => print_stats(directory, learner, format),
        Command::Export { directory, learner } => export_records(directory, learner),
        Command::Check { directory } => check_collection(directory),
        Command::Orphans { directory, learner } => list_orphans(directory, learner),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_stats() {
        let cli = Command::try_parse_from(["moneycards", "stats", "decks", "--format", "json"]);
        match cli {
            Ok(Command::Stats {
                directory, format, ..
            }) => {
                assert_eq!(directory.as_deref(), Some("decks"));
                assert!(matches!(format, StatsFormat::Json));
            }
            _ => panic!("expected the stats command"),
        }
    }
}
