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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::ReviewStats;
use crate::scheduler::review_stats;
use crate::store::ReviewStore;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(
    directory: Option<String>,
    learner: Option<String>,
    format: StatsFormat,
) -> Fallible<()> {
    let coll = Collection::new(directory, learner)?;
    let records = coll.db.all(coll.learner())?;
    let stats = review_stats(&records, Timestamp::now());
    match format {
        StatsFormat::Text => print!("{}", render_text(coll.learner(), &stats)),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

fn render_text(learner: &str, stats: &ReviewStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Learner:           {learner}\n"));
    out.push_str(&format!("Cards reviewed:    {}\n", stats.total));
    out.push_str(&format!("Overdue:           {}\n", stats.due_now));
    out.push_str(&format!("Due today:         {}\n", stats.due_today));
    out.push_str(&format!("Due this week:     {}\n", stats.due_this_week));
    out.push_str(&format!("Learning:          {}\n", stats.learning));
    out.push_str(&format!("Young:             {}\n", stats.young));
    out.push_str(&format!("Mature:            {}\n", stats.mature));
    out.push_str(&format!("Average easiness:  {:.2}\n", stats.average_easiness));
    out.push_str(&format!("Average retention: {:.0}%\n", stats.average_retention));
    out
}
