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

use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::store::ReviewStore;
use crate::types::review_record::ReviewRecord;
use crate::types::timestamp::Timestamp;

pub fn export_records(directory: Option<String>, learner: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory, learner)?;
    let export = Export {
        learner: coll.learner().to_string(),
        exported_at: Timestamp::now(),
        records: coll.db.all(coll.learner())?,
    };
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    learner: String,
    exported_at: Timestamp,
    records: Vec<ReviewRecord>,
}
